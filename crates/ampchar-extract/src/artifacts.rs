//! On-disk layout of per-stage simulation artifacts.
//!
//! Every characterization stage runs in its own subdirectory of one run
//! root, so the fixed output file names requested by the directive blocks
//! never collide. The common-mode stage additionally preserves drive-tagged
//! copies of the AC and transient outputs, since it reuses the same file
//! names for its own run.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A characterization stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// DC common-mode and output-swing sweeps.
    Dc,
    /// Offset sweep in unity-gain feedback.
    Offset,
    /// AC small-signal sweep.
    Ac,
    /// ICMR sweep in unity-gain feedback.
    Icmr,
    /// Transient run.
    Tran,
    /// Common-mode re-run of the AC and transient analyses.
    CommonMode,
}

impl Stage {
    /// All stages, in execution order.
    pub const ALL: [Stage; 6] = [
        Stage::Dc,
        Stage::Offset,
        Stage::Ac,
        Stage::Icmr,
        Stage::Tran,
        Stage::CommonMode,
    ];

    /// Subdirectory name under the run root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Stage::Dc => "dc",
            Stage::Offset => "offset",
            Stage::Ac => "ac",
            Stage::Icmr => "icmr",
            Stage::Tran => "tran",
            Stage::CommonMode => "common_mode",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Dc => "DC",
            Stage::Offset => "offset",
            Stage::Ac => "AC",
            Stage::Icmr => "ICMR",
            Stage::Tran => "transient",
            Stage::CommonMode => "common-mode",
        };
        f.write_str(name)
    }
}

/// Which excitation produced a preserved output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drive {
    /// Differential drive (the base bench).
    Diff,
    /// Common-mode drive.
    Cm,
}

impl Drive {
    fn suffix(&self) -> &'static str {
        match self {
            Drive::Diff => "diff",
            Drive::Cm => "cm",
        }
    }
}

/// Resolves and manages artifact paths under one run root.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `root`. The directory itself is created
    /// lazily, stage by stage.
    pub fn new(root: impl Into<PathBuf>) -> ArtifactStore {
        ArtifactStore { root: root.into() }
    }

    /// The run root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The working directory for `stage`, created if necessary.
    pub fn stage_dir(&self, stage: Stage) -> Result<PathBuf> {
        let dir = self.root.join(stage.dir_name());
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Where `stage` writes the output file `name`.
    pub fn data_path(&self, stage: Stage, name: &str) -> PathBuf {
        self.root.join(stage.dir_name()).join(name)
    }

    /// The drive-tagged preserved name for `name` under `stage`:
    /// `output_ac.dat` becomes `output_ac_diff.dat` or `output_ac_cm.dat`.
    pub fn preserved_path(&self, stage: Stage, name: &str, drive: Drive) -> PathBuf {
        let tagged = match name.rsplit_once('.') {
            Some((stem, ext)) => format!("{stem}_{}.{ext}", drive.suffix()),
            None => format!("{name}_{}", drive.suffix()),
        };
        self.root.join(stage.dir_name()).join(tagged)
    }

    /// The path of `name` under `stage`, failing if the file is absent.
    pub fn require(&self, stage: Stage, name: &str) -> Result<PathBuf> {
        let path = self.data_path(stage, name);
        if !path.is_file() {
            return Err(Error::MissingArtifact { path });
        }
        Ok(path)
    }

    /// Copy `source` to the drive-tagged preserved name under `stage`.
    pub fn preserve(
        &self,
        source: &Path,
        stage: Stage,
        name: &str,
        drive: Drive,
    ) -> Result<PathBuf> {
        self.stage_dir(stage)?;
        let dest = self.preserved_path(stage, name, drive);
        std::fs::copy(source, &dest)?;
        Ok(dest)
    }
}
