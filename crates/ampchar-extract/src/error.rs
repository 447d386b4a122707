//! Error types for simulation orchestration.

use std::path::PathBuf;

use thiserror::Error;

use crate::artifacts::Stage;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running simulations and extracting metrics.
#[derive(Debug, Error)]
pub enum Error {
    /// The simulator executable could not be invoked.
    #[error("ngspice not found: {0}")]
    NgspiceNotFound(String),

    /// The simulator exited with a failure status.
    #[error("ngspice run failed: {0}")]
    SimulationFailure(String),

    /// The simulator did not finish within the configured timeout.
    #[error("ngspice timed out after {0} seconds")]
    Timeout(u64),

    /// A run completed but did not produce an expected output file.
    #[error("expected output file was not produced: {}", path.display())]
    MissingArtifact {
        /// The path that should have been written.
        path: PathBuf,
    },

    /// A characterization stage failed.
    #[error("{stage} stage failed: {source}")]
    Stage {
        /// The stage that failed.
        stage: Stage,
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },

    /// Netlist transformation error.
    #[error(transparent)]
    Netlist(#[from] ampchar_netlist::Error),

    /// Trace parsing or metric computation error.
    #[error(transparent)]
    Metrics(#[from] ampchar_metrics::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an error as a failure of `stage`.
    pub fn in_stage(stage: Stage, source: Error) -> Error {
        Error::Stage {
            stage,
            source: Box::new(source),
        }
    }
}
