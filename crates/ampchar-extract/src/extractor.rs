//! Stage-sequenced metric extraction.
//!
//! The extractor takes one base circuit description and runs the fixed
//! sequence of characterization stages, each in its own working directory:
//! DC, offset, AC, ICMR, transient, and finally the common-mode re-run of
//! the AC and transient analyses. Each stage builds its bench variant,
//! invokes the simulator, parses the output traces, and contributes its
//! metrics to the report.

use std::path::Path;

use tracing::{info, warn};

use ampchar_metrics::{ac, cmrr, dc, tran, FrequencyTrace, TimeTrace};
use ampchar_netlist::bench::files;
use ampchar_netlist::{Netlist, Testbench};

use crate::artifacts::{ArtifactStore, Drive, Stage};
use crate::error::{Error, Result};
use crate::ngspice::{run_ngspice, NgspiceConfig};
use crate::report::{keys, MetricsMap, Report};

/// Runs the characterization sequence and collects the metrics.
#[derive(Debug)]
pub struct Extractor {
    base: Netlist,
    bench: Testbench,
    ngspice: NgspiceConfig,
    store: ArtifactStore,
}

impl Extractor {
    /// Create an extractor for `base`, writing artifacts under `work_dir`.
    pub fn new(base: Netlist, work_dir: impl AsRef<Path>) -> Extractor {
        Extractor::with_config(
            base,
            work_dir,
            Testbench::default(),
            NgspiceConfig::default(),
        )
    }

    /// Create an extractor with explicit bench and simulator configuration.
    pub fn with_config(
        base: Netlist,
        work_dir: impl AsRef<Path>,
        bench: Testbench,
        ngspice: NgspiceConfig,
    ) -> Extractor {
        Extractor {
            base,
            bench,
            ngspice,
            store: ArtifactStore::new(work_dir.as_ref()),
        }
    }

    /// The artifact store for this run.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Run every stage in order and return the completed report.
    pub fn run_all(&self) -> Result<Report> {
        let mut metrics = MetricsMap::new();
        self.run_dc(&mut metrics)
            .map_err(|e| Error::in_stage(Stage::Dc, e))?;
        self.run_offset(&mut metrics)
            .map_err(|e| Error::in_stage(Stage::Offset, e))?;
        self.run_ac(&mut metrics)
            .map_err(|e| Error::in_stage(Stage::Ac, e))?;
        self.run_icmr(&mut metrics)
            .map_err(|e| Error::in_stage(Stage::Icmr, e))?;
        self.run_transient(&mut metrics)
            .map_err(|e| Error::in_stage(Stage::Tran, e))?;
        self.run_common_mode(&mut metrics)
            .map_err(|e| Error::in_stage(Stage::CommonMode, e))?;
        Ok(Report::new(metrics))
    }

    /// DC stage: the plain common-mode sweep plus the output-swing sweep.
    pub fn run_dc(&self, metrics: &mut MetricsMap) -> Result<()> {
        info!(stage = %Stage::Dc, "running");
        let cfg = self.bench.config();
        let outputs = vec![cfg.output.clone()];

        let sweep = self.bench.dc_sweep(&self.base, &outputs)?;
        self.simulate(Stage::Dc, "dc_sweep", &sweep)?;
        self.store.require(Stage::Dc, files::DC_DATA)?;

        let swing_bench = self.bench.output_swing(&self.base)?;
        self.simulate(Stage::Dc, "output_swing", &swing_bench)?;
        let trace = TimeTrace::from_path(self.store.require(Stage::Dc, files::OW_DATA)?)?;
        let value = dc::output_swing(&trace, cfg.rail / 2.0)?;
        metrics.insert(keys::OUTPUT_SWING.to_string(), value);
        Ok(())
    }

    /// Offset stage: unity-gain sweep, worst-case |output - input|.
    pub fn run_offset(&self, metrics: &mut MetricsMap) -> Result<()> {
        info!(stage = %Stage::Offset, "running");
        let bench = self.bench.offset(&self.base)?;
        self.simulate(Stage::Offset, "offset", &bench)?;
        let trace = TimeTrace::from_path(self.store.require(Stage::Offset, files::OFFSET_DATA)?)?;
        metrics.insert(keys::OFFSET_VOLTAGE.to_string(), dc::offset_voltage(&trace)?);
        Ok(())
    }

    /// AC stage: bandwidth, unity-gain bandwidth, phase margin, and gain
    /// from one frequency sweep.
    pub fn run_ac(&self, metrics: &mut MetricsMap) -> Result<()> {
        info!(stage = %Stage::Ac, "running");
        let cfg = self.bench.config();
        let bench = self.bench.ac_sweep(&self.base, &[cfg.output.clone()])?;
        self.simulate(Stage::Ac, "ac_sweep", &bench)?;
        let trace = FrequencyTrace::from_path(self.store.require(Stage::Ac, files::AC_DATA)?)?;

        metrics.insert(keys::BANDWIDTH.to_string(), ac::bandwidth(&trace));
        metrics.insert(
            keys::UNITY_GAIN_BANDWIDTH.to_string(),
            ac::unity_gain_bandwidth(&trace)?,
        );
        metrics.insert(keys::PHASE_MARGIN.to_string(), ac::phase_margin(&trace));
        metrics.insert(keys::AC_GAIN.to_string(), ac::ac_gain(&trace));
        Ok(())
    }

    /// ICMR stage: unity-gain sweep with the supply current recorded.
    pub fn run_icmr(&self, metrics: &mut MetricsMap) -> Result<()> {
        info!(stage = %Stage::Icmr, "running");
        let cfg = self.bench.config();
        let bench = self.bench.icmr(&self.base)?;
        self.simulate(Stage::Icmr, "icmr", &bench)?;
        let trace = TimeTrace::from_path(self.store.require(Stage::Icmr, files::ICMR_DATA)?)?;
        let value = dc::icmr(&trace, cfg.rail / 2.0, cfg.rail)?;
        metrics.insert(keys::ICMR.to_string(), value);
        Ok(())
    }

    /// Transient stage: static power and transient gain from one run.
    pub fn run_transient(&self, metrics: &mut MetricsMap) -> Result<()> {
        info!(stage = %Stage::Tran, "running");
        let cfg = self.bench.config();
        let bench =
            self.bench
                .transient(&self.base, &cfg.neg_input, &[cfg.output.clone()])?;
        self.simulate(Stage::Tran, "tran", &bench)?;
        let trace = TimeTrace::from_path(self.store.require(Stage::Tran, files::TRAN_DATA)?)?;

        match tran::leakage_power(&trace, cfg.rail)? {
            Some(power) => {
                metrics.insert(keys::LEAKAGE_POWER.to_string(), power);
            }
            None => warn!("supply current never settles; leakage power omitted"),
        }
        metrics.insert(keys::TRAN_GAIN.to_string(), tran::tran_gain(&trace)?);
        Ok(())
    }

    /// Common-mode stage: re-run the AC and transient analyses with
    /// common-mode excitation and compare against the differential runs.
    ///
    /// The differential-drive outputs from the AC and transient stages are
    /// preserved under drive-tagged names before the re-run, the
    /// common-mode outputs after it.
    pub fn run_common_mode(&self, metrics: &mut MetricsMap) -> Result<()> {
        info!(stage = %Stage::CommonMode, "running");
        let cfg = self.bench.config();

        let ac_diff = self.store.preserve(
            &self.store.require(Stage::Ac, files::AC_DATA)?,
            Stage::CommonMode,
            files::AC_DATA,
            Drive::Diff,
        )?;
        let tran_diff = self.store.preserve(
            &self.store.require(Stage::Tran, files::TRAN_DATA)?,
            Stage::CommonMode,
            files::TRAN_DATA,
            Drive::Diff,
        )?;

        // One run covers both analyses: the directive block chains the AC
        // sweep and the transient run.
        let mut directives = self.bench.ac_directives(&[cfg.output.clone()])?;
        directives.extend(
            self.bench
                .transient_directives(&cfg.neg_input, &cfg.output),
        );
        let prepared = self
            .base
            .strip_control_block()
            .insert_control_block(&directives)?;
        let bench = self.bench.common_mode(&prepared);
        self.simulate(Stage::CommonMode, "common_mode", &bench)?;

        let ac_cm = self.store.preserve(
            &self.store.require(Stage::CommonMode, files::AC_DATA)?,
            Stage::CommonMode,
            files::AC_DATA,
            Drive::Cm,
        )?;
        let tran_cm = self.store.preserve(
            &self.store.require(Stage::CommonMode, files::TRAN_DATA)?,
            Stage::CommonMode,
            files::TRAN_DATA,
            Drive::Cm,
        )?;

        let tran_value = cmrr::cmrr_tran(
            &TimeTrace::from_path(&tran_diff)?,
            &TimeTrace::from_path(&tran_cm)?,
        )?;
        metrics.insert(keys::CMRR_TRAN.to_string(), tran_value);

        let ac_value = cmrr::cmrr_ac(
            &FrequencyTrace::from_path(&ac_diff)?,
            &FrequencyTrace::from_path(&ac_cm)?,
        );
        metrics.insert(keys::CMRR_AC.to_string(), ac_value);
        Ok(())
    }

    fn simulate(&self, stage: Stage, name: &str, netlist: &Netlist) -> Result<()> {
        let dir = self.store.stage_dir(stage)?;
        run_ngspice(&netlist.to_text(), &dir, name, &self.ngspice)
    }
}
