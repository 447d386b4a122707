//! Testbench builders.
//!
//! Each characterization test drives the amplifier differently: a different
//! excitation, a different feedback topology, and different recorded signals.
//! The builders here turn one base circuit description into the
//! simulate-ready variant for each test. They are purely textual; running
//! the simulator and reading its output belong to the extraction layer.

use crate::error::{Error, Result};
use crate::netlist::Netlist;

/// Fixed output file names requested by the generated directive blocks.
///
/// The simulator always writes to these names in its working directory;
/// isolation between runs comes from running each characterization in its
/// own directory.
pub mod files {
    /// DC common-mode sweep output.
    pub const DC_DATA: &str = "output_dc.dat";
    /// Output-swing sweep output.
    pub const OW_DATA: &str = "output_dc_ow.dat";
    /// Offset sweep output.
    pub const OFFSET_DATA: &str = "output_dc_offset.dat";
    /// AC small-signal sweep output.
    pub const AC_DATA: &str = "output_ac.dat";
    /// ICMR sweep output.
    pub const ICMR_DATA: &str = "output_dc_icmr.dat";
    /// Transient run output.
    pub const TRAN_DATA: &str = "output_tran.dat";
}

/// Names and conventions used by the testbench rewrites.
///
/// The defaults match the reference op-amp bench: a common-mode source
/// `Vcm`, a differential source `Vid` split by `Eidp`/`Eidn`, inputs
/// `in1`/`in2`, output `out`, supply `vdd`, load components named `Rl*` and
/// `Cl*`, and a 1.8 V rail.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Common-mode bias source designator.
    pub cm_source: String,
    /// Node driven by the common-mode source.
    pub cm_node: String,
    /// Differential drive source designator.
    pub diff_source: String,
    /// Node driven by the differential source.
    pub diff_node: String,
    /// Positive-side drive source designator.
    pub pos_drive: String,
    /// Negative-side drive source designator.
    pub neg_drive: String,
    /// Negative input node (rewired to the output for unity-gain feedback).
    pub neg_input: String,
    /// Positive input node.
    pub pos_input: String,
    /// Output node.
    pub output: String,
    /// Supply source designator, probed as `I(<supply>)`.
    pub supply: String,
    /// Designator prefixes of output-loading components to strip.
    pub load_prefixes: Vec<String>,
    /// Active devices whose `neg_input` terminal is rewired for feedback.
    pub feedback_devices: Vec<String>,
    /// Supply rail voltage; sweeps run from 0 to this value.
    pub rail: f64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            cm_source: "Vcm".to_string(),
            cm_node: "cm".to_string(),
            diff_source: "Vid".to_string(),
            diff_node: "diffin".to_string(),
            pos_drive: "Eidp".to_string(),
            neg_drive: "Eidn".to_string(),
            neg_input: "in1".to_string(),
            pos_input: "in2".to_string(),
            output: "out".to_string(),
            supply: "vdd".to_string(),
            load_prefixes: vec!["Rl".to_string(), "Cl".to_string()],
            feedback_devices: vec!["M1".to_string(), "M4".to_string()],
            rail: 1.8,
        }
    }
}

/// One of the fixed test kinds, with its recorded-signal parameters.
#[derive(Debug, Clone)]
pub enum TestKind {
    /// Plain DC sweep of the common-mode source.
    DcSweep {
        /// Output nodes to record (at least one).
        outputs: Vec<String>,
    },
    /// Output-swing sweep: swept input, nulled differential drives.
    OutputSwing,
    /// Offset sweep: unity-gain feedback, loads removed.
    Offset,
    /// Logarithmic-decade AC small-signal sweep.
    AcSweep {
        /// Output nodes to record (at least one).
        outputs: Vec<String>,
    },
    /// ICMR sweep: unity-gain feedback, supply current recorded.
    Icmr,
    /// Fixed-step transient run.
    Transient {
        /// Input node monitored alongside the outputs.
        input: String,
        /// Output nodes to record (at least one).
        outputs: Vec<String>,
    },
    /// Common-mode excitation; the caller's directive block is kept.
    CommonMode,
}

/// Builds per-test circuit descriptions from a base description.
#[derive(Debug, Clone, Default)]
pub struct Testbench {
    config: BenchConfig,
}

impl Testbench {
    /// Create a testbench with the given naming conventions.
    pub fn new(config: BenchConfig) -> Self {
        Testbench { config }
    }

    /// The naming conventions in use.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Build the simulate-ready description for `kind`.
    pub fn build(&self, base: &Netlist, kind: &TestKind) -> Result<Netlist> {
        match kind {
            TestKind::DcSweep { outputs } => self.dc_sweep(base, outputs),
            TestKind::OutputSwing => self.output_swing(base),
            TestKind::Offset => self.offset(base),
            TestKind::AcSweep { outputs } => self.ac_sweep(base, outputs),
            TestKind::Icmr => self.icmr(base),
            TestKind::Transient { input, outputs } => self.transient(base, input, outputs),
            TestKind::CommonMode => Ok(self.common_mode(base)),
        }
    }

    /// DC sweep of the common-mode source, recording `outputs`.
    pub fn dc_sweep(&self, base: &Netlist, outputs: &[String]) -> Result<Netlist> {
        let outputs = required_outputs(outputs)?;
        let cfg = &self.config;
        let directives = vec![
            format!("dc {} 0 {} 0.001", cfg.cm_source, cfg.rail),
            format!("wrdata {} {}", files::DC_DATA, outputs),
        ];
        base.strip_control_block().insert_control_block(&directives)
    }

    /// Output-swing bench: the common-mode bias becomes an independent swept
    /// source on the negative input, the differential drives are nulled, and
    /// output loads are stripped.
    pub fn output_swing(&self, base: &Netlist) -> Result<Netlist> {
        let cfg = &self.config;
        let sweep_source = format!("V{}", cfg.neg_input);
        let rewired = base.strip_control_block().map_lines(|line| {
            if line.is_component(&cfg.cm_source) {
                Some(crate::line::Line::classify(format!(
                    "{} {} 0 DC {{{}}}",
                    sweep_source, cfg.neg_input, cfg.cm_source
                )))
            } else if line.is_component(&cfg.neg_drive) {
                Some(crate::line::Line::classify(format!(
                    "V{} {} 0 DC {}",
                    cfg.pos_input,
                    cfg.pos_input,
                    cfg.rail / 2.0
                )))
            } else if line.is_component(&cfg.pos_drive) || line.is_component(&cfg.diff_source) {
                None
            } else if self.is_load(line) {
                None
            } else {
                Some(line.clone())
            }
        });
        let directives = vec![
            format!("dc {} 0 {} 0.0001", sweep_source, cfg.rail),
            format!(
                "wrdata {} {} {}",
                files::OW_DATA,
                cfg.output,
                cfg.neg_input
            ),
        ];
        rewired.insert_control_block(&directives)
    }

    /// Offset bench: unity-gain feedback on the target devices, loads
    /// stripped, common-mode sweep recording the output node.
    pub fn offset(&self, base: &Netlist) -> Result<Netlist> {
        let cfg = &self.config;
        let directives = vec![
            format!("dc {} 0 {} 0.001", cfg.cm_source, cfg.rail),
            format!("wrdata {} {}", files::OFFSET_DATA, cfg.output),
        ];
        self.unity_gain(base).insert_control_block(&directives)
    }

    /// AC small-signal sweep (10 points per decade, 1 Hz to 10 GHz),
    /// recording `outputs`.
    pub fn ac_sweep(&self, base: &Netlist, outputs: &[String]) -> Result<Netlist> {
        let outputs = required_outputs(outputs)?;
        let directives = vec![
            "ac dec 10 1 10G".to_string(),
            format!("wrdata {} {}", files::AC_DATA, outputs),
        ];
        base.strip_control_block().insert_control_block(&directives)
    }

    /// ICMR bench: unity-gain feedback, common-mode sweep recording the
    /// output node and the supply current.
    pub fn icmr(&self, base: &Netlist) -> Result<Netlist> {
        let cfg = &self.config;
        let directives = vec![
            format!("dc {} 0 {} 0.001", cfg.cm_source, cfg.rail),
            format!(
                "wrdata {} {} I({})",
                files::ICMR_DATA,
                cfg.output,
                cfg.supply
            ),
        ];
        self.unity_gain(base).insert_control_block(&directives)
    }

    /// Transient bench: fixed-step run recording `outputs`, the supply
    /// current, and the monitored `input` node.
    pub fn transient(&self, base: &Netlist, input: &str, outputs: &[String]) -> Result<Netlist> {
        let outputs = required_outputs(outputs)?;
        let directives = self.transient_directives(input, &outputs);
        base.strip_control_block().insert_control_block(&directives)
    }

    /// Common-mode excitation: the common-mode source gets an AC magnitude
    /// of 1 and a small sinusoid, the differential source is zeroed, and
    /// every other line -- including the caller's directive block -- is kept.
    pub fn common_mode(&self, prepared: &Netlist) -> Netlist {
        let cfg = &self.config;
        prepared.map_lines(|line| {
            if line.is_component(&cfg.cm_source) {
                Some(crate::line::Line::classify(format!(
                    "{} {} 0 DC {} SIN(0 1u 10k 0 0) AC 1",
                    cfg.cm_source,
                    cfg.cm_node,
                    cfg.rail / 2.0
                )))
            } else if line.is_component(&cfg.diff_source) {
                Some(crate::line::Line::classify(format!(
                    "{} {} 0 DC 0",
                    cfg.diff_source, cfg.diff_node
                )))
            } else {
                Some(line.clone())
            }
        })
    }

    /// The AC sweep directives alone, for callers that assemble a combined
    /// directive block.
    pub fn ac_directives(&self, outputs: &[String]) -> Result<Vec<String>> {
        let outputs = required_outputs(outputs)?;
        Ok(vec![
            "ac dec 10 1 10G".to_string(),
            format!("wrdata {} {}", files::AC_DATA, outputs),
        ])
    }

    /// The transient directives alone, for callers that assemble a combined
    /// directive block.
    pub fn transient_directives(&self, input: &str, outputs: &str) -> Vec<String> {
        let cfg = &self.config;
        vec![
            "tran 50n 500u".to_string(),
            format!(
                "wrdata {} {} I({}) {}",
                files::TRAN_DATA,
                outputs,
                cfg.supply,
                input
            ),
        ]
    }

    fn is_load(&self, line: &crate::line::Line) -> bool {
        self.config
            .load_prefixes
            .iter()
            .any(|p| line.has_designator_prefix(p))
    }

    /// Rewire the negative input to the output on the target active devices
    /// and strip the output loads, forming unity-gain feedback.
    fn unity_gain(&self, base: &Netlist) -> Netlist {
        let cfg = &self.config;
        base.strip_control_block().map_lines(|line| {
            if self.is_load(line) {
                return None;
            }
            let is_target = line.designator().is_some_and(|d| {
                (d.starts_with('M') || d.starts_with('m'))
                    && cfg.feedback_devices.iter().any(|t| d.eq_ignore_ascii_case(t))
            });
            if is_target {
                Some(line.replace_node(&cfg.neg_input, &cfg.output))
            } else {
                Some(line.clone())
            }
        })
    }
}

fn required_outputs(outputs: &[String]) -> Result<String> {
    if outputs.is_empty() {
        return Err(Error::InvalidArgument(
            "output node list cannot be empty".to_string(),
        ));
    }
    Ok(outputs.join(" "))
}
