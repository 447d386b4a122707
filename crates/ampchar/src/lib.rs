//! # Ampchar
//!
//! Amplifier characterization through ngspice.
//!
//! Ampchar takes one base op-amp testbench netlist and measures the
//! standard performance metrics from it:
//! - DC: output swing, input-referred offset, input common-mode range
//! - AC: gain, bandwidth, unity-gain bandwidth, phase margin
//! - Transient: gain and static supply power
//! - Common-mode rejection, both AC and transient
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ampchar::prelude::*;
//!
//! let text = std::fs::read_to_string("opamp.cir")?;
//! let extractor = Extractor::new(Netlist::parse(&text), "work");
//! let report = extractor.run_all()?;
//! println!("{}", report.render_table());
//! ```
//!
//! The individual layers are usable on their own: [`netlist`] builds the
//! per-test bench variants, [`metrics`] computes metrics from already
//! existing trace files, and [`extract`] orchestrates the simulator.

// Re-export the component crates
pub use ampchar_extract as extract;
pub use ampchar_metrics as metrics;
pub use ampchar_netlist as netlist;

// Convenient re-exports from ampchar_netlist
pub use ampchar_netlist::{BenchConfig, Error as NetlistError, Netlist, TestKind, Testbench};

// Convenient re-exports from ampchar_metrics
pub use ampchar_metrics::{Error as MetricsError, FrequencyTrace, Table, TimeTrace};

// Convenient re-exports from ampchar_extract
pub use ampchar_extract::{
    is_ngspice_available, ngspice_version, ArtifactStore, Drive, Error as ExtractError, Extractor,
    MetricsMap, NgspiceConfig, Report, Stage,
};

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::{
        BenchConfig, Extractor, FrequencyTrace, MetricsMap, Netlist, NgspiceConfig, Report,
        Stage, Testbench, TimeTrace,
    };
}
