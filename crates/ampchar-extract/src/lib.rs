//! Simulation orchestration and metric extraction.
//!
//! Glue between the bench builders in `ampchar-netlist` and the metric
//! computations in `ampchar-metrics`: invoke ngspice per stage, keep the
//! per-stage artifacts apart, and assemble the named-metric report.

pub mod artifacts;
pub mod error;
pub mod extractor;
pub mod ngspice;
pub mod report;

pub use artifacts::{ArtifactStore, Drive, Stage};
pub use error::{Error, Result};
pub use extractor::Extractor;
pub use ngspice::{is_ngspice_available, ngspice_version, NgspiceConfig};
pub use report::{keys, MetricsMap, Report};
