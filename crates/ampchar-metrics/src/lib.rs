//! Performance-metric computations over simulator output traces.
//!
//! The input model is the delimited tables the simulator writes: one
//! header row followed by numeric columns, with every recorded signal
//! carrying its own copy of the scale column. [`trace`] parses those into
//! [`TimeTrace`] and [`FrequencyTrace`]; the [`dc`], [`ac`], [`tran`], and
//! [`cmrr`] modules compute the individual metrics from them.

pub mod ac;
pub mod cmrr;
pub mod dc;
pub mod error;
pub mod numeric;
pub mod tran;
pub mod trace;

pub use error::{Error, Result};
pub use trace::{FrequencyTrace, Table, TimeTrace};

/// Floor applied to the point-wise DC gain before conversion to dB.
pub const GAIN_EPSILON: f64 = 1e-10;

/// Rows discarded from each end of a DC sweep before windowed metrics.
pub const EDGE_TRIM: usize = 19;

/// Maximum sample-to-sample supply-current change still considered static.
pub const STATIC_CURRENT_STEP: f64 = 5e-7;

/// Peak-to-peak amplitude of the transient stimulus, in volts.
pub const TRAN_REFERENCE_AMPLITUDE: f64 = 2e-6;

/// Fraction of the mid-band gain that defines the DC passband.
pub const PASSBAND_FRACTION: f64 = 0.8;

/// Tolerance used to classify the starting phase of an AC sweep.
pub const PHASE_TOLERANCE_DEG: f64 = 15.0;
