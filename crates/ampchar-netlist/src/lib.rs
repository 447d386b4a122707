//! Circuit description model and testbench transformations.
//!
//! This crate turns one base amplifier description into the per-test
//! simulate-ready variants used by the characterization flow:
//! - a tolerant line classifier ([`line::Line`]) and immutable line-oriented
//!   [`Netlist`] model,
//! - [`Testbench`] builders that strip the embedded directive block, apply
//!   test-specific line rewrites (swept sources, unity-gain feedback, load
//!   stripping, common-mode excitation), and insert a fresh directive block
//!   before the `.end` terminator.
//!
//! Everything here is purely textual; no file is read or written and no
//! simulator is invoked.

pub mod bench;
pub mod error;
pub mod line;
pub mod netlist;

pub use bench::{files, BenchConfig, TestKind, Testbench};
pub use error::{Error, Result};
pub use line::{Line, LineKind};
pub use netlist::Netlist;
