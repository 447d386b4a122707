//! Common-mode rejection, from paired differential and common-mode runs.

use crate::error::Result;
use crate::numeric;
use crate::trace::{FrequencyTrace, TimeTrace};

/// Transient CMRR in dB: the ratio of output swings between a
/// differential-drive run and a common-mode-drive run of the same bench.
pub fn cmrr_tran(diff: &TimeTrace, cm: &TimeTrace) -> Result<f64> {
    let swing = |trace: &TimeTrace| -> Result<f64> {
        let output = trace.output()?;
        Ok(numeric::max(&output) - numeric::min(&output))
    };
    let ratio = swing(diff)? / swing(cm)?;
    Ok(20.0 * ratio.abs().log10())
}

/// AC CMRR in dB: the ratio of low-frequency complex gains between a
/// differential-drive run and a common-mode-drive run.
pub fn cmrr_ac(diff: &FrequencyTrace, cm: &FrequencyTrace) -> f64 {
    match (diff.signal().first(), cm.signal().first()) {
        (Some(d), Some(c)) => 20.0 * (d / c).norm().log10(),
        _ => 0.0,
    }
}
