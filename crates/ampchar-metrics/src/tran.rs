//! Transient metrics: small-signal gain and static power draw.

use tracing::debug;

use crate::error::Result;
use crate::numeric;
use crate::trace::TimeTrace;
use crate::{STATIC_CURRENT_STEP, TRAN_REFERENCE_AMPLITUDE};

/// Transient gain in dB.
///
/// The output's peak-to-peak swing is referred to the stimulus amplitude
/// (2 µV peak-to-peak). The trace must carry exactly the output, the
/// supply current, and the monitored input.
pub fn tran_gain(trace: &TimeTrace) -> Result<f64> {
    if trace.num_columns() != 6 {
        return Err(crate::error::Error::Layout {
            found: trace.num_columns(),
            expected: "exactly 6 (output, supply current, and input)",
        });
    }
    let output = trace.output()?;
    let swing = numeric::max(&output) - numeric::min(&output);
    Ok(20.0 * (swing.abs() / TRAN_REFERENCE_AMPLITUDE).log10())
}

/// Static power drawn from the supply, if any static interval exists.
///
/// Samples where the supply current changes by at most
/// [`STATIC_CURRENT_STEP`] from the previous sample are treated as static.
/// The power is |mean static current| times `vdd`. Returns `None` when the
/// current never settles, leaving the metric undefined.
pub fn leakage_power(trace: &TimeTrace, vdd: f64) -> Result<Option<f64>> {
    trace.require_columns(4, "4 or more (output and supply current)")?;
    let current = trace.second_signal()?;

    let statics: Vec<f64> = current
        .windows(2)
        .filter(|w| (w[1] - w[0]).abs() <= STATIC_CURRENT_STEP)
        .map(|w| w[1])
        .collect();
    if statics.is_empty() {
        debug!("supply current never settles, leakage power undefined");
        return Ok(None);
    }
    let mean = statics.iter().sum::<f64>() / statics.len() as f64;
    Ok(Some((mean * vdd).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::trace::TimeTrace;

    fn tran_trace(output: &[f64], current: &[f64]) -> TimeTrace {
        let mut text = String::from("t out t idd t vin\n");
        for (i, (o, c)) in output.iter().zip(current).enumerate() {
            let t = i as f64 * 50e-9;
            text.push_str(&format!("{t} {o} {t} {c} {t} 0.9\n"));
        }
        TimeTrace::parse(&text).unwrap()
    }

    #[test]
    fn test_tran_gain_refers_swing_to_the_stimulus() {
        // 0.2 V peak-to-peak against a 2 uV stimulus: gain of 1e5 = 100 dB.
        let output = vec![0.9, 1.0, 0.9, 0.8, 0.9];
        let current = vec![1e-3; 5];
        let trace = tran_trace(&output, &current);
        assert_relative_eq!(tran_gain(&trace).unwrap(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tran_gain_rejects_other_layouts() {
        let trace = TimeTrace::parse("t out\n0.0 1.0\n1.0 2.0\n").unwrap();
        assert!(matches!(
            tran_gain(&trace),
            Err(crate::error::Error::Layout { found: 2, .. })
        ));
    }

    #[test]
    fn test_leakage_power_averages_static_samples() {
        // Current settles at 5 mA after an initial transient.
        let output = vec![0.9; 6];
        let current = vec![0.0, 2e-3, 5e-3, 5e-3, 5e-3, 5e-3];
        let trace = tran_trace(&output, &current);
        let power = leakage_power(&trace, 1.8).unwrap().unwrap();
        assert_relative_eq!(power, 5e-3 * 1.8, epsilon = 1e-12);
    }

    #[test]
    fn test_leakage_power_undefined_when_current_never_settles() {
        let output = vec![0.9; 5];
        let current = vec![0.0, 1e-3, 2e-3, 3e-3, 4e-3];
        let trace = tran_trace(&output, &current);
        assert_eq!(leakage_power(&trace, 1.8).unwrap(), None);
    }

    #[test]
    fn test_leakage_power_takes_magnitude_of_negative_current() {
        let output = vec![0.9; 4];
        let current = vec![-5e-3; 4];
        let trace = tran_trace(&output, &current);
        let power = leakage_power(&trace, 1.8).unwrap().unwrap();
        assert_relative_eq!(power, 5e-3 * 1.8, epsilon = 1e-12);
    }
}
