//! DC-sweep metrics: output swing, input-referred offset, and ICMR.

use tracing::{debug, warn};

use crate::error::Result;
use crate::numeric::{self, gradient};
use crate::trace::TimeTrace;
use crate::{EDGE_TRIM, GAIN_EPSILON, PASSBAND_FRACTION};

/// Output swing from an output-swing sweep trace.
///
/// The point-wise small-signal gain is the numerical derivative of the
/// output with respect to the swept input, clamped away from zero before
/// conversion to dB. The mid-band reference is the gain at the sample where
/// the swept input equals `midband_vin` exactly; the passband is every
/// sample whose gain exceeds 0.8x that reference. The swing is the output
/// range over the passband.
///
/// Returns 0 when no mid-band sample or no passband sample exists.
pub fn output_swing(trace: &TimeTrace, midband_vin: f64) -> Result<f64> {
    trace.require_columns(4, "4 or more (output and swept input)")?;
    let output = trace.output()?;
    let vin = trace.second_signal()?;

    let gain_db: Vec<f64> = gradient(&output, &vin)?
        .into_iter()
        .map(|g| {
            let g = if g.abs() < GAIN_EPSILON { GAIN_EPSILON } else { g };
            20.0 * g.abs().log10()
        })
        .collect();

    let Some(mid) = vin.iter().position(|&v| v == midband_vin) else {
        debug!(midband_vin, "no sample at the mid-band input voltage");
        return Ok(0.0);
    };
    let gain_mid = gain_db[mid];
    debug!(gain_mid, "mid-band gain");

    let passband: Vec<f64> = gain_db
        .iter()
        .zip(&output)
        .filter(|(g, _)| **g > PASSBAND_FRACTION * gain_mid)
        .map(|(_, out)| *out)
        .collect();
    if passband.is_empty() {
        debug!("no samples above the passband gain threshold");
        return Ok(0.0);
    }
    Ok(numeric::max(&passband) - numeric::min(&passband))
}

/// Input-referred offset from an offset sweep trace.
///
/// Trims [`EDGE_TRIM`] rows from each end to avoid edge transients, then
/// returns the maximum |output - input| over the remainder.
pub fn offset_voltage(trace: &TimeTrace) -> Result<f64> {
    let input = trace.scale()?;
    let output = trace.output()?;
    let (input, output) = (trim(&input)?, trim(&output)?);

    let worst = input
        .iter()
        .zip(output)
        .map(|(i, o)| (o - i).abs())
        .fold(f64::NEG_INFINITY, f64::max);
    Ok(worst)
}

/// Input common-mode range from an ICMR sweep trace.
///
/// After edge trimming, the quiescent supply current is read at the sample
/// where the swept input equals `midband_vin` exactly. The linear region is
/// the intersection of the input sub-range where the supply current stays
/// above 90% of quiescent and the sub-range where |output - input| stays
/// below 90% of its overall maximum. When only the current-based range
/// exists, the upper bound is taken as the `rail` voltage. Degenerate
/// sweeps report 0.
pub fn icmr(trace: &TimeTrace, midband_vin: f64, rail: f64) -> Result<f64> {
    trace.require_columns(4, "4 or more (output and supply current)")?;
    let input = trim(&trace.scale()?)?;
    let output = trim(&trace.output()?)?;
    let current: Vec<f64> = trim(&trace.second_signal()?)?
        .iter()
        .map(|i| i.abs())
        .collect();

    let Some(mid) = input.iter().position(|&v| v == midband_vin) else {
        warn!(midband_vin, "no sample at the reference common-mode point");
        return Ok(0.0);
    };
    let quiescent = current[mid];
    debug!(quiescent, "quiescent supply current");

    let current_floor = quiescent - quiescent * 0.1;
    let offset: Vec<f64> = input
        .iter()
        .zip(&output)
        .map(|(i, o)| (o - i).abs())
        .collect();
    let offset_ceiling = numeric::max(&offset) * 0.9;

    let current_ok: Vec<usize> = (0..input.len())
        .filter(|&i| current[i] > current_floor)
        .collect();
    let offset_ok: Vec<usize> = (0..input.len())
        .filter(|&i| offset[i] < offset_ceiling)
        .collect();

    match (current_ok.first(), offset_ok.first()) {
        (Some(&ci), Some(&oi)) => {
            let lower = input[ci].max(input[oi]);
            let upper = input[*current_ok.last().unwrap_or(&ci)]
                .min(input[*offset_ok.last().unwrap_or(&oi)]);
            Ok(upper - lower)
        }
        (Some(&ci), None) => Ok(rail - input[ci]),
        _ => {
            warn!("no valid range found for ICMR");
            Ok(0.0)
        }
    }
}

/// Drop [`EDGE_TRIM`] samples from each end.
fn trim(values: &[f64]) -> Result<Vec<f64>> {
    let needed = 2 * EDGE_TRIM + 1;
    if values.len() < needed {
        return Err(crate::error::Error::TooFewRows {
            rows: values.len(),
            needed,
        });
    }
    Ok(values[EDGE_TRIM..values.len() - EDGE_TRIM].to_vec())
}
