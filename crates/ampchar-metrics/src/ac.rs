//! Frequency-domain metrics: bandwidth, unity-gain bandwidth, phase
//! margin, and low-frequency gain.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::numeric::unwrap_degrees;
use crate::trace::FrequencyTrace;
use crate::PHASE_TOLERANCE_DEG;

/// -3 dB bandwidth of a frequency sweep.
///
/// The reference level is the magnitude of the first sample. The result is
/// the frequency span between the first and last samples whose magnitude
/// stays within 3 dB of the reference, or 0 when no sample qualifies.
pub fn bandwidth(trace: &FrequencyTrace) -> f64 {
    let mag_db = trace.magnitude_db();
    let Some(&reference) = mag_db.first() else {
        return 0.0;
    };
    let threshold = reference - 3.0;
    let freq = trace.frequency();
    let mut first = None;
    let mut last = None;
    for (i, &m) in mag_db.iter().enumerate() {
        if m >= threshold {
            if first.is_none() {
                first = Some(i);
            }
            last = Some(i);
        }
    }
    match (first, last) {
        (Some(lo), Some(hi)) => freq[hi] - freq[lo],
        _ => 0.0,
    }
}

/// Unity-gain bandwidth: the frequency where the magnitude crosses 0 dB.
///
/// The crossing is located at the first sample at or below 0 dB and
/// refined by linear interpolation against its predecessor. Fails when the
/// magnitude never reaches 0 dB, or when the very first sample is already
/// below it (no bracket to interpolate in).
pub fn unity_gain_bandwidth(trace: &FrequencyTrace) -> Result<f64> {
    let mag_db = trace.magnitude_db();
    let idx = mag_db
        .iter()
        .position(|&m| m <= 0.0)
        .ok_or(Error::NoUnityCrossing)?;
    if idx == 0 {
        return Err(Error::NoUnityCrossing);
    }
    let freq = trace.frequency();
    let (f1, f2) = (freq[idx - 1], freq[idx]);
    let (g1, g2) = (mag_db[idx - 1], mag_db[idx]);
    Ok(f1 + (0.0 - g1) * (f2 - f1) / (g2 - g1))
}

/// Phase margin in degrees.
///
/// The phase is unwrapped, then read at the sample where the magnitude is
/// closest to 0 dB. An inverting response (starting phase near 180°)
/// reports that phase directly; a non-inverting response (starting phase
/// near 0°) reports 180° minus its absolute value. Any other starting
/// phase reports 0.
pub fn phase_margin(trace: &FrequencyTrace) -> f64 {
    let mag_db = trace.magnitude_db();
    let phase = unwrap_degrees(&trace.phase_deg());
    let Some(&start) = phase.first() else {
        return 0.0;
    };

    let mut idx = 0;
    let mut best = f64::INFINITY;
    for (i, &m) in mag_db.iter().enumerate() {
        if m.abs() < best {
            best = m.abs();
            idx = i;
        }
    }
    let at_crossing = phase[idx];
    debug!(at_crossing, start, "phase at the unity-gain point");

    if (start - 180.0).abs() <= PHASE_TOLERANCE_DEG {
        at_crossing
    } else if start.abs() <= PHASE_TOLERANCE_DEG {
        180.0 - at_crossing.abs()
    } else {
        warn!(start, "starting phase is neither near 0 nor near 180 degrees");
        0.0
    }
}

/// Low-frequency gain in dB: the magnitude of the first sample.
pub fn ac_gain(trace: &FrequencyTrace) -> f64 {
    match trace.signal().first() {
        Some(c) => 20.0 * c.norm().log10(),
        None => 0.0,
    }
}
