//! Shared numeric helpers for the metric computations.

use crate::error::{Error, Result};

/// Numerical derivative dy/dx over possibly non-uniform samples.
///
/// Interior points use the second-order central difference for unequal
/// spacing; the endpoints use one-sided first-order differences.
pub fn gradient(y: &[f64], x: &[f64]) -> Result<Vec<f64>> {
    let n = y.len();
    debug_assert_eq!(n, x.len());
    if n < 2 {
        return Err(Error::TooFewRows { rows: n, needed: 2 });
    }

    let mut out = Vec::with_capacity(n);
    out.push((y[1] - y[0]) / (x[1] - x[0]));
    for i in 1..n - 1 {
        let hd = x[i] - x[i - 1];
        let hs = x[i + 1] - x[i];
        let a = -hs / (hd * (hd + hs));
        let b = (hs - hd) / (hd * hs);
        let c = hd / (hs * (hd + hs));
        out.push(a * y[i - 1] + b * y[i] + c * y[i + 1]);
    }
    out.push((y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]));
    Ok(out)
}

/// Unwrap a phase sequence in degrees.
///
/// Each successive delta is wrapped into (-180, 180] before accumulating,
/// so the result is continuous across the +/-180 boundary.
pub fn unwrap_degrees(phase: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(phase.len());
    let Some(&first) = phase.first() else {
        return out;
    };
    out.push(first);
    for i in 1..phase.len() {
        let delta = phase[i] - phase[i - 1];
        let wrapped = delta - 360.0 * ((delta + 180.0) / 360.0).floor();
        out.push(out[i - 1] + wrapped);
    }
    out
}

/// Maximum of a slice (negative infinity when empty).
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Minimum of a slice (positive infinity when empty).
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}
