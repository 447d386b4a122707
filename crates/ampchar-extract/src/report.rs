//! The characterization report: named metrics in extraction order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Metric values keyed by name, preserving insertion order.
pub type MetricsMap = IndexMap<String, f64>;

/// Metric name constants, as they appear in reports.
pub mod keys {
    /// Output voltage range over the linear region, in volts.
    pub const OUTPUT_SWING: &str = "output_swing";
    /// Worst-case input-referred offset, in volts.
    pub const OFFSET_VOLTAGE: &str = "offset_voltage";
    /// -3 dB bandwidth, in hertz.
    pub const BANDWIDTH: &str = "bandwidth";
    /// Unity-gain bandwidth, in hertz.
    pub const UNITY_GAIN_BANDWIDTH: &str = "unity_gain_bandwidth";
    /// Phase margin, in degrees.
    pub const PHASE_MARGIN: &str = "phase_margin";
    /// Low-frequency small-signal gain, in dB.
    pub const AC_GAIN: &str = "ac_gain";
    /// Input common-mode range, in volts.
    pub const ICMR: &str = "icmr";
    /// Static supply power, in watts. Omitted when undefined.
    pub const LEAKAGE_POWER: &str = "leakage_power";
    /// Transient gain, in dB.
    pub const TRAN_GAIN: &str = "tran_gain";
    /// Transient common-mode rejection ratio, in dB.
    pub const CMRR_TRAN: &str = "cmrr_tran";
    /// AC common-mode rejection ratio, in dB.
    pub const CMRR_AC: &str = "cmrr_ac";
}

/// A completed characterization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metric values, in extraction order.
    pub metrics: MetricsMap,
}

impl Report {
    /// Wrap a metrics map as a report.
    pub fn new(metrics: MetricsMap) -> Report {
        Report { metrics }
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render the report as an aligned, human-readable table with
    /// engineering units.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        for (key, &value) in &self.metrics {
            let (label, unit, scale) = display(key);
            out.push_str(&format!("{label:<24} {:>14.6} {unit}\n", value * scale));
        }
        out
    }
}

/// Display label, unit, and scale factor for a metric key.
fn display(key: &str) -> (&str, &'static str, f64) {
    match key {
        keys::OUTPUT_SWING => ("Output swing", "V", 1.0),
        keys::OFFSET_VOLTAGE => ("Offset voltage", "mV", 1e3),
        keys::BANDWIDTH => ("Bandwidth", "Hz", 1.0),
        keys::UNITY_GAIN_BANDWIDTH => ("Unity-gain bandwidth", "MHz", 1e-6),
        keys::PHASE_MARGIN => ("Phase margin", "deg", 1.0),
        keys::AC_GAIN => ("AC gain", "dB", 1.0),
        keys::ICMR => ("ICMR", "V", 1.0),
        keys::LEAKAGE_POWER => ("Leakage power", "mW", 1e3),
        keys::TRAN_GAIN => ("Transient gain", "dB", 1.0),
        keys::CMRR_TRAN => ("CMRR (transient)", "dB", 1.0),
        keys::CMRR_AC => ("CMRR (AC)", "dB", 1.0),
        other => (other, "", 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_preserves_metric_order() {
        let mut metrics = MetricsMap::new();
        metrics.insert(keys::OUTPUT_SWING.to_string(), 1.44);
        metrics.insert(keys::AC_GAIN.to_string(), 100.4);
        metrics.insert(keys::CMRR_AC.to_string(), 91.9);
        let json = Report::new(metrics).to_json().unwrap();
        let swing = json.find("output_swing").unwrap();
        let gain = json.find("ac_gain").unwrap();
        let cmrr = json.find("cmrr_ac").unwrap();
        assert!(swing < gain && gain < cmrr);
    }

    #[test]
    fn test_json_round_trip() {
        let mut metrics = MetricsMap::new();
        metrics.insert(keys::PHASE_MARGIN.to_string(), 54.5);
        let report = Report::new(metrics);
        let back: Report = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(back.metrics[keys::PHASE_MARGIN], 54.5);
    }

    #[test]
    fn test_table_applies_engineering_units() {
        let mut metrics = MetricsMap::new();
        metrics.insert(keys::UNITY_GAIN_BANDWIDTH.to_string(), 12.5e6);
        metrics.insert(keys::OFFSET_VOLTAGE.to_string(), 0.0004);
        let table = Report::new(metrics).render_table();
        assert!(table.contains("Unity-gain bandwidth"));
        assert!(table.contains("12.500000 MHz"));
        assert!(table.contains("0.400000 mV"));
    }
}
