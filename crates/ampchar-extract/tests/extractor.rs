//! End-to-end extraction against a stub simulator.
//!
//! The stub stands in for ngspice: it scans the netlist it is handed for
//! `wrdata` output file names and copies canned traces into the working
//! directory, picking the common-mode variants when the netlist carries the
//! common-mode excitation. This exercises the whole pipeline -- bench
//! construction, per-stage directories, artifact preservation, trace
//! parsing, and metric assembly -- without a simulator install.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use approx::assert_relative_eq;

use ampchar_extract::{keys, Extractor, NgspiceConfig};
use ampchar_netlist::{Netlist, Testbench};

const BASE: &str = "* two-stage op-amp bench\n\
                    Vdd vdd 0 DC 1.8\n\
                    Vcm cm 0 DC 0.9\n\
                    Vid diffin 0 DC 0 AC 1\n\
                    Eidp in2 cm diffin 0 0.5\n\
                    Eidn in1 cm diffin 0 -0.5\n\
                    M1 d1 in1 tail 0 nmos\n\
                    M2 d2 in2 tail 0 nmos\n\
                    M4 out in1 0 0 nmos\n\
                    Rl out 0 100k\n\
                    Cl out 0 1p\n\
                    .end\n";

/// A plain 2-column sweep, enough to satisfy the DC stage's artifact check.
fn dc_fixture() -> String {
    let mut text = String::from("v out\n");
    for i in 0..10 {
        let v = i as f64 / 5.0;
        text.push_str(&format!("{v} {v}\n"));
    }
    text
}

/// Output-swing sweep with out = 2 * vin: constant gain, full passband,
/// swing 3.6 V.
fn ow_fixture() -> String {
    let mut text = String::from("v out v in1\n");
    for i in 0..19 {
        let vin = i as f64 / 10.0;
        text.push_str(&format!("{vin} {} {vin} {vin}\n", 2.0 * vin));
    }
    text
}

/// Offset sweep with a constant 1 mV offset.
fn offset_fixture() -> String {
    let mut text = String::from("v out\n");
    for i in 0..50 {
        let vin = i as f64 / 40.0;
        text.push_str(&format!("{vin} {}\n", vin + 0.001));
    }
    text
}

/// One decade per row, magnitudes chosen so that the reference gain is
/// 100 dB, the -3 dB corner sits at the second sample, and the 0 dB
/// crossing interpolates to 5.5 MHz.
fn ac_fixture() -> String {
    let freqs = [1.0, 10.0, 100.0, 1e3, 1e4, 1e5, 1e6, 1e7];
    let dbs = [100.0, 100.0, 80.0, 60.0, 40.0, 20.0, 10.0, -10.0];
    let mut text = String::from("freq re im\n");
    for (f, db) in freqs.iter().zip(dbs) {
        text.push_str(&format!("{f} {} 0.0\n", 10f64.powf(db / 20.0)));
    }
    text
}

/// ICMR sweep where the output tracks the input and the supply current
/// never drops: only the current-based range exists.
fn icmr_fixture() -> String {
    let mut text = String::from("v out v idd\n");
    for i in 0..73 {
        let vin = i as f64 / 40.0;
        text.push_str(&format!("{vin} {vin} {vin} 1e-3\n"));
    }
    text
}

/// Transient run with a 0.2 V output swing and a settled 5 mA supply
/// current.
fn tran_fixture() -> String {
    let pattern = [0.9, 1.0, 0.9, 0.8];
    let mut text = String::from("t out t idd t vin\n");
    for i in 0..8 {
        let t = i as f64 * 50e-9;
        let out = pattern[i % 4];
        text.push_str(&format!("{t} {out} {t} 5e-3 {t} 0.9\n"));
    }
    text
}

/// Lay out the canned traces and the stub executable; returns the stub path.
fn install_stub(root: &Path) -> std::path::PathBuf {
    let diff = root.join("fixtures/diff");
    let cm = root.join("fixtures/cm");
    fs::create_dir_all(&diff).unwrap();
    fs::create_dir_all(&cm).unwrap();

    fs::write(diff.join("output_dc.dat"), dc_fixture()).unwrap();
    fs::write(diff.join("output_dc_ow.dat"), ow_fixture()).unwrap();
    fs::write(diff.join("output_dc_offset.dat"), offset_fixture()).unwrap();
    fs::write(diff.join("output_ac.dat"), ac_fixture()).unwrap();
    fs::write(diff.join("output_dc_icmr.dat"), icmr_fixture()).unwrap();
    fs::write(diff.join("output_tran.dat"), tran_fixture()).unwrap();
    // Identical common-mode responses: both CMRR metrics come out as 0 dB.
    fs::write(cm.join("output_ac.dat"), ac_fixture()).unwrap();
    fs::write(cm.join("output_tran.dat"), tran_fixture()).unwrap();

    let stub = root.join("ngspice-stub");
    let script = format!(
        "#!/bin/sh\n\
         # args: -b -o <log> <netlist>\n\
         net=\"$4\"\n\
         : > \"$3\"\n\
         if grep -q 'SIN(0 1u' \"$net\"; then mode=cm; else mode=diff; fi\n\
         for f in `grep -o 'output[a-z_]*\\.dat' \"$net\" | sort -u`; do\n\
         \tcp \"{}/$mode/$f\" \"$f\"\n\
         done\n\
         exit 0\n",
        root.join("fixtures").display()
    );
    fs::write(&stub, script).unwrap();
    fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();
    stub
}

#[test]
fn test_full_run_produces_all_metrics_in_order() {
    let root = tempfile::tempdir().unwrap();
    let stub = install_stub(root.path());
    let config = NgspiceConfig {
        executable: stub.to_string_lossy().into_owned(),
        timeout_secs: 10,
    };
    let work = root.path().join("run");
    let extractor = Extractor::with_config(
        Netlist::parse(BASE),
        &work,
        Testbench::default(),
        config,
    );

    let report = extractor.run_all().unwrap();
    let m = &report.metrics;

    let order: Vec<&str> = m.keys().map(String::as_str).collect();
    assert_eq!(
        order,
        vec![
            keys::OUTPUT_SWING,
            keys::OFFSET_VOLTAGE,
            keys::BANDWIDTH,
            keys::UNITY_GAIN_BANDWIDTH,
            keys::PHASE_MARGIN,
            keys::AC_GAIN,
            keys::ICMR,
            keys::LEAKAGE_POWER,
            keys::TRAN_GAIN,
            keys::CMRR_TRAN,
            keys::CMRR_AC,
        ]
    );

    assert_relative_eq!(m[keys::OUTPUT_SWING], 3.6, epsilon = 1e-9);
    assert_relative_eq!(m[keys::OFFSET_VOLTAGE], 0.001, epsilon = 1e-12);
    assert_relative_eq!(m[keys::BANDWIDTH], 9.0, epsilon = 1e-9);
    assert_relative_eq!(m[keys::UNITY_GAIN_BANDWIDTH], 5.5e6, epsilon = 1.0);
    assert_relative_eq!(m[keys::PHASE_MARGIN], 180.0, epsilon = 1e-9);
    assert_relative_eq!(m[keys::AC_GAIN], 100.0, epsilon = 1e-9);
    assert_relative_eq!(m[keys::ICMR], 1.8 - 0.475, epsilon = 1e-9);
    assert_relative_eq!(m[keys::LEAKAGE_POWER], 9e-3, epsilon = 1e-12);
    assert_relative_eq!(m[keys::TRAN_GAIN], 100.0, epsilon = 1e-9);
    assert_relative_eq!(m[keys::CMRR_TRAN], 0.0, epsilon = 1e-9);
    assert_relative_eq!(m[keys::CMRR_AC], 0.0, epsilon = 1e-9);
}

#[test]
fn test_stages_run_in_isolated_directories() {
    let root = tempfile::tempdir().unwrap();
    let stub = install_stub(root.path());
    let config = NgspiceConfig {
        executable: stub.to_string_lossy().into_owned(),
        timeout_secs: 10,
    };
    let work = root.path().join("run");
    let extractor = Extractor::with_config(
        Netlist::parse(BASE),
        &work,
        Testbench::default(),
        config,
    );
    extractor.run_all().unwrap();

    assert!(work.join("dc/output_dc.dat").is_file());
    assert!(work.join("dc/output_dc_ow.dat").is_file());
    assert!(work.join("offset/output_dc_offset.dat").is_file());
    assert!(work.join("ac/output_ac.dat").is_file());
    assert!(work.join("icmr/output_dc_icmr.dat").is_file());
    assert!(work.join("tran/output_tran.dat").is_file());
    // The common-mode stage preserves both drives of both analyses.
    assert!(work.join("common_mode/output_ac_diff.dat").is_file());
    assert!(work.join("common_mode/output_ac_cm.dat").is_file());
    assert!(work.join("common_mode/output_tran_diff.dat").is_file());
    assert!(work.join("common_mode/output_tran_cm.dat").is_file());
    // Each stage leaves its netlist and log behind for inspection.
    assert!(work.join("dc/dc_sweep.cir").is_file());
    assert!(work.join("common_mode/common_mode.cir").is_file());
}

#[test]
fn test_missing_artifact_is_a_stage_error() {
    let root = tempfile::tempdir().unwrap();
    // A stub that runs successfully but writes nothing.
    let stub = root.path().join("ngspice-stub");
    fs::write(&stub, "#!/bin/sh\n: > \"$3\"\nexit 0\n").unwrap();
    fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();
    let config = NgspiceConfig {
        executable: stub.to_string_lossy().into_owned(),
        timeout_secs: 10,
    };
    let extractor = Extractor::with_config(
        Netlist::parse(BASE),
        root.path().join("run"),
        Testbench::default(),
        config,
    );
    match extractor.run_all().unwrap_err() {
        ampchar_extract::Error::Stage { stage, source } => {
            assert_eq!(stage, ampchar_extract::Stage::Dc);
            assert!(matches!(
                *source,
                ampchar_extract::Error::MissingArtifact { .. }
            ));
        }
        other => panic!("expected a stage error, got {other}"),
    }
}
