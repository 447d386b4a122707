//! ngspice process runner.
//!
//! Each simulation runs in its own working directory so that the fixed
//! output file names the directive blocks request cannot collide between
//! stages.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};

/// Configuration for the ngspice runner.
#[derive(Debug, Clone)]
pub struct NgspiceConfig {
    /// Path to ngspice executable (default: "ngspice" in PATH).
    pub executable: String,
    /// Timeout for ngspice execution in seconds.
    pub timeout_secs: u64,
}

impl Default for NgspiceConfig {
    fn default() -> Self {
        Self {
            executable: "ngspice".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Check if ngspice is available.
pub fn is_ngspice_available(config: &NgspiceConfig) -> bool {
    Command::new(&config.executable)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Get ngspice version string.
pub fn ngspice_version(config: &NgspiceConfig) -> Result<String> {
    let output = Command::new(&config.executable)
        .arg("--version")
        .output()
        .map_err(|e| Error::NgspiceNotFound(e.to_string()))?;

    if !output.status.success() {
        return Err(Error::NgspiceNotFound("--version failed".to_string()));
    }

    let version = String::from_utf8_lossy(&output.stdout);
    Ok(version.lines().next().unwrap_or("unknown").to_string())
}

/// Run a netlist through ngspice in batch mode inside `dir`.
///
/// The netlist is written to `<name>.cir` and the simulator log to
/// `<name>.log`, both in `dir`. Output files requested by `wrdata`
/// directives land in `dir` as well, since the process runs with `dir` as
/// its working directory.
pub fn run_ngspice(netlist: &str, dir: &Path, name: &str, config: &NgspiceConfig) -> Result<()> {
    let cir = format!("{name}.cir");
    let log = format!("{name}.log");
    std::fs::write(dir.join(&cir), netlist)?;

    debug!(dir = %dir.display(), name, "invoking ngspice");
    let mut cmd = Command::new(&config.executable);
    cmd.arg("-b")
        .arg("-o")
        .arg(&log)
        .arg(&cir)
        .current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let child = cmd.spawn().map_err(|e| Error::NgspiceNotFound(e.to_string()))?;
    let output = wait_with_timeout(child, Duration::from_secs(config.timeout_secs))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let log_tail = std::fs::read_to_string(dir.join(&log))
            .map(|text| tail(&text, 10))
            .unwrap_or_default();
        return Err(Error::SimulationFailure(format!(
            "ngspice exited with {}\nstderr: {}\nlog: {}",
            output.status, stderr, log_tail
        )));
    }
    Ok(())
}

/// Last `lines` lines of a log, for error reporting.
fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

/// Wait for a child process with timeout.
fn wait_with_timeout(
    mut child: std::process::Child,
    timeout: Duration,
) -> Result<std::process::Output> {
    use std::thread;

    let start = std::time::Instant::now();
    let poll_interval = Duration::from_millis(100);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = child
                    .stdout
                    .take()
                    .map(|mut s| {
                        let mut buf = Vec::new();
                        std::io::Read::read_to_end(&mut s, &mut buf).ok();
                        buf
                    })
                    .unwrap_or_default();

                let stderr = child
                    .stderr
                    .take()
                    .map(|mut s| {
                        let mut buf = Vec::new();
                        std::io::Read::read_to_end(&mut s, &mut buf).ok();
                        buf
                    })
                    .unwrap_or_default();

                return Ok(std::process::Output {
                    status,
                    stdout,
                    stderr,
                });
            }
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    return Err(Error::Timeout(timeout.as_secs()));
                }
                thread::sleep(poll_interval);
            }
            Err(e) => {
                return Err(Error::SimulationFailure(e.to_string()));
            }
        }
    }
}
