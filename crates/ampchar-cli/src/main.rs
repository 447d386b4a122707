//! Ampchar command-line interface.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use ampchar_extract::{is_ngspice_available, ngspice_version, Extractor, NgspiceConfig};
use ampchar_netlist::Netlist;

#[derive(Parser)]
#[command(name = "ampchar")]
#[command(about = "Amplifier characterization via ngspice", long_about = None)]
#[command(version)]
struct Cli {
    /// Input netlist file (the base amplifier bench)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Directory for per-stage simulation artifacts
    #[arg(short, long, default_value = "ampchar-work")]
    work_dir: PathBuf,

    /// Path to the ngspice executable
    #[arg(long, default_value = "ngspice")]
    ngspice: String,

    /// Per-simulation timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Emit the report as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let config = NgspiceConfig {
        executable: cli.ngspice.clone(),
        timeout_secs: cli.timeout,
    };
    if !is_ngspice_available(&config) {
        bail!("ngspice not found (looked for {:?})", cli.ngspice);
    }
    if cli.verbose {
        let version = ngspice_version(&config)?;
        eprintln!("Using {version}");
    }

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let base = Netlist::parse(&text);

    let extractor = Extractor::with_config(base, &cli.work_dir, Default::default(), config);
    let report = extractor
        .run_all()
        .context("characterization run failed")?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_table());
    }
    Ok(())
}
