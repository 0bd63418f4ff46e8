//! Emergency room triage simulator CLI
//!
//! Runs one simulation and prints the outcome counters, or the full run
//! report as JSON with `--json`.

use anyhow::{Context, Result};
use clap::Parser;
use er_triage_core_rs::{ConfigForm, SimulationConfig, Simulator};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "er-triage")]
#[command(about = "Discrete-event simulation of an emergency room triage process")]
#[command(version)]
struct Cli {
    /// JSON configuration file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of patients (blank or 0 keeps the configured value)
    #[arg(long, allow_hyphen_values = true)]
    patients: Option<String>,

    /// Number of treatment rooms (blank or 0 keeps the configured value)
    #[arg(long, allow_hyphen_values = true)]
    rooms: Option<String>,

    /// Minutes between arrivals (blank or 0 keeps the configured value)
    #[arg(long, allow_hyphen_values = true)]
    interval: Option<String>,

    /// Print the full run report as JSON
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(default_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("invalid log level '{}'", default_level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: SimulationConfig = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = load_config(cli.config.as_ref())?;
    let mut sim = Simulator::new(config).context("configuration rejected")?;

    let form = ConfigForm::new(
        cli.patients.unwrap_or_default(),
        cli.rooms.unwrap_or_default(),
        cli.interval.unwrap_or_default(),
    );
    if let Err(errors) = form.apply(&mut sim) {
        for error in &errors.0 {
            warn!(field = %error.field(), "{}", error);
            eprintln!("warning: {}", error);
        }
    }

    sim.initialize();
    let summary = sim.run().context("simulation aborted")?;

    if cli.json {
        let report = sim.report().context("failed to build run report")?;
        println!("{}", report.to_json()?);
    } else {
        print!("{}", summary);
    }

    Ok(())
}
