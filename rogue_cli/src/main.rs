//! rogue_cli - Print DPS, damage breakdowns and stat weights for a build file

mod report;

use clap::Parser;
use report::Report;
use rogue_core::{default_catalog, load_build, ConfigError, DpsError, RogueDamageCalculator};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::debug;

/// Steady-state rogue DPS report
#[derive(Parser, Debug)]
#[command(name = "rogue_cli")]
#[command(about = "Estimate steady-state rogue DPS for a build file", long_about = None)]
#[command(version)]
struct Cli {
    /// Build file (TOML)
    #[arg(short, long)]
    build: PathBuf,

    /// Include stat weights
    #[arg(long)]
    ep: bool,

    /// Include talent, glyph, gear and weapon rankings
    #[arg(long)]
    rankings: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Model(#[from] DpsError),
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let catalog = default_catalog()?;
    debug!(procs = catalog.len(), "Loaded proc catalog");
    let build = load_build(&cli.build)?;
    debug!(path = %cli.build.display(), "Loaded build");

    let calculator = RogueDamageCalculator::new(&build);
    let mut report = Report::new(calculator.get_dps_breakdown()?);
    if cli.ep {
        report.with_ep(&calculator)?;
    }
    if cli.rankings {
        report.with_rankings(&calculator, catalog)?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
