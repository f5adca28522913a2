use anyhow::Context;
use chrono::Local;
use clap::{ArgAction, Parser};
use outlook::config::DashboardConfig;
use outlook::{pipeline, report};
use rand::rngs::StdRng;
use rand::SeedableRng;
use revenue_forecast::indicator::FredClient;
use revenue_forecast::Horizon;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quarterly revenue forecast and risk dashboard
#[derive(Debug, Parser)]
#[command(name = "outlook", version, about)]
struct Cli {
    /// Quarters to forecast (1-8); prompts when omitted on a terminal
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=8))]
    quarters: Option<u8>,

    /// Seed for the simulated series
    #[arg(long)]
    seed: Option<u64>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the indicator download
    #[arg(long)]
    offline: bool,

    /// Print the dashboard as JSON
    #[arg(long)]
    json: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_horizon(quarters: Option<u8>) -> anyhow::Result<Horizon> {
    if let Some(quarters) = quarters {
        return Ok(Horizon::new(quarters.into())?);
    }
    if !io::stdin().is_terminal() {
        return Ok(Horizon::default());
    }

    let choices: Vec<usize> = (Horizon::MIN..=Horizon::MAX).collect();
    let default_index = Horizon::default().get() - Horizon::MIN;
    let quarters = inquire::Select::new("Select number of quarters to forecast:", choices)
        .with_starting_cursor(default_index)
        .prompt()
        .context("reading forecast horizon")?;

    Ok(Horizon::new(quarters)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_toml_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if cli.offline {
        config.indicator.enabled = false;
    }

    let horizon = resolve_horizon(cli.quarters)?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let client = FredClient::with_base_url(&config.indicator.base_url)
        .context("building HTTP client")?;

    let dashboard = pipeline::run(
        &config,
        horizon,
        Local::now().date_naive(),
        &mut rng,
        &client,
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        writeln!(out, "{}", report::to_json(&dashboard)?)?;
    } else {
        report::render(&dashboard, &mut out)?;
    }

    Ok(())
}
