//! Anonset demonstration driver.
//!
//! Generates a random wallet and a set of payments, runs the coin selector
//! many times and prints the distinct best-scoring selections.

mod generate;

use anonset_common::config::{self, Config};
use anonset_common::logging::{self, LogLevel};
use anonset_common::{CoinSelector, ProbabilityScaling, TrialReport, TrialRunner};
use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "anonset")]
#[command(about = "Select coins for payments, spending weak-privacy coins first")]
struct Cli {
    /// Path to a TOML configuration file (created with defaults if missing)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of selection runs
    #[arg(short, long)]
    trials: Option<usize>,

    /// Base seed for input generation and every trial
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of coins to generate
    #[arg(long)]
    coins: Option<usize>,

    /// Number of payments to generate
    #[arg(short, long)]
    payments: Option<usize>,

    /// Use literal probability scaling
    #[arg(long)]
    literal: bool,

    /// Print the best solutions as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            config::ensure_config_exists(path)?;
            Config::load(path)?
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    let mut log_config = config.logging.to_log_config();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    logging::init(&log_config).map_err(anyhow::Error::msg)?;

    let mut rng = match config.trials.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let coins = generate::coins(&config.generator, cli.coins, &mut rng);
    let payments = generate::payments(&config.generator, cli.payments, &mut rng);

    let selector = CoinSelector::new(config.selection_params()?);
    let report = TrialRunner::from_config(&config.trials).run(&selector, &coins, &payments)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.best)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(trials) = cli.trials {
        config.trials.count = trials;
    }
    if let Some(seed) = cli.seed {
        config.trials.seed = Some(seed);
    }
    if cli.literal {
        config.selection.probability_scaling = ProbabilityScaling::Literal;
    }
}

fn print_report(report: &TrialReport) {
    println!("=== Attempts (seed {}) ===", report.seed);
    for (i, solution) in report.attempts.iter().enumerate() {
        println!("--- Attempt {} ---", i + 1);
        println!("{}", solution);
    }

    println!();
    println!("Total attempts: {}", report.attempts.len());
    println!("After dedup: {}", report.unique.len());
    println!(
        "Handling all {} payments: {}",
        report.pending_payments,
        report.fully_handled().len()
    );

    println!();
    println!("=== Best solutions ===");
    if report.best.is_empty() {
        println!("(none)");
    }
    for solution in &report.best {
        println!("{}", solution);
    }
}
