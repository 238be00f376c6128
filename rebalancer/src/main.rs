//! CLI entry point for the cryptodex rebalancer.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use cryptodex::Side;
use cryptodex_rebalancer::config::Config;
use cryptodex_rebalancer::error::{Error, Result};
use cryptodex_rebalancer::execution::{self, RunOptions};

#[derive(Parser)]
#[command(name = "cryptodex")]
#[command(about = "Square-root market-cap crypto index rebalancer")]
#[command(version)]
struct Cli {
    /// Path to the strategy file
    #[arg(long, default_value = "strategy.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show current holdings, allocation and drift
    Balance,

    /// Re-read balances and prices
    Refresh,

    /// Add funds and buy towards target
    Buy(InvestArgs),

    /// Withdraw funds by selling towards target
    Sell(InvestArgs),
}

#[derive(Args)]
struct InvestArgs {
    /// Amount of currency to invest or withdraw
    #[arg(long, default_value_t = 0.0)]
    amount: f64,

    /// Show the predicted portfolio before confirming
    #[arg(long)]
    estimate: bool,

    /// Only spend the amount, do not rebalance existing holdings
    #[arg(long)]
    no_rebalance: bool,

    /// Execute orders (default only validates them)
    #[arg(long)]
    live: bool,

    /// Skip confirmation prompt
    #[arg(long)]
    force: bool,
}

impl InvestArgs {
    fn into_options(self, side: Side) -> Result<RunOptions> {
        Ok(RunOptions {
            amount: execution::signed_amount(self.amount, side)?,
            rebalance: !self.no_rebalance,
            estimate: self.estimate,
            live: self.live,
            force: self.force,
        })
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Balance => execution::show_balance(&config),
        Command::Refresh => execution::refresh(&config),
        Command::Buy(args) => args
            .into_options(Side::Buy)
            .and_then(|opts| execution::invest(&config, &opts)),
        Command::Sell(args) => args
            .into_options(Side::Sell)
            .and_then(|opts| execution::invest(&config, &opts)),
    };

    if let Err(e) = result {
        match &e {
            Error::LimitExceeded(msg) => {
                eprintln!("\nAborted: {msg}");
                process::exit(2);
            }
            Error::Aborted(msg) => {
                eprintln!("Aborted: {msg}");
                process::exit(0);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}
