mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::plans::PlansArgs;
use commands::schedule::ScheduleArgs;
use commands::terms::DebtTermsArgs;
use crate::config::CliConfig;

/// Debt amortization schedules and payoff plans
#[derive(Parser)]
#[command(
    name = "dpc",
    version,
    about = "Debt amortization schedules and payoff plans",
    long_about = "A CLI for amortizing debts with decimal precision. Completes debt terms, \
                  builds single-debt tables and multi-debt schedules with rolling payments \
                  and extra principal, and compares payoff plans."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Complete a debt's minimum payment or life and its expected interest
    Terms(DebtTermsArgs),
    /// Month-by-month table for a single debt at its minimum payment
    Amortize(DebtTermsArgs),
    /// Schedule a portfolio of debts under a payoff plan
    Schedule(ScheduleArgs),
    /// Compare every payoff plan over the same debts
    Plans(PlansArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

/// Log to stderr so stdout stays parseable.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: invalid DPC_* configuration: {}", "warning".yellow().bold(), e);
            CliConfig::default()
        }
    };
    init_tracing(&config.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Terms(args) => commands::terms::run_terms(args),
        Commands::Amortize(args) => commands::terms::run_amortize(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args, &config),
        Commands::Plans(args) => commands::plans::run_plans(args, &config),
        Commands::Version => {
            println!("dpc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
