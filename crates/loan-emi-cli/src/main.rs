mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::currency::{ConvertArgs, RatesArgs};
use commands::loan::{LoanArgs, ScheduleArgs};
use config::Settings;

/// Loan EMI calculator with amortization schedules and currency conversion
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan EMI calculator with amortization schedules and currency conversion",
    long_about = "Computes the equated monthly installment for a fixed-rate loan, its \
                  period-by-period amortization schedule, and optionally shows every \
                  monetary value in another currency using a rate snapshot file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: Settings,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug events to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the monthly installment (EMI)
    Emi(LoanArgs),
    /// Build the amortization schedule
    Schedule(ScheduleArgs),
    /// Loan summary plus full schedule with methodology and warnings
    Analyze(LoanArgs),
    /// Convert an amount from the base currency
    Convert(ConvertArgs),
    /// List exchange rates from the configured snapshot
    Rates(RatesArgs),
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

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = cli.settings;
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loan::run_emi(args, &settings),
        Commands::Schedule(args) => commands::loan::run_schedule(args, &settings),
        Commands::Analyze(args) => commands::loan::run_analyze(args, &settings),
        Commands::Convert(args) => commands::currency::run_convert(args, &settings),
        Commands::Rates(args) => commands::currency::run_rates(args, &settings),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
