mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::debit::{NextDebitArgs, OccurrencesArgs, ScheduleArgs};

/// Resolve scheduled loan debits
#[derive(Parser)]
#[command(
    name = "nextdebit",
    version,
    about = "Resolve the next scheduled loan debit",
    long_about = "Computes when the next payment on a biweekly repayment schedule will be \
                  pulled and how much it will be, splitting the loan's monthly amount across \
                  the debits that fall in each calendar month."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log resolution steps to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the next debit date and amount for a loan
    NextDebit(NextDebitArgs),
    /// List the upcoming debits for a loan
    Schedule(ScheduleArgs),
    /// Show the month-grouped biweekly occurrence table
    Occurrences(OccurrencesArgs),
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
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::NextDebit(args) => commands::debit::run_next_debit(args),
        Commands::Schedule(args) => commands::debit::run_schedule(args),
        Commands::Occurrences(args) => commands::debit::run_occurrences(args),
        Commands::Version => {
            println!("nextdebit {}", env!("CARGO_PKG_VERSION"));
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
