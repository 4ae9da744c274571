mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::bond::{BondArgs, PriceArgs};

/// Bond yield, current yield and cash-flow schedule calculations
#[derive(Parser)]
#[command(
    name = "bondcalc",
    version,
    about = "Bond yield to maturity, current yield and cash-flow schedules",
    long_about = "Values a bullet bond from its face value, coupon rate, market price, \
                  maturity and payment frequency. Solves yield to maturity by bisection \
                  with decimal precision and prints the full coupon schedule."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Solver configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log solver progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full valuation: current yield, YTM, total interest, premium/discount, schedule
    Calculate(BondArgs),
    /// Cash-flow schedule only
    Schedule(BondArgs),
    /// Price the bond at a given annual yield
    Price(PriceArgs),
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
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let solver_config = match config::load_solver_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::bond::run_calculate(args, &solver_config),
        Commands::Schedule(args) => commands::bond::run_schedule(args),
        Commands::Price(args) => commands::bond::run_price(args),
        Commands::Version => {
            println!("bondcalc {}", env!("CARGO_PKG_VERSION"));
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
