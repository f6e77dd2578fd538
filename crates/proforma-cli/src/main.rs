mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::sensitivity::SensitivityArgs;
use commands::simulate::SimulateArgs;

/// Monte Carlo appraisal of development projects under bullet-loan financing
#[derive(Parser)]
#[command(
    name = "pfa",
    version,
    about = "Monte Carlo development-project appraisal",
    long_about = "Estimates profitability and risk of two alternative real-estate \
                  development projects for a borrower and a lender under a \
                  fixed-term bullet loan: scenario sampling of uncertain sales \
                  and costs, cash-flow assembly under the loan recourse rule, \
                  NPV discounting, comparative statistics, and lending-rate \
                  sensitivity analysis."
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
    /// Run the Monte Carlo appraisal of both projects
    Simulate(SimulateArgs),
    /// Evaluate expected loan value across candidate lending rates
    Sensitivity(SensitivityArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Version => {
            println!("pfa {}", env!("CARGO_PKG_VERSION"));
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
