use clap::Args;
use serde_json::Value;

use proforma_core::sensitivity::{self, SensitivityInput};

use crate::input;

/// Arguments for lending-rate sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to a JSON input file (takes precedence over the flag grid)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<f64>,

    /// Loan term in years
    #[arg(long, default_value_t = 3)]
    pub term_years: u32,

    /// Comma-separated candidate annual rates (e.g. "0.07,0.08,0.09,0.10")
    #[arg(long)]
    pub rates: Option<String>,

    /// Comma-separated acceptance probabilities, one per rate
    #[arg(long)]
    pub probabilities: Option<String>,
}

fn parse_list(spec: &str, flag: &str) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    spec.split(',')
        .map(|entry| {
            entry
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("Invalid {flag} entry '{}': {e}", entry.trim()).into())
        })
        .collect()
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: SensitivityInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let (Some(principal), Some(rates), Some(probabilities)) = (
        args.principal,
        args.rates.as_deref(),
        args.probabilities.as_deref(),
    ) {
        SensitivityInput {
            principal,
            term_years: args.term_years,
            candidate_rates: parse_list(rates, "--rates")?,
            acceptance_probabilities: parse_list(probabilities, "--probabilities")?,
        }
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err(
            "--input <file.json>, piped stdin, or --principal/--rates/--probabilities required"
                .into(),
        );
    };

    let result = sensitivity::run_sensitivity(&input)?;
    Ok(serde_json::to_value(result)?)
}
