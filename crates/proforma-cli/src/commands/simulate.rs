use clap::Args;
use serde_json::Value;

use proforma_core::simulation::engine::{self, SimulationConfig};

use crate::input;

/// Arguments for the Monte Carlo appraisal
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to a JSON config file; reference parameters when omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Override the configured trial count
    #[arg(long)]
    pub trials: Option<u32>,

    /// Override the configured RNG seed
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut config: SimulationConfig = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SimulationConfig::default()
    };

    if let Some(trials) = args.trials {
        config.trial_count = trials;
    }
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }

    let result = engine::run_simulation(&config)?;
    Ok(serde_json::to_value(result)?)
}
