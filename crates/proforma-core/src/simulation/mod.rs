//! The simulation engine: run configuration, parallel trial execution and
//! result aggregation.

pub mod engine;

pub use engine::{run_simulation, SimulationConfig, SimulationResult};
