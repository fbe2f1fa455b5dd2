//! Monte Carlo lobby simulation
//!
//! Applies churn once per invocation, draws `num_repeats` independent
//! lobbies, scores each and reduces the runs to summary statistics.

pub mod aggregate;
pub mod runner;

pub use aggregate::{mean, std_dev, AggregateResult, BracketSummary};
pub use runner::{
    repetition_rng, run, simulate, simulate_with, sweep_bots, Execution, RunResult,
    SimulationOutput, SweepPoint,
};
