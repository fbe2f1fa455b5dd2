//! Lobby Sweat - Monte Carlo estimator of matchmaking lobby intensity

pub mod core;
pub mod lobby;
pub mod report;
pub mod scoring;
pub mod simulation;
pub mod skill;

pub use crate::core::config::{EngineConfig, SimulationParams};
pub use crate::core::error::{Result, SweatError};
pub use crate::simulation::{run, simulate, AggregateResult, SimulationOutput};
