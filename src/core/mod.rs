pub mod config;
pub mod error;

pub use config::{EngineConfig, SimulationParams, DEFAULT_LOBBY_SIZE};
pub use error::{Result, SweatError};
