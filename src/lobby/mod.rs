//! Lobby population sampling

pub mod sampler;

pub use sampler::{multinomial, LobbyComposition, PopulationSampler};
