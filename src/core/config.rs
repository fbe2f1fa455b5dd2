//! Engine configuration with documented constants
//!
//! Every number the engine depends on is collected here rather than in
//! module-level constants, so alternate skill models, lobby sizes or sweat
//! curves can be substituted and tested in isolation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SweatError};
use crate::scoring::curve::SweatCurve;
use crate::skill::churn::{ChurnMode, ChurnPolicy};
use crate::skill::model::SkillModel;

/// Players per lobby in the reference model
pub const DEFAULT_LOBBY_SIZE: u32 = 150;

/// Configuration for the simulation engine
///
/// Loaded from TOML with every field optional; missing fields fall back to
/// the reference values in [`Default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bracket table humans are sampled from
    pub skill_model: SkillModel,

    /// Total players per lobby (humans + bots)
    pub lobby_size: u32,

    /// Composite score → sweat rating mapping
    pub sweat_curve: SweatCurve,

    // === SCORING ===
    /// How many of the highest skills feed the top-tail mean
    pub top_n: usize,

    /// Weight of the lobby median in the composite score
    ///
    /// Together with `top_weight` this privileges the top tail: a handful of
    /// strong players define how a lobby feels more than the bulk does.
    pub median_weight: f64,

    /// Weight of the top-N mean in the composite score
    pub top_weight: f64,

    // === SAMPLING ===
    /// Standard deviation of a human's skill around their bracket's
    /// representative value
    pub skill_noise_sd: f64,

    /// Minimum sampled human skill; keeps skills strictly positive
    pub skill_floor: f64,

    /// Lower bound of the uniform bot skill range
    pub bot_skill_min: f64,

    /// Upper bound of the uniform bot skill range (inclusive)
    pub bot_skill_max: f64,

    // === PARALLELIZATION ===
    /// Minimum repetition count before the runner uses the rayon pool
    ///
    /// Below this a sequential loop is faster than the fork/join overhead.
    pub parallel_threshold: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            skill_model: SkillModel::default(),
            lobby_size: DEFAULT_LOBBY_SIZE,
            sweat_curve: SweatCurve::default(),

            top_n: 5,
            median_weight: 0.25,
            top_weight: 0.75,

            skill_noise_sd: 0.05,
            skill_floor: 0.05,
            bot_skill_min: 0.1,
            bot_skill_max: 0.6,

            parallel_threshold: 32,
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        tracing::debug!("Loaded engine config from {:?}", path);
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.skill_model.validate()?;
        self.sweat_curve.validate()?;

        if self.lobby_size == 0 {
            return Err(SweatError::invalid("lobby_size must be at least 1"));
        }
        if self.top_n == 0 {
            return Err(SweatError::invalid("top_n must be at least 1"));
        }

        for (name, weight) in [("median_weight", self.median_weight), ("top_weight", self.top_weight)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SweatError::invalid(format!(
                    "{} ({}) must be a non-negative number",
                    name, weight
                )));
            }
        }

        if !self.skill_noise_sd.is_finite() || self.skill_noise_sd <= 0.0 {
            return Err(SweatError::invalid(format!(
                "skill_noise_sd ({}) must be positive",
                self.skill_noise_sd
            )));
        }
        if !self.skill_floor.is_finite() || self.skill_floor <= 0.0 {
            return Err(SweatError::invalid(format!(
                "skill_floor ({}) must be positive",
                self.skill_floor
            )));
        }

        // Uniform::new_inclusive panics on an inverted range
        if !self.bot_skill_min.is_finite()
            || !self.bot_skill_max.is_finite()
            || self.bot_skill_min < 0.0
            || self.bot_skill_min > self.bot_skill_max
        {
            return Err(SweatError::invalid(format!(
                "bot skill range [{}, {}] must satisfy 0 <= min <= max",
                self.bot_skill_min, self.bot_skill_max
            )));
        }

        Ok(())
    }
}

/// Parameters of one simulation invocation
///
/// Mirrors the knobs a balance analyst turns: bot fill, churn intensity,
/// churn mode and cutoff, repetition count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Bots filling the lobby; humans make up the rest
    pub num_bots: u32,
    /// Fraction of each below-cutoff bracket removed in soft mode
    pub churn_level: f64,
    /// Hard mode: remove every below-cutoff bracket entirely
    pub advanced_churn: bool,
    /// Skill below which a bracket is subject to churn
    pub kd_churn_cutoff: f64,
    /// Independent repetitions to average over
    pub num_repeats: u32,
    /// Master seed; drawn from process entropy when absent
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_bots: 0,
            churn_level: 0.0,
            advanced_churn: false,
            kd_churn_cutoff: 0.85,
            num_repeats: 20,
            seed: None,
        }
    }
}

impl SimulationParams {
    pub fn churn_mode(&self) -> ChurnMode {
        if self.advanced_churn {
            ChurnMode::Hard
        } else {
            ChurnMode::Soft
        }
    }

    pub fn churn_policy(&self) -> ChurnPolicy {
        ChurnPolicy::new(self.churn_mode(), self.churn_level, self.kd_churn_cutoff)
    }

    /// Humans in the lobby once bots are seated
    pub fn human_count(&self, engine: &EngineConfig) -> u32 {
        engine.lobby_size.saturating_sub(self.num_bots)
    }

    /// Reject anything out of range before randomness is consumed
    pub fn validate(&self, engine: &EngineConfig) -> Result<()> {
        if self.num_bots > engine.lobby_size {
            return Err(SweatError::invalid(format!(
                "num_bots ({}) exceeds lobby size ({})",
                self.num_bots, engine.lobby_size
            )));
        }
        if self.num_repeats < 1 {
            return Err(SweatError::invalid("num_repeats must be at least 1"));
        }
        self.churn_policy().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = EngineConfig::from_toml_str("lobby_size = 100\ntop_n = 3\n").unwrap();
        assert_eq!(config.lobby_size, 100);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.skill_model.len(), 8);
        assert_eq!(config.median_weight, 0.25);
    }

    #[test]
    fn test_load_reference_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/reference_engine.toml");
        let config = EngineConfig::load(&path).expect("Should load reference config");
        assert_eq!(config.skill_model, SkillModel::default());
        assert_eq!(config.sweat_curve, SweatCurve::default());
        assert_eq!(config.lobby_size, DEFAULT_LOBBY_SIZE);
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let err = EngineConfig::load("data/does_not_exist.toml").unwrap_err();
        assert!(matches!(err, SweatError::IoError(_)));
    }

    #[test]
    fn test_toml_custom_skill_model() {
        let toml_str = r#"
            [[skill_model.brackets]]
            name = "Low"
            proportion = 0.5
            skill = 0.5

            [[skill_model.brackets]]
            name = "High"
            proportion = 0.5
            skill = 1.5
        "#;
        let config = EngineConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.skill_model.len(), 2);
        assert_eq!(config.skill_model.brackets()[1].name, "High");
    }

    #[test]
    fn test_toml_proportions_are_normalized() {
        let toml_str = r#"
            [[skill_model.brackets]]
            name = "Only"
            proportion = 0.7
            skill = 1.0
        "#;
        let config = EngineConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.skill_model.baseline_proportions(), vec![1.0]);
    }

    #[test]
    fn test_toml_rejects_zero_total_proportions() {
        let toml_str = r#"
            [[skill_model.brackets]]
            name = "Low"
            proportion = 0.0
            skill = 0.5

            [[skill_model.brackets]]
            name = "High"
            proportion = 0.0
            skill = 1.5
        "#;
        let err = EngineConfig::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, SweatError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_inverted_bot_range_rejected() {
        let config = EngineConfig {
            bot_skill_min: 0.8,
            bot_skill_max: 0.2,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_params_reject_too_many_bots() {
        let engine = EngineConfig::default();
        let params = SimulationParams {
            num_bots: 151,
            ..SimulationParams::default()
        };
        assert!(params.validate(&engine).is_err());
    }

    #[test]
    fn test_params_reject_zero_repeats() {
        let engine = EngineConfig::default();
        let params = SimulationParams {
            num_repeats: 0,
            ..SimulationParams::default()
        };
        assert!(params.validate(&engine).is_err());
    }

    #[test]
    fn test_params_reject_churn_out_of_range() {
        let engine = EngineConfig::default();
        for level in [-0.1, 1.5, f64::NAN] {
            let params = SimulationParams {
                churn_level: level,
                ..SimulationParams::default()
            };
            assert!(params.validate(&engine).is_err(), "level {} accepted", level);
        }
    }

    #[test]
    fn test_params_reject_negative_cutoff() {
        let engine = EngineConfig::default();
        let params = SimulationParams {
            kd_churn_cutoff: -0.5,
            ..SimulationParams::default()
        };
        assert!(params.validate(&engine).is_err());
    }

    #[test]
    fn test_human_count() {
        let engine = EngineConfig::default();
        let params = SimulationParams {
            num_bots: 40,
            ..SimulationParams::default()
        };
        assert_eq!(params.human_count(&engine), 110);
        assert_eq!(params.churn_mode(), ChurnMode::Soft);
    }
}
