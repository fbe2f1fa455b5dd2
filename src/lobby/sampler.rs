//! Per-lobby draws of human bracket counts and individual skills
//!
//! All randomness comes from the caller's RNG, so a seeded stream gives a
//! reproducible lobby.

use rand::Rng;
use rand_distr::{Binomial, Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::core::error::{Result, SweatError};
use crate::skill::churn::EffectiveDistribution;

/// One simulated lobby
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbyComposition {
    pub human_count: u32,
    pub bot_count: u32,
    /// Humans drawn into each bracket; sums to `human_count`
    pub per_bracket_human_counts: Vec<u32>,
    /// Human skills grouped by bracket, lowest bracket first
    pub human_skills: Vec<f64>,
    pub bot_skills: Vec<f64>,
}

impl LobbyComposition {
    pub fn lobby_size(&self) -> u32 {
        self.human_count + self.bot_count
    }

    /// Every player's skill, humans then bots
    pub fn skill_values(&self) -> Vec<f64> {
        let mut all = Vec::with_capacity(self.human_skills.len() + self.bot_skills.len());
        all.extend_from_slice(&self.human_skills);
        all.extend_from_slice(&self.bot_skills);
        all
    }
}

/// Draws lobbies from an effective distribution
#[derive(Debug, Clone)]
pub struct PopulationSampler {
    /// Skill noise around each bracket's representative value
    bracket_skill: Vec<Normal<f64>>,
    skill_floor: f64,
    bot_skill: Uniform<f64>,
}

impl PopulationSampler {
    pub fn new(engine: &EngineConfig) -> Result<Self> {
        engine.validate()?;

        let bracket_skill = engine
            .skill_model
            .brackets()
            .iter()
            .map(|b| {
                Normal::new(b.representative_skill, engine.skill_noise_sd).map_err(|e| {
                    SweatError::Distribution(format!("bracket '{}': {}", b.name, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bracket_skill,
            skill_floor: engine.skill_floor,
            bot_skill: Uniform::new_inclusive(engine.bot_skill_min, engine.bot_skill_max),
        })
    }

    /// Draw one lobby of `human_count` humans and `bot_count` bots
    pub fn draw<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        distribution: &EffectiveDistribution,
        human_count: u32,
        bot_count: u32,
    ) -> Result<LobbyComposition> {
        if distribution.len() != self.bracket_skill.len() {
            return Err(SweatError::invalid(format!(
                "distribution has {} weights for {} brackets",
                distribution.len(),
                self.bracket_skill.len()
            )));
        }

        let per_bracket_human_counts = multinomial(rng, human_count, distribution.weights())?;

        let mut human_skills = Vec::with_capacity(human_count as usize);
        for (&count, normal) in per_bracket_human_counts.iter().zip(&self.bracket_skill) {
            for _ in 0..count {
                let skill: f64 = normal.sample(rng);
                human_skills.push(skill.max(self.skill_floor));
            }
        }

        let bot_skills: Vec<f64> = (0..bot_count).map(|_| self.bot_skill.sample(rng)).collect();

        Ok(LobbyComposition {
            human_count,
            bot_count,
            per_bracket_human_counts,
            human_skills,
            bot_skills,
        })
    }
}

/// Multinomial draw of `trials` over `weights` (which must sum to 1)
///
/// Drawn as a chain of conditional binomials: each category takes
/// `Binomial(remaining, w_i / mass_left)` and the last category takes what
/// is left, so the counts always sum to `trials`.
pub fn multinomial<R: Rng + ?Sized>(rng: &mut R, trials: u32, weights: &[f64]) -> Result<Vec<u32>> {
    let mut counts = vec![0u32; weights.len()];
    if weights.is_empty() {
        return if trials == 0 {
            Ok(counts)
        } else {
            Err(SweatError::invalid("cannot distribute trials over zero categories"))
        };
    }

    // Suffix sums instead of running subtraction so trailing zero weights stay exactly zero
    let mut mass_left = vec![0.0; weights.len()];
    let mut acc = 0.0;
    for (i, &w) in weights.iter().enumerate().rev() {
        acc += w;
        mass_left[i] = acc;
    }

    let last = weights.len() - 1;
    let mut remaining = trials;

    for i in 0..last {
        if remaining == 0 {
            break;
        }
        let p = if mass_left[i] > 0.0 {
            (weights[i] / mass_left[i]).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let binomial = Binomial::new(remaining as u64, p)
            .map_err(|e| SweatError::Distribution(format!("binomial(p = {}): {}", p, e)))?;
        let drawn = binomial.sample(rng) as u32;
        counts[i] = drawn;
        remaining -= drawn;
    }
    counts[last] = remaining;

    Ok(counts)
}
