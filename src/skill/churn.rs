//! Churn policies - reshape the baseline population by skill tier
//!
//! A bracket is subject to churn when its representative skill is strictly
//! below the cutoff. Both modes use this convention, so a bracket sitting
//! exactly at the cutoff always survives.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SweatError};
use crate::skill::model::SkillModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChurnMode {
    /// Remove a fraction of every below-cutoff bracket
    Soft,
    /// Remove every below-cutoff bracket entirely
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChurnPolicy {
    pub mode: ChurnMode,
    /// Fraction removed in soft mode, in [0, 1]; ignored in hard mode
    pub level: f64,
    pub cutoff: f64,
}

impl Default for ChurnPolicy {
    fn default() -> Self {
        Self::new(ChurnMode::Soft, 0.0, 0.85)
    }
}

impl ChurnPolicy {
    pub fn new(mode: ChurnMode, level: f64, cutoff: f64) -> Self {
        Self { mode, level, cutoff }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.level.is_finite() || !(0.0..=1.0).contains(&self.level) {
            return Err(SweatError::invalid(format!(
                "churn_level ({}) must be within [0, 1]",
                self.level
            )));
        }
        if !self.cutoff.is_finite() || self.cutoff < 0.0 {
            return Err(SweatError::invalid(format!(
                "kd_churn_cutoff ({}) must be a non-negative number",
                self.cutoff
            )));
        }
        Ok(())
    }

    /// Whether a bracket at `skill` is subject to churn
    pub fn churns(&self, skill: f64) -> bool {
        skill < self.cutoff
    }

    /// Effective sampling weights for `model` under this policy
    pub fn apply(&self, model: &SkillModel) -> Result<EffectiveDistribution> {
        self.validate()?;

        let weights: Vec<f64> = model
            .brackets()
            .iter()
            .map(|bracket| {
                if !self.churns(bracket.representative_skill) {
                    return bracket.baseline_proportion;
                }
                match self.mode {
                    ChurnMode::Soft => bracket.baseline_proportion * (1.0 - self.level),
                    ChurnMode::Hard => 0.0,
                }
            })
            .collect();

        Ok(EffectiveDistribution::normalize(weights))
    }

    /// Short description for reports and chart titles
    pub fn describe(&self) -> String {
        match self.mode {
            ChurnMode::Soft => format!(
                "Churn {:.0}% of brackets with K/D < {:.2}",
                self.level * 100.0,
                self.cutoff
            ),
            ChurnMode::Hard => format!("Churn ALL under {:.2} K/D", self.cutoff),
        }
    }
}

/// Per-bracket sampling weights summing to 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveDistribution {
    weights: Vec<f64>,
    /// True when churn removed all mass and the top bracket took over
    collapsed: bool,
}

impl EffectiveDistribution {
    /// Renormalize raw weights; all-zero input collapses onto the last bracket
    pub fn normalize(mut weights: Vec<f64>) -> Self {
        let total: f64 = weights.iter().sum();

        if total > 0.0 && total.is_finite() {
            for w in weights.iter_mut() {
                *w /= total;
            }
            return Self {
                weights,
                collapsed: false,
            };
        }

        tracing::warn!("Churn removed every bracket, falling back to the highest-skill bracket");
        weights.iter_mut().for_each(|w| *w = 0.0);
        if let Some(last) = weights.last_mut() {
            *last = 1.0;
        }
        Self {
            weights,
            collapsed: true,
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Expected humans per bracket for a lobby with `human_count` humans
    pub fn expected_counts(&self, human_count: u32) -> Vec<f64> {
        self.weights
            .iter()
            .map(|w| human_count as f64 * w)
            .collect()
    }
}
