//! Composite skill score and sweat rating for one lobby

use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::scoring::curve::{SweatCurve, SweatLabel, MIN_RATING};

/// Scoring outcome for one set of skills
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub composite: f64,
    pub median: f64,
    pub top_mean: f64,
    /// 1-10, one decimal
    pub rating: f64,
}

impl Score {
    /// Result for a lobby with nobody in it
    pub const EMPTY: Score = Score {
        composite: 0.0,
        median: 0.0,
        top_mean: 0.0,
        rating: MIN_RATING,
    };

    pub fn label(&self) -> SweatLabel {
        SweatLabel::from_rating(self.rating)
    }
}

#[derive(Debug, Clone)]
pub struct SweatScorer {
    top_n: usize,
    median_weight: f64,
    top_weight: f64,
    curve: SweatCurve,
}

impl Default for SweatScorer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl SweatScorer {
    pub fn from_config(engine: &EngineConfig) -> Self {
        Self {
            top_n: engine.top_n,
            median_weight: engine.median_weight,
            top_weight: engine.top_weight,
            curve: engine.sweat_curve.clone(),
        }
    }

    pub fn curve(&self) -> &SweatCurve {
        &self.curve
    }

    /// Blend of median and top-tail mean
    pub fn composite(&self, median: f64, top_mean: f64) -> f64 {
        self.median_weight * median + self.top_weight * top_mean
    }

    pub fn score(&self, skills: &[f64]) -> Score {
        if skills.is_empty() {
            return Score::EMPTY;
        }

        let mut sorted = skills.to_vec();
        sorted.sort_by(f64::total_cmp);

        let median = median_of_sorted(&sorted);
        let top = &sorted[sorted.len().saturating_sub(self.top_n)..];
        let top_mean = top.iter().sum::<f64>() / top.len() as f64;

        let composite = self.composite(median, top_mean);

        Score {
            composite,
            median,
            top_mean,
            rating: self.curve.rating(composite),
        }
    }
}

/// Median of unsorted values; `None` when empty
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(median_of_sorted(&sorted))
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
