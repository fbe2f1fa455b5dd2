//! Reduction of repeated runs into summary statistics

use serde::{Deserialize, Serialize};

use crate::scoring::curve::SweatLabel;
use crate::scoring::sweat::SweatScorer;
use crate::simulation::runner::RunResult;
use crate::skill::churn::EffectiveDistribution;
use crate::skill::model::SkillModel;

/// Expected vs observed humans in one bracket
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketSummary {
    pub name: String,
    /// `human_count × weight`, computed once from the effective distribution
    pub expected_count: f64,
    /// Mean drawn count across repetitions
    pub mean_count: f64,
    /// `mean_count` as a percentage of the humans in the lobby
    pub percent_of_humans: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub repeats: u32,
    pub human_count: u32,
    pub bot_count: u32,

    pub composite_mean: f64,
    /// Population standard deviation across repetitions
    pub composite_std: f64,
    pub median_mean: f64,
    pub top_mean_mean: f64,
    /// Mean of the per-run ratings
    pub sweat_mean: f64,
    /// Curve applied to `composite_mean`; the headline rating
    pub sweat_rating: f64,
    pub label: SweatLabel,
    /// Mean human-only median over runs that had humans
    pub human_median_mean: Option<f64>,

    pub brackets: Vec<BracketSummary>,
}

impl AggregateResult {
    pub fn from_runs(
        runs: &[RunResult],
        model: &SkillModel,
        distribution: &EffectiveDistribution,
        human_count: u32,
        bot_count: u32,
        scorer: &SweatScorer,
    ) -> Self {
        let composites: Vec<f64> = runs.iter().map(|r| r.composite_score).collect();
        let composite_mean = mean(&composites);
        let sweat_rating = scorer.curve().rating(composite_mean);

        let human_medians: Vec<f64> = runs.iter().filter_map(|r| r.human_median_skill).collect();
        let human_median_mean = if human_medians.is_empty() {
            None
        } else {
            Some(mean(&human_medians))
        };

        let expected = distribution.expected_counts(human_count);
        let brackets = model
            .names()
            .zip(expected)
            .enumerate()
            .map(|(i, (name, expected_count))| {
                let counts: Vec<f64> = runs
                    .iter()
                    .map(|r| r.per_bracket_human_counts.get(i).copied().unwrap_or(0) as f64)
                    .collect();
                let mean_count = mean(&counts);
                let percent_of_humans = if human_count > 0 {
                    mean_count / human_count as f64 * 100.0
                } else {
                    0.0
                };
                BracketSummary {
                    name: name.to_string(),
                    expected_count,
                    mean_count,
                    percent_of_humans,
                }
            })
            .collect();

        Self {
            repeats: runs.len() as u32,
            human_count,
            bot_count,
            composite_mean,
            composite_std: std_dev(&composites),
            median_mean: mean(&runs.iter().map(|r| r.median_skill).collect::<Vec<_>>()),
            top_mean_mean: mean(&runs.iter().map(|r| r.top_mean_skill).collect::<Vec<_>>()),
            sweat_mean: mean(&runs.iter().map(|r| r.sweat_rating).collect::<Vec<_>>()),
            sweat_rating,
            label: SweatLabel::from_rating(sweat_rating),
            human_median_mean,
            brackets,
        }
    }

    /// Mean observed human counts per bracket
    pub fn mean_counts(&self) -> Vec<f64> {
        self.brackets.iter().map(|b| b.mean_count).collect()
    }

}

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0 for fewer than two values
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
