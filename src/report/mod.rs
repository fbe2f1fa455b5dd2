//! Presentation of simulation results
//!
//! Nothing here feeds back into the engine: the text report, the JSON
//! document and the chart series are all derived from a finished
//! [`SimulationOutput`].

pub mod chart;

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::scoring::curve::SweatLabel;
use crate::simulation::aggregate::BracketSummary;
use crate::simulation::runner::{SimulationOutput, SweepPoint};

pub use chart::{bot_bracket_attribution, BracketChart};

/// Expected presence of one of the rarest brackets
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopTier {
    pub name: String,
    pub expected_per_lobby: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LobbyReport {
    pub churn_description: String,
    pub seed: u64,
    pub repeats: u32,
    pub num_bots: u32,
    pub num_humans: u32,
    pub bot_skill_range: (f64, f64),
    pub top_n: usize,
    pub brackets: Vec<BracketSummary>,
    /// The two highest brackets, highest last
    pub top_tiers: Vec<TopTier>,
    pub sweat_rating: f64,
    pub label: SweatLabel,
    pub composite_mean: f64,
    pub composite_std: f64,
    pub median_mean: f64,
    pub top_mean_mean: f64,
    pub human_median_mean: Option<f64>,
    pub chart: BracketChart,
}

impl LobbyReport {
    pub fn new(output: &SimulationOutput, engine: &EngineConfig) -> Self {
        let aggregate = &output.aggregate;
        let churn_description = output.params.churn_policy().describe();

        let top_tiers = aggregate
            .brackets
            .iter()
            .skip(aggregate.brackets.len().saturating_sub(2))
            .map(|b| TopTier {
                name: b.name.clone(),
                expected_per_lobby: b.expected_count,
            })
            .collect();

        let chart = BracketChart {
            title: format!(
                "Bots: {}, Humans: {} ({})",
                aggregate.bot_count, aggregate.human_count, churn_description
            ),
            y_label: format!("Avg Players in Bracket (mean of {} runs)", aggregate.repeats),
            labels: aggregate.brackets.iter().map(|b| b.name.clone()).collect(),
            humans: aggregate.mean_counts(),
            bots: bot_bracket_attribution(aggregate.bot_count, aggregate.brackets.len()),
        };

        Self {
            churn_description,
            seed: output.seed,
            repeats: aggregate.repeats,
            num_bots: aggregate.bot_count,
            num_humans: aggregate.human_count,
            bot_skill_range: (engine.bot_skill_min, engine.bot_skill_max),
            top_n: engine.top_n,
            brackets: aggregate.brackets.clone(),
            top_tiers,
            sweat_rating: aggregate.sweat_rating,
            label: aggregate.label,
            composite_mean: aggregate.composite_mean,
            composite_std: aggregate.composite_std,
            median_mean: aggregate.median_mean,
            top_mean_mean: aggregate.top_mean_mean,
            human_median_mean: aggregate.human_median_mean,
            chart,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.chart.title);
        let _ = writeln!(out);
        for b in &self.brackets {
            let _ = writeln!(
                out,
                "{:<30}: {:5.2} exp, {:5.2} avg ({:4.1}%)",
                b.name, b.expected_count, b.mean_count, b.percent_of_humans
            );
        }
        let _ = writeln!(out);
        for tier in &self.top_tiers {
            let _ = writeln!(out, "{} humans per lobby: ~{:.2}", tier.name, tier.expected_per_lobby);
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "SWEATYNESS (1-10): {:.2}   |   Sweat Rating: {}",
            self.sweat_rating, self.label
        );
        let _ = writeln!(
            out,
            "Composite (weighted):   {:.2} ± {:.2}",
            self.composite_mean, self.composite_std
        );
        let _ = writeln!(out, "Median K/D (all):       {:.2}", self.median_mean);
        let _ = writeln!(out, "Mean K/D (top {}):       {:.2}", self.top_n, self.top_mean_mean);
        if let Some(human_median) = self.human_median_mean {
            let _ = writeln!(out, "Median K/D, humans only: {:.2}", human_median);
        }
        let _ = writeln!(
            out,
            "Bots: {} (K/D {}–{})",
            self.num_bots, self.bot_skill_range.0, self.bot_skill_range.1
        );
        let _ = writeln!(out, "Humans: {}", self.num_humans);
        let _ = write!(out, "Seed: {} ({} runs)", self.seed, self.repeats);

        out
    }
}

/// One row per bot count
pub fn render_sweep(points: &[SweepPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5} {:>7} {:>16} {:>7}  Rating",
        "Bots", "Humans", "Composite", "Sweat"
    );
    for point in points {
        let agg = &point.aggregate;
        let _ = writeln!(
            out,
            "{:>5} {:>7} {:>9.2} ± {:<4.2} {:>7.2}  {}",
            point.num_bots, agg.human_count, agg.composite_mean, agg.composite_std, agg.sweat_rating, agg.label
        );
    }
    out
}
