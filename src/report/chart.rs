//! Stacked-bar series for plotting tools

use serde::{Deserialize, Serialize};

/// Bots are not part of the bracket model; for display they are split
/// evenly into the two lowest brackets (odd bot goes to the second).
pub fn bot_bracket_attribution(num_bots: u32, bracket_count: usize) -> Vec<u32> {
    let mut counts = vec![0u32; bracket_count];
    match bracket_count {
        0 => {}
        1 => counts[0] = num_bots,
        _ => {
            let first = num_bots / 2;
            counts[0] = first;
            counts[1] = num_bots - first;
        }
    }
    counts
}

/// Mean humans per bracket with attributed bots stacked on top
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketChart {
    pub title: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub humans: Vec<f64>,
    pub bots: Vec<u32>,
}

impl BracketChart {
    /// Height of each stacked bar
    pub fn totals(&self) -> Vec<f64> {
        self.humans
            .iter()
            .zip(&self.bots)
            .map(|(h, &b)| h + b as f64)
            .collect()
    }
}
