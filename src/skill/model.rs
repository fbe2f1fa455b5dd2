//! Skill brackets and the reference population table

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SweatError};

/// Tolerance on the proportion sum of a skill model
const PROPORTION_TOLERANCE: f64 = 1e-6;

/// A named tier of the skill distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub name: String,
    /// Share of the baseline population in this bracket
    #[serde(rename = "proportion")]
    pub baseline_proportion: f64,
    /// Skill (K/D) a typical member of this bracket plays at
    #[serde(rename = "skill")]
    pub representative_skill: f64,
}

impl Bracket {
    pub fn new(name: impl Into<String>, baseline_proportion: f64, representative_skill: f64) -> Self {
        Self {
            name: name.into(),
            baseline_proportion,
            representative_skill,
        }
    }
}

/// Ordered bracket table, lowest skill first
///
/// Proportions are stored as shares of the whole table: whatever the raw
/// weights add up to, they are rescaled to sum to 1 when the model is
/// built, deserialized or defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BracketTable")]
pub struct SkillModel {
    brackets: Vec<Bracket>,
}

/// Raw bracket list as written in a config file
#[derive(Deserialize)]
struct BracketTable {
    brackets: Vec<Bracket>,
}

impl From<BracketTable> for SkillModel {
    fn from(table: BracketTable) -> Self {
        Self::normalized(table.brackets)
    }
}

impl Default for SkillModel {
    fn default() -> Self {
        // The published shares add up to 0.9; the remaining tenth is spread
        // pro rata by normalization.
        Self::normalized(vec![
            Bracket::new("Bottom 10% (≤0.35)", 0.10, 0.25),
            Bracket::new("Next 10% (0.36–0.74)", 0.10, 0.45),
            Bracket::new("Lower Middle 35% (0.75–0.92)", 0.35, 0.70),
            Bracket::new("Upper Middle 15% (0.93–1.14)", 0.15, 0.88),
            Bracket::new("High 13% (1.15–1.49)", 0.13, 1.30),
            Bracket::new("Very High 6% (1.50–2.08)", 0.06, 1.70),
            Bracket::new("Top 1% (2.08–3.57)", 0.009, 2.50),
            Bracket::new("Top 0.1% (≥3.57)", 0.001, 4.00),
        ])
    }
}

impl SkillModel {
    /// Build a model from brackets, rejecting malformed tables
    ///
    /// Raw proportions only need a positive total; they are rescaled to
    /// sum to 1.
    pub fn new(brackets: Vec<Bracket>) -> Result<Self> {
        check_brackets(&brackets)?;
        Ok(Self::normalized(brackets))
    }

    /// Rescale proportions by their total; tables with no positive total
    /// are left as-is for `validate` to reject
    fn normalized(mut brackets: Vec<Bracket>) -> Self {
        let total: f64 = brackets.iter().map(|b| b.baseline_proportion).sum();
        if total > 0.0 && total.is_finite() {
            for bracket in brackets.iter_mut() {
                bracket.baseline_proportion /= total;
            }
        }
        Self { brackets }
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.brackets.iter().map(|b| b.name.as_str())
    }

    pub fn baseline_proportions(&self) -> Vec<f64> {
        self.brackets.iter().map(|b| b.baseline_proportion).collect()
    }

    /// Highest representative skill in the table
    pub fn max_skill(&self) -> Option<f64> {
        self.brackets.last().map(|b| b.representative_skill)
    }

    pub fn validate(&self) -> Result<()> {
        let total = check_brackets(&self.brackets)?;
        if (total - 1.0).abs() > PROPORTION_TOLERANCE {
            return Err(SweatError::invalid(format!(
                "bracket proportions sum to {}, expected 1",
                total
            )));
        }
        Ok(())
    }
}

/// Structural checks shared by construction and validation; returns the
/// proportion total
fn check_brackets(brackets: &[Bracket]) -> Result<f64> {
    if brackets.is_empty() {
        return Err(SweatError::invalid("skill model needs at least one bracket"));
    }

    let mut total = 0.0;
    let mut previous_skill: Option<f64> = None;

    for bracket in brackets {
        if bracket.name.trim().is_empty() {
            return Err(SweatError::invalid("bracket names must not be empty"));
        }
        if !bracket.baseline_proportion.is_finite() || bracket.baseline_proportion < 0.0 {
            return Err(SweatError::invalid(format!(
                "bracket '{}' has invalid proportion {}",
                bracket.name, bracket.baseline_proportion
            )));
        }
        if !bracket.representative_skill.is_finite() || bracket.representative_skill <= 0.0 {
            return Err(SweatError::invalid(format!(
                "bracket '{}' has non-positive skill {}",
                bracket.name, bracket.representative_skill
            )));
        }
        if let Some(prev) = previous_skill {
            if bracket.representative_skill <= prev {
                return Err(SweatError::invalid(format!(
                    "bracket '{}' skill {} is not above the previous bracket's {}",
                    bracket.name, bracket.representative_skill, prev
                )));
            }
        }
        previous_skill = Some(bracket.representative_skill);
        total += bracket.baseline_proportion;
    }

    if !(total > 0.0 && total.is_finite()) {
        return Err(SweatError::invalid(format!(
            "bracket proportions must have a positive total, got {}",
            total
        )));
    }

    Ok(total)
}
