//! Composite score → sweat rating curve

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SweatError};

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub skill: f64,
    pub rating: f64,
}

impl CurvePoint {
    pub const fn new(skill: f64, rating: f64) -> Self {
        Self { skill, rating }
    }
}

/// Piecewise-linear mapping from composite skill to sweat rating
///
/// Flat beyond both endpoints. Skills must strictly ascend and ratings must
/// not decrease, which keeps the rating monotone in the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweatCurve {
    points: Vec<CurvePoint>,
}

impl Default for SweatCurve {
    fn default() -> Self {
        // Typical lobbies land around 4-6; the 0.84-1.20 band is one
        // indistinguishable "normal" plateau.
        Self {
            points: vec![
                CurvePoint::new(0.30, 3.0),
                CurvePoint::new(0.84, 4.0),
                CurvePoint::new(1.00, 4.0),
                CurvePoint::new(1.20, 4.25),
                CurvePoint::new(1.50, 6.0),
                CurvePoint::new(3.00, 10.0),
            ],
        }
    }
}

impl SweatCurve {
    pub fn new(points: Vec<CurvePoint>) -> Result<Self> {
        let curve = Self { points };
        curve.validate()?;
        Ok(curve)
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn validate(&self) -> Result<()> {
        if self.points.is_empty() {
            return Err(SweatError::invalid("sweat curve needs at least one point"));
        }
        if self
            .points
            .iter()
            .any(|p| !p.skill.is_finite() || !p.rating.is_finite())
        {
            return Err(SweatError::invalid("sweat curve points must be finite"));
        }
        for pair in self.points.windows(2) {
            if pair[1].skill <= pair[0].skill {
                return Err(SweatError::invalid(format!(
                    "sweat curve skills must ascend ({} then {})",
                    pair[0].skill, pair[1].skill
                )));
            }
            if pair[1].rating < pair[0].rating {
                return Err(SweatError::invalid(format!(
                    "sweat curve ratings must not decrease ({} then {})",
                    pair[0].rating, pair[1].rating
                )));
            }
        }
        Ok(())
    }

    /// Raw interpolated rating, before rounding and clamping
    pub fn interpolate(&self, composite: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return MIN_RATING,
        };

        if composite <= first.skill {
            return first.rating;
        }
        if composite >= last.skill {
            return last.rating;
        }

        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if composite <= b.skill {
                let t = (composite - a.skill) / (b.skill - a.skill);
                return a.rating + t * (b.rating - a.rating);
            }
        }
        last.rating
    }

    /// Sweat rating on the 1-10 scale, rounded to one decimal (ties to even)
    pub fn rating(&self, composite: f64) -> f64 {
        let raw = self.interpolate(composite);
        let rounded = (raw * 10.0).round_ties_even() / 10.0;
        rounded.clamp(MIN_RATING, MAX_RATING)
    }
}

/// Qualitative reading of a sweat rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweatLabel {
    Chill,
    Normal,
    Sweaty,
    UltraSweaty,
}

impl SweatLabel {
    pub fn from_rating(rating: f64) -> Self {
        if rating < 4.0 {
            Self::Chill
        } else if rating < 6.5 {
            Self::Normal
        } else if rating < 7.0 {
            Self::Sweaty
        } else {
            Self::UltraSweaty
        }
    }
}

impl fmt::Display for SweatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Chill => "Chill",
            Self::Normal => "Normal",
            Self::Sweaty => "Sweaty",
            Self::UltraSweaty => "Ultra Sweaty!",
        };
        f.write_str(text)
    }
}
