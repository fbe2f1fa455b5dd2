//! Lobby intensity scoring
//!
//! Reduces a lobby's skills to a composite score, then maps the composite
//! onto the 1-10 sweat scale.

pub mod curve;
pub mod sweat;

pub use curve::{CurvePoint, SweatCurve, SweatLabel};
pub use sweat::{median, Score, SweatScorer};
