//! Skill population model
//!
//! Brackets describe who is out there; churn policies describe who is still
//! queueing after matchmaking-driven attrition.

pub mod churn;
pub mod model;

pub use churn::{ChurnMode, ChurnPolicy, EffectiveDistribution};
pub use model::{Bracket, SkillModel};
