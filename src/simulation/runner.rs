//! Repeated lobby simulation
//!
//! Each repetition draws from its own ChaCha8 stream keyed by the master
//! seed, so results do not depend on whether repetitions ran on one thread
//! or on the rayon pool.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::{EngineConfig, SimulationParams};
use crate::core::error::Result;
use crate::lobby::sampler::{LobbyComposition, PopulationSampler};
use crate::scoring::sweat::{median, SweatScorer};
use crate::simulation::aggregate::AggregateResult;
use crate::skill::churn::EffectiveDistribution;

/// Scores for one repetition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub composite_score: f64,
    pub median_skill: f64,
    pub top_mean_skill: f64,
    pub sweat_rating: f64,
    /// `None` for an all-bot lobby
    pub human_median_skill: Option<f64>,
    pub per_bracket_human_counts: Vec<u32>,
}

impl RunResult {
    pub fn from_lobby(lobby: &LobbyComposition, scorer: &SweatScorer) -> Self {
        let score = scorer.score(&lobby.skill_values());
        Self {
            composite_score: score.composite,
            median_skill: score.median,
            top_mean_skill: score.top_mean,
            sweat_rating: score.rating,
            human_median_skill: median(&lobby.human_skills),
            per_bracket_human_counts: lobby.per_bracket_human_counts.clone(),
        }
    }
}

/// How repetitions are scheduled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Execution {
    /// Parallel once `num_repeats` reaches the engine's threshold
    #[default]
    Auto,
    Sequential,
    Parallel,
}

/// Everything one invocation produced
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// Master seed the repetition streams were keyed by
    pub seed: u64,
    pub params: SimulationParams,
    pub distribution: EffectiveDistribution,
    pub runs: Vec<RunResult>,
    pub aggregate: AggregateResult,
}

impl SimulationOutput {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// RNG for repetition `index`: the master key with its own stream
pub fn repetition_rng(master_seed: u64, index: u32) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(master_seed);
    rng.set_stream(index as u64);
    rng
}

/// Run the simulation and return only the summary
pub fn run(engine: &EngineConfig, params: &SimulationParams) -> Result<AggregateResult> {
    Ok(simulate(engine, params)?.aggregate)
}

pub fn simulate(engine: &EngineConfig, params: &SimulationParams) -> Result<SimulationOutput> {
    simulate_with(engine, params, Execution::Auto)
}

/// Run `params.num_repeats` independent lobbies and aggregate them
///
/// Configuration is validated before any randomness is consumed.
pub fn simulate_with(
    engine: &EngineConfig,
    params: &SimulationParams,
    execution: Execution,
) -> Result<SimulationOutput> {
    simulate_seeded(engine, params, execution, rand::random)
}

/// `entropy` is only called once validation passed and no seed was given
fn simulate_seeded(
    engine: &EngineConfig,
    params: &SimulationParams,
    execution: Execution,
    entropy: impl FnOnce() -> u64,
) -> Result<SimulationOutput> {
    engine.validate()?;
    params.validate(engine)?;

    let seed = params.seed.unwrap_or_else(entropy);
    let policy = params.churn_policy();
    let distribution = policy.apply(&engine.skill_model)?;
    let sampler = PopulationSampler::new(engine)?;
    let scorer = SweatScorer::from_config(engine);

    let human_count = params.human_count(engine);
    let bot_count = params.num_bots;

    tracing::info!(
        "Simulating {} lobbies: {} humans, {} bots, {} (seed {})",
        params.num_repeats,
        human_count,
        bot_count,
        policy.describe(),
        seed
    );

    let start = std::time::Instant::now();

    let repeat = |index: u32| -> Result<RunResult> {
        let mut rng = repetition_rng(seed, index);
        let lobby = sampler.draw(&mut rng, &distribution, human_count, bot_count)?;
        let result = RunResult::from_lobby(&lobby, &scorer);
        tracing::debug!(
            "Run {}: composite {:.3}, sweat {:.1}",
            index,
            result.composite_score,
            result.sweat_rating
        );
        Ok(result)
    };

    let parallel = match execution {
        Execution::Auto => params.num_repeats >= engine.parallel_threshold,
        Execution::Sequential => false,
        Execution::Parallel => true,
    };

    // Collected in repetition order; the reduction happens afterwards
    let runs: Vec<RunResult> = if parallel {
        (0..params.num_repeats)
            .into_par_iter()
            .map(repeat)
            .collect::<Result<Vec<_>>>()?
    } else {
        (0..params.num_repeats)
            .map(repeat)
            .collect::<Result<Vec<_>>>()?
    };

    let aggregate = AggregateResult::from_runs(
        &runs,
        &engine.skill_model,
        &distribution,
        human_count,
        bot_count,
        &scorer,
    );

    tracing::info!(
        "Composite {:.2} ± {:.2}, sweat {:.1} ({}) in {:.2}ms",
        aggregate.composite_mean,
        aggregate.composite_std,
        aggregate.sweat_rating,
        aggregate.label,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(SimulationOutput {
        seed,
        params: SimulationParams {
            seed: Some(seed),
            ..params.clone()
        },
        distribution,
        runs,
        aggregate,
    })
}

/// One point of a bot-count sweep
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepPoint {
    pub num_bots: u32,
    pub aggregate: AggregateResult,
}

/// Aggregate once per bot count, every point keyed by the same master seed
pub fn sweep_bots(
    engine: &EngineConfig,
    params: &SimulationParams,
    bot_counts: &[u32],
) -> Result<Vec<SweepPoint>> {
    sweep_seeded(engine, params, bot_counts, rand::random)
}

fn sweep_seeded(
    engine: &EngineConfig,
    params: &SimulationParams,
    bot_counts: &[u32],
    entropy: impl FnOnce() -> u64,
) -> Result<Vec<SweepPoint>> {
    engine.validate()?;

    let mut points: Vec<SimulationParams> = bot_counts
        .iter()
        .map(|&num_bots| SimulationParams {
            num_bots,
            ..params.clone()
        })
        .collect();

    for point in &points {
        point.validate(engine)?;
    }

    let seed = params.seed.unwrap_or_else(entropy);
    for point in points.iter_mut() {
        point.seed = Some(seed);
    }

    points
        .iter()
        .map(|point| {
            Ok(SweepPoint {
                num_bots: point.num_bots,
                aggregate: run(engine, point)?,
            })
        })
        .collect()
}
