//! End-to-end lobby scenarios
//!
//! Each test drives the full pipeline: churn, sampling, scoring and
//! aggregation, with a fixed master seed.

use lobby_sweat::lobby::PopulationSampler;
use lobby_sweat::scoring::{SweatLabel, SweatScorer};
use lobby_sweat::simulation::{repetition_rng, simulate, RunResult};
use lobby_sweat::skill::{ChurnMode, ChurnPolicy};
use lobby_sweat::{EngineConfig, SimulationParams, SweatError};

fn params() -> SimulationParams {
    SimulationParams {
        seed: Some(2024),
        ..SimulationParams::default()
    }
}

#[test]
fn test_full_human_lobby_tracks_baseline() {
    let engine = EngineConfig::default();
    let output = simulate(
        &engine,
        &SimulationParams {
            num_repeats: 1,
            ..params()
        },
    )
    .unwrap();

    let agg = &output.aggregate;
    assert_eq!(agg.human_count, 150);
    assert_eq!(agg.bot_count, 0);

    let counts = &output.runs[0].per_bracket_human_counts;
    assert_eq!(counts.iter().sum::<u32>(), 150);

    for (count, bracket) in counts.iter().zip(engine.skill_model.brackets()) {
        let p = bracket.baseline_proportion;
        let expected = 150.0 * p;
        let sd = (150.0 * p * (1.0 - p)).sqrt();
        assert!(
            (*count as f64 - expected).abs() <= 5.0 * sd + 1.0,
            "{}: drew {}, expected about {:.1}",
            bracket.name,
            count,
            expected
        );
    }
    assert!(agg.human_median_mean.is_some());

    // Published shares total 0.9 and are rescaled before sampling
    assert!((agg.brackets[2].expected_count - 150.0 * 0.35 / 0.9).abs() < 1e-9);
    let expected_total: f64 = agg.brackets.iter().map(|b| b.expected_count).sum();
    assert!((expected_total - 150.0).abs() < 1e-9);
}

#[test]
fn test_all_bot_lobby_is_chill() {
    let engine = EngineConfig::default();
    let output = simulate(
        &engine,
        &SimulationParams {
            num_bots: 150,
            num_repeats: 10,
            ..params()
        },
    )
    .unwrap();

    let agg = &output.aggregate;
    assert_eq!(agg.human_count, 0);
    assert!(agg.brackets.iter().all(|b| b.mean_count == 0.0));
    assert_eq!(agg.human_median_mean, None);
    assert!(output.runs.iter().all(|r| r.human_median_skill.is_none()));

    // Every skill is a bot skill, so both statistics stay inside the bot range
    assert!(agg.median_mean >= 0.1 && agg.median_mean <= 0.6);
    assert!(agg.top_mean_mean >= 0.1 && agg.top_mean_mean <= 0.6);
    assert_eq!(agg.label, SweatLabel::Chill);
    assert!(output.runs.iter().all(|r| r.sweat_rating < 4.0));
}

#[test]
fn test_hard_churn_above_every_bracket_collapses_to_top() {
    let engine = EngineConfig::default();
    let output = simulate(
        &engine,
        &SimulationParams {
            advanced_churn: true,
            kd_churn_cutoff: 5.0,
            num_repeats: 5,
            ..params()
        },
    )
    .unwrap();

    assert!(output.distribution.is_collapsed());
    assert_eq!(output.distribution.weights().last(), Some(&1.0));

    let top = engine.skill_model.brackets().len() - 1;
    for run in &output.runs {
        assert_eq!(run.per_bracket_human_counts[top], 150);
        let human_median = run.human_median_skill.unwrap();
        assert!((human_median - 4.0).abs() < 0.1);
    }
    assert_eq!(output.aggregate.label, SweatLabel::UltraSweaty);
    assert_eq!(output.aggregate.sweat_rating, 10.0);
}

#[test]
fn test_full_soft_churn_matches_hard_churn_outcome() {
    let engine = EngineConfig::default();
    let soft = simulate(
        &engine,
        &SimulationParams {
            churn_level: 1.0,
            kd_churn_cutoff: 0.85,
            num_repeats: 5,
            ..params()
        },
    )
    .unwrap();
    let hard = simulate(
        &engine,
        &SimulationParams {
            advanced_churn: true,
            kd_churn_cutoff: 0.85,
            num_repeats: 5,
            ..params()
        },
    )
    .unwrap();

    for (i, bracket) in engine.skill_model.brackets().iter().enumerate() {
        if bracket.representative_skill <= 0.85 {
            assert_eq!(soft.distribution.weights()[i], 0.0);
            assert_eq!(soft.aggregate.brackets[i].mean_count, 0.0);
        }
        assert!((soft.distribution.weights()[i] - hard.distribution.weights()[i]).abs() < 1e-12);
    }
    // Same weights and same seed: identical draws
    assert_eq!(soft.runs, hard.runs);
}

#[test]
fn test_single_repeat_reproduces_the_run() {
    let engine = EngineConfig::default();
    let params = SimulationParams {
        num_bots: 30,
        churn_level: 0.3,
        num_repeats: 1,
        ..params()
    };
    let output = simulate(&engine, &params).unwrap();

    // Rebuild repetition 0 by hand
    let distribution = ChurnPolicy::new(ChurnMode::Soft, 0.3, 0.85)
        .apply(&engine.skill_model)
        .unwrap();
    let sampler = PopulationSampler::new(&engine).unwrap();
    let mut rng = repetition_rng(2024, 0);
    let lobby = sampler.draw(&mut rng, &distribution, 120, 30).unwrap();
    let expected = RunResult::from_lobby(&lobby, &SweatScorer::from_config(&engine));

    let agg = &output.aggregate;
    assert_eq!(output.runs, vec![expected.clone()]);
    assert_eq!(agg.composite_mean, expected.composite_score);
    assert_eq!(agg.composite_std, 0.0);
    assert_eq!(agg.median_mean, expected.median_skill);
    assert_eq!(agg.top_mean_mean, expected.top_mean_skill);
    assert_eq!(agg.sweat_mean, expected.sweat_rating);
    assert_eq!(agg.sweat_rating, expected.sweat_rating);
    assert_eq!(agg.human_median_mean, expected.human_median_skill);
}

#[test]
fn test_bots_lower_the_sweat() {
    let engine = EngineConfig::default();
    let humans = simulate(&engine, &params()).unwrap();
    let mostly_bots = simulate(
        &engine,
        &SimulationParams {
            num_bots: 140,
            ..params()
        },
    )
    .unwrap();
    assert!(mostly_bots.aggregate.composite_mean < humans.aggregate.composite_mean);
    assert!(mostly_bots.aggregate.sweat_rating <= humans.aggregate.sweat_rating);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let engine = EngineConfig::default();
    assert!(
        simulate(&engine, &params()).is_ok(),
        "baseline params must be accepted"
    );

    let cases = [
        (
            "churn_level",
            SimulationParams {
                churn_level: 1.5,
                ..params()
            },
        ),
        (
            "kd_churn_cutoff",
            SimulationParams {
                kd_churn_cutoff: -0.1,
                ..params()
            },
        ),
        (
            "num_bots",
            SimulationParams {
                num_bots: 151,
                ..params()
            },
        ),
        (
            "num_repeats",
            SimulationParams {
                num_repeats: 0,
                ..params()
            },
        ),
    ];
    for (field, case) in cases {
        match simulate(&engine, &case) {
            Err(SweatError::InvalidConfiguration(msg)) => {
                assert!(msg.contains(field), "error for {} was: {}", field, msg)
            }
            other => panic!("{} not rejected as invalid config: {:?}", field, other.map(|o| o.seed)),
        }
    }
}
