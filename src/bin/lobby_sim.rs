//! Lobby Simulator
//!
//! Runs the sweat simulation from the command line and prints a text report
//! or JSON for downstream plotting.

use clap::{Args, Parser, Subcommand, ValueEnum};
use lobby_sweat::core::error::{Result, SweatError};
use lobby_sweat::report::{render_sweep, LobbyReport};
use lobby_sweat::simulation::{simulate, sweep_bots};
use lobby_sweat::{EngineConfig, SimulationParams};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lobby Simulator - estimate how sweaty a matchmaking lobby feels
#[derive(Parser, Debug)]
#[command(name = "lobby_sim")]
#[command(about = "Monte Carlo lobby intensity under bot fill and skill churn")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate one lobby configuration
    Run(SimArgs),
    /// Simulate a range of bot counts with otherwise identical settings
    Sweep {
        #[command(flatten)]
        sim: SimArgs,

        /// First bot count
        #[arg(long, default_value_t = 0)]
        from: u32,

        /// Last bot count (inclusive)
        #[arg(long, default_value_t = 140)]
        to: u32,

        /// Bot count increment
        #[arg(long, default_value_t = 10)]
        step: u32,
    },
}

#[derive(Args, Debug)]
struct SimArgs {
    /// Bots in the lobby
    #[arg(long, default_value_t = 0)]
    bots: u32,

    /// Fraction of low-skill brackets removed (soft churn)
    #[arg(long, default_value_t = 0.0)]
    churn: f64,

    /// Remove every bracket below the cutoff instead of a fraction
    #[arg(long)]
    hard_churn: bool,

    /// K/D below which brackets churn
    #[arg(long, default_value_t = 0.85)]
    cutoff: f64,

    /// Runs to average
    #[arg(long, default_value_t = 20)]
    repeats: u32,

    /// Master seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config TOML (skill model, lobby size, sweat curve)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    /// Full output: seed, params, effective distribution, every run
    Raw,
}

impl SimArgs {
    fn engine(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(path) => EngineConfig::load(path),
            None => Ok(EngineConfig::default()),
        }
    }

    fn params(&self) -> SimulationParams {
        SimulationParams {
            num_bots: self.bots,
            churn_level: self.churn,
            advanced_churn: self.hard_churn,
            kd_churn_cutoff: self.cutoff,
            num_repeats: self.repeats,
            seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lobby_sweat=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let engine = args.engine()?;
            let output = simulate(&engine, &args.params())?;
            let report = LobbyReport::new(&output, &engine);
            match args.format {
                Format::Text => println!("{}", report.render_text()),
                Format::Json => println!("{}", report.to_json()?),
                Format::Raw => println!("{}", output.to_json()?),
            }
        }
        Command::Sweep { sim, from, to, step } => {
            if step == 0 {
                return Err(SweatError::invalid("--step must be at least 1"));
            }
            let engine = sim.engine()?;
            let bot_counts: Vec<u32> = (from..=to).step_by(step as usize).collect();
            let points = sweep_bots(&engine, &sim.params(), &bot_counts)?;
            match sim.format {
                Format::Text => print!("{}", render_sweep(&points)),
                Format::Json | Format::Raw => {
                    println!("{}", serde_json::to_string_pretty(&points)?)
                }
            }
        }
    }

    Ok(())
}
