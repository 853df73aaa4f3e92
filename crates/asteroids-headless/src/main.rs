//! Headless driver for the Asteroids simulation core.
//!
//! Runs a session with a scripted pilot at the fixed frame cadence, routes
//! sound intents to a sample-directory sink and prints a summary.
//!
//! ```text
//! asteroids-headless --ticks 3600 --seed 7 --enhanced --sounds-dir sounds/
//! RUST_LOG=asteroids_core=debug asteroids-headless --config session.json --json
//! ```

mod autopilot;
mod sound;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use asteroids_core::{Command, Effect, Game, GameConfig, Phase, Ruleset};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::autopilot::Autopilot;
use crate::sound::SoundSink;

#[derive(Parser, Debug)]
#[command(name = "asteroids-headless")]
#[command(about = "Run the Asteroids simulation without a display")]
struct Cli {
    /// JSON file with a `GameConfig`; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frames to simulate before stopping
    #[arg(long, default_value_t = 1800)]
    ticks: u64,
    /// Seed override
    #[arg(long)]
    seed: Option<u64>,
    /// Play the enhanced ruleset
    #[arg(long)]
    enhanced: bool,
    /// Directory holding the sound samples
    #[arg(long)]
    sounds_dir: Option<PathBuf>,
    /// Keep playing after game over by starting again
    #[arg(long)]
    keep_playing: bool,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    ruleset: Ruleset,
    seed: u64,
    frames: u64,
    simulated_ms: u64,
    games: u32,
    phase: Phase,
    score: u64,
    best_score: u64,
    level: u32,
    lives: u32,
    entities: usize,
    legend: String,
    sounds_played: u64,
    sounds_dropped: u64,
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid config: {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.enhanced {
        config.ruleset = Ruleset::Enhanced;
    }
    info!(ruleset = ?config.ruleset, seed = config.seed, ticks = cli.ticks, "session_start");

    let mut game = Game::new(config.clone());
    let mut pilot = Autopilot::new(config.is_enhanced());
    let mut sink = SoundSink::new(cli.sounds_dir.as_deref());
    let mut legend = String::new();
    let mut games: u32 = 0;
    let mut frames: u64 = 0;

    for _ in 0..cli.ticks {
        if game.phase() == Phase::GameOver {
            if !cli.keep_playing {
                break;
            }
            game.queue(Command::Start);
            games += 1;
        }

        let decision = pilot.decide(&game);
        for command in decision.commands {
            if command == Command::Start {
                games += 1;
            }
            game.queue(command);
        }
        game.advance_frame(&decision.controls);
        frames += 1;

        for effect in game.take_effects() {
            match effect {
                Effect::PlaySound(kind) => sink.play(kind),
                Effect::SetLegend(text) => {
                    debug!(legend = %text, "legend");
                    legend = text;
                }
                Effect::StatsChanged => debug!(
                    score = game.score(),
                    lives = game.lives(),
                    level = game.level(),
                    "stats"
                ),
            }
        }
    }

    let summary = Summary {
        ruleset: config.ruleset,
        seed: config.seed,
        frames,
        simulated_ms: game.now_ms(),
        games,
        phase: game.phase(),
        score: game.score(),
        best_score: game.best_score(),
        level: game.level(),
        lives: game.lives(),
        entities: game.world().len(),
        legend,
        sounds_played: sink.played().values().sum(),
        sounds_dropped: sink.dropped(),
    };
    info!(frames, score = summary.score, phase = %summary.phase, "session_end");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Session finished.");
        println!("  Ruleset:       {:?}", summary.ruleset);
        println!("  Seed:          {}", summary.seed);
        println!("  Frames:        {}", summary.frames);
        println!("  Games:         {}", summary.games);
        println!("  Phase:         {}", summary.phase);
        println!("  Score:         {}", summary.score);
        println!("  Best score:    {}", summary.best_score);
        println!("  Level:         {}", summary.level);
        println!("  Lives:         {}", summary.lives);
        println!("  Entities:      {}", summary.entities);
        println!(
            "  Sounds:        {} played, {} dropped",
            summary.sounds_played, summary.sounds_dropped
        );
        for (sample, count) in sink.played() {
            println!("    {sample:<18} {count}");
        }
    }
    Ok(())
}
