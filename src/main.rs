//! Maze Gunner headless runner
//!
//! Drives the simulation with the autopilot at a fixed frame interval and
//! reports what happened as JSON lines.

use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;

use maze_gunner::consts::FRAME_MS;
use maze_gunner::highscores::HighScoreEntry;
use maze_gunner::sim::{GamePhase, TickInput};
use maze_gunner::{ControllerPhase, GameController, Settings, Variant};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Run seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Rule set: classic or survival (overrides the config file)
    #[arg(long)]
    variant: Option<String>,
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop a run after this many ticks
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,
    /// Milliseconds between ticks
    #[arg(long, default_value_t = FRAME_MS)]
    frame_ms: u64,
    /// Print a snapshot every N ticks (0 = never)
    #[arg(long, default_value_t = 0)]
    snapshot_every: u64,
    /// Number of runs; each game over restarts until this many have finished
    #[arg(long, default_value_t = 1)]
    runs: u32,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    run: u32,
    variant: &'static str,
    level: u32,
    score: u64,
    ticks: u64,
    #[serde(rename = "gameOver")]
    game_over: bool,
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    seed: u64,
    runs: Vec<RunSummary>,
    #[serde(rename = "highScores")]
    high_scores: &'a [HighScoreEntry],
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(name) = &cli.variant {
        let Some(variant) = Variant::from_str(name) else {
            bail!("unknown variant `{name}` (expected classic or survival)");
        };
        settings.variant = variant;
    }
    if cli.frame_ms == 0 {
        bail!("--frame-ms must be greater than zero");
    }

    log::info!(
        "Maze Gunner starting: seed {}, variant {}, {} run(s)",
        cli.seed,
        settings.variant.as_str(),
        cli.runs
    );

    let out = stdout();
    let mut out = BufWriter::new(out.lock());
    let mut controller =
        GameController::new(settings, cli.seed).context("invalid settings")?;
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut runs = Vec::new();
    let mut now_ms = 0u64;

    for run in 1..=cli.runs {
        if run > 1 {
            controller.restart();
        }
        let mut ticks = 0u64;
        while ticks < cli.max_ticks && controller.phase() == ControllerPhase::Playing {
            now_ms += cli.frame_ms;
            ticks += 1;
            let snapshot = controller.step(&input, now_ms);
            let finished = snapshot.phase == GamePhase::Lost;
            if finished || (cli.snapshot_every > 0 && ticks % cli.snapshot_every == 0) {
                serde_json::to_writer(&mut out, &snapshot).context("writing snapshot")?;
                writeln!(out)?;
            }
        }

        let state = controller.state();
        runs.push(RunSummary {
            run: controller.run(),
            variant: controller.settings().variant.as_str(),
            level: state.level,
            score: state.score,
            ticks,
            game_over: controller.phase() == ControllerPhase::GameOver,
        });
    }

    let summary = Summary {
        seed: cli.seed,
        runs,
        high_scores: &controller.high_scores().entries,
    };
    serde_json::to_writer(&mut out, &summary).context("writing summary")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
