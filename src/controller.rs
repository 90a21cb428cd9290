//! Level sequencing
//!
//! The controller owns the run: it builds levels, carries ammo and score
//! from a cleared level into the next, and stops at game over until a
//! restart is requested.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::highscores::HighScores;
use crate::settings::{Settings, SettingsError};
use crate::sim::{GamePhase, GameState, Snapshot, TickInput, tick};

/// Run-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Playing,
    /// Player was caught; waiting for `restart`
    GameOver,
}

/// Sequences sessions and holds progression across them
#[derive(Debug)]
pub struct GameController {
    settings: Settings,
    rng: Pcg32,
    state: GameState,
    phase: ControllerPhase,
    high_scores: HighScores,
    /// 1-based run counter (restarts increment it)
    run: u32,
    quit_requested: bool,
}

impl GameController {
    /// Start a run at level 1. Fails if `settings` do not validate.
    pub fn new(settings: Settings, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new_level(&settings, 1, rng.random(), None, 0);
        Ok(Self {
            settings,
            rng,
            state,
            phase: ControllerPhase::Playing,
            high_scores: HighScores::new(),
            run: 1,
            quit_requested: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn run(&self) -> u32 {
        self.run
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Run one tick and return the snapshot to draw.
    ///
    /// A cleared level is replaced by the next one before the snapshot is
    /// taken; the events of the clearing tick are still included.
    pub fn step(&mut self, input: &TickInput, now_ms: u64) -> Snapshot {
        if input.quit {
            self.quit_requested = true;
        }
        if self.phase == ControllerPhase::GameOver || self.quit_requested {
            return Snapshot::capture(&self.state, Vec::new());
        }

        tick(&mut self.state, input, now_ms);
        let events = self.state.take_events();

        match self.state.phase {
            GamePhase::Running => {}
            GamePhase::LevelClear => self.advance_level(now_ms),
            GamePhase::Lost => {
                log::info!(
                    "Game over on level {} with score {}",
                    self.state.level,
                    self.state.score
                );
                self.high_scores
                    .add_score(self.state.score, self.state.level, self.run);
                self.phase = ControllerPhase::GameOver;
            }
        }

        Snapshot::capture(&self.state, events)
    }

    /// Build the next level, carrying the current player's ammo forward
    fn advance_level(&mut self, now_ms: u64) {
        let next_level = self.state.level + 1;
        let seed = self.rng.random();
        let mut next = GameState::new_level(
            &self.settings,
            next_level,
            seed,
            Some(&self.state.player),
            self.state.score,
        );
        next.now_ms = now_ms;
        next.time_ticks = self.state.time_ticks;
        self.state = next;
    }

    /// Start a fresh run at level 1 (the external "try again")
    pub fn restart(&mut self) {
        if self.phase == ControllerPhase::Playing {
            self.high_scores
                .add_score(self.state.score, self.state.level, self.run);
        }
        self.run += 1;
        let seed = self.rng.random();
        self.state = GameState::new_level(&self.settings, 1, seed, None, 0);
        self.phase = ControllerPhase::Playing;
        self.quit_requested = false;
        log::info!("Run {} started", self.run);
    }
}
