//! High score leaderboard
//!
//! Lives only as long as the process; tracks the top 10 finished runs.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Kill score
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Run number within this process (1-based)
    pub run: u32,
}

impl HighScoreEntry {
    /// Ordering key: score first, deeper level breaks ties
    fn rank_key(&self) -> (u64, u32) {
        (self.score, self.level)
    }
}

/// High score leaderboard, sorted best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a result qualifies for the leaderboard
    pub fn qualifies(&self, score: u64, level: u32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if the result beats the lowest entry
        self.entries
            .last()
            .map(|e| (score, level) > e.rank_key())
            .unwrap_or(true)
    }

    /// Get the rank a result would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64, level: u32) -> Option<usize> {
        if !self.qualifies(score, level) {
            return None;
        }
        let rank = self.entries.iter().position(|e| (score, level) > e.rank_key());
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished run (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_score(&mut self, score: u64, level: u32, run: u32) -> Option<usize> {
        let rank = self.potential_rank(score, level)?;
        self.entries.insert(rank - 1, HighScoreEntry { score, level, run });
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Run {run} placed #{rank} (score {score}, level {level})");
        Some(rank)
    }

    /// Get the best entry (if any)
    pub fn best(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }
}
