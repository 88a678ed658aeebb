//! Local high score leaderboard
//!
//! Tracks the top 10 finished runs. Stored as JSON next to the game.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progress::{RunOutcome, RunSummary};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("high score file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    pub levels_cleared: usize,
    /// Whether every level was completed
    pub won: bool,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run. Returns the rank achieved, if any.
    pub fn record_run(&mut self, summary: &RunSummary, timestamp: f64) -> Option<usize> {
        if !self.qualifies(summary.score) {
            return None;
        }

        let entry = HighScoreEntry {
            score: summary.score,
            levels_cleared: summary.levels_cleared,
            won: summary.outcome == RunOutcome::Won,
            timestamp,
        };

        // Sorted descending by score; ties keep the older run first
        let pos = self.entries.iter().position(|e| summary.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("High score {} recorded at rank {}", summary.score, rank);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a JSON file; a missing file is an empty leaderboard
    pub fn load(path: &Path) -> Result<Self, HighScoreError> {
        if !path.exists() {
            log::info!("No high scores found, starting fresh");
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path)?;
        let scores: HighScores = serde_json::from_str(&json)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    pub fn save(&self, path: &Path) -> Result<(), HighScoreError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
