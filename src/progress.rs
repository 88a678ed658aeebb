//! Level and run progression
//!
//! Tracks which level is active, whether it has been completed, and how the
//! run ended. Eating the candy completes a level; losing it ends the run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::levels::{Level, LevelCatalog};
use crate::sim::{SimState, init_level};
use crate::tuning::Tuning;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every level completed
    Won,
    /// A candy fell out of the canvas
    Lost,
}

/// Final numbers reported to the host when a run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub score: u64,
    pub levels_cleared: usize,
    /// 0-based index of the last level played
    pub level_index: usize,
}

/// Result of asking to move past the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Level not completed yet (or run already over); nothing changed
    NotReady,
    /// Moved to the level at this index
    Level(usize),
    /// The final level was completed; the run is won
    RunComplete,
}

/// Level/run progress
#[derive(Debug, Clone)]
pub struct Progress {
    catalog: LevelCatalog,
    current: usize,
    level_completed: bool,
    outcome: Option<RunOutcome>,
    score: u64,
    levels_cleared: usize,
}

impl Progress {
    pub fn new(catalog: LevelCatalog) -> Self {
        Self {
            catalog,
            current: 0,
            level_completed: false,
            outcome: None,
            score: 0,
            levels_cleared: 0,
        }
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_level(&self) -> &Level {
        // Catalogs are never empty and `current` never passes the last index
        &self.catalog[self.current]
    }

    pub fn is_final_level(&self) -> bool {
        self.catalog.is_final(self.current)
    }

    pub fn level_completed(&self) -> bool {
        self.level_completed
    }

    pub fn lost(&self) -> bool {
        self.outcome == Some(RunOutcome::Lost)
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn is_run_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn levels_cleared(&self) -> usize {
        self.levels_cleared
    }

    /// Build entities for the current level
    pub fn init_current(&self, canvas: Vec2, tuning: &Tuning) -> Option<SimState> {
        init_level(self.current_level(), self.current, canvas, tuning)
    }

    /// Record the candy being eaten. Returns false if already recorded.
    pub fn on_eaten(&mut self, points: u32) -> bool {
        if self.level_completed || self.is_run_over() {
            return false;
        }
        self.level_completed = true;
        self.levels_cleared += 1;
        self.score += u64::from(points);
        log::info!(
            "Level {} complete (score {})",
            self.current + 1,
            self.score
        );
        true
    }

    /// Record the candy being lost. Ends the run; returns false if already over.
    pub fn on_lost(&mut self) -> bool {
        if self.level_completed || self.is_run_over() {
            return false;
        }
        self.outcome = Some(RunOutcome::Lost);
        log::info!(
            "Run lost on level {} (score {})",
            self.current + 1,
            self.score
        );
        true
    }

    /// Move past a completed level
    pub fn advance(&mut self) -> Advance {
        if !self.level_completed || self.is_run_over() {
            return Advance::NotReady;
        }
        if self.is_final_level() {
            self.outcome = Some(RunOutcome::Won);
            log::info!("Run won with score {}", self.score);
            return Advance::RunComplete;
        }
        self.current += 1;
        self.level_completed = false;
        Advance::Level(self.current)
    }

    /// Start a new run from the first level
    pub fn restart(&mut self) {
        self.current = 0;
        self.level_completed = false;
        self.outcome = None;
        self.score = 0;
        self.levels_cleared = 0;
    }

    /// Snapshot for end-of-run handling
    pub fn summary(&self) -> Option<RunSummary> {
        self.outcome.map(|outcome| RunSummary {
            outcome,
            score: self.score,
            levels_cleared: self.levels_cleared,
            level_index: self.current,
        })
    }
}
