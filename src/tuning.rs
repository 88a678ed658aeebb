//! Gameplay tuning
//!
//! Every physics and scoring constant the simulation reads. Missing fields
//! fall back to the defaults in `consts`, so partial JSON overrides work.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Free fall ===
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Per-tick velocity multiplier
    pub air_resistance: f32,
    pub wall_restitution: f32,
    pub floor_restitution: f32,
    pub floor_friction: f32,
    /// Bounce off the canvas bottom; when off the candy falls out of view
    pub floor_enabled: bool,

    // === Entities ===
    pub candy_radius: f32,
    pub monster_width: f32,
    pub monster_height: f32,

    // === Cutting ===
    pub cut_samples: usize,
    pub cut_radius: f32,

    // === Monster thresholds (fractions of the monster half width) ===
    pub mouth_open_ratio: f32,
    pub eat_ratio: f32,

    // === Run ===
    pub lost_margin: f32,
    pub score_per_candy: u32,
    /// Frame deltas above this are clamped (seconds)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            air_resistance: AIR_RESISTANCE,
            wall_restitution: WALL_RESTITUTION,
            floor_restitution: FLOOR_RESTITUTION,
            floor_friction: FLOOR_FRICTION,
            floor_enabled: true,

            candy_radius: CANDY_RADIUS,
            monster_width: MONSTER_WIDTH,
            monster_height: MONSTER_HEIGHT,

            cut_samples: CUT_SAMPLES,
            cut_radius: CUT_RADIUS,

            mouth_open_ratio: MOUTH_OPEN_RATIO,
            eat_ratio: EAT_RATIO,

            lost_margin: LOST_MARGIN,
            score_per_candy: SCORE_PER_CANDY,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        check_positive("candy_radius", self.candy_radius)?;
        check_positive("monster_width", self.monster_width)?;
        check_positive("monster_height", self.monster_height)?;
        check_positive("cut_radius", self.cut_radius)?;
        check_positive("max_frame_dt", self.max_frame_dt)?;
        check_unit("air_resistance", self.air_resistance)?;
        check_unit("wall_restitution", self.wall_restitution)?;
        check_unit("floor_restitution", self.floor_restitution)?;
        check_unit("floor_friction", self.floor_friction)?;
        check_non_negative("mouth_open_ratio", self.mouth_open_ratio)?;
        check_non_negative("eat_ratio", self.eat_ratio)?;
        check_non_negative("lost_margin", self.lost_margin)?;
        if !self.gravity.is_finite() {
            return Err(TuningError::OutOfRange {
                field: "gravity",
                expected: "finite",
                value: self.gravity,
            });
        }
        if self.cut_samples < 2 {
            return Err(TuningError::OutOfRange {
                field: "cut_samples",
                expected: "at least 2",
                value: self.cut_samples as f32,
            });
        }
        Ok(())
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "finite and > 0",
            value,
        })
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "finite and >= 0",
            value,
        })
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "in [0, 1]",
            value,
        })
    }
}
