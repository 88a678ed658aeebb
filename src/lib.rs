//! Candy Rope - physics core for a cut-the-rope minigame
//!
//! Core modules:
//! - `sim`: Per-level simulation (ropes, candy, monster, tick pipeline)
//! - `levels`: Level catalog in canvas-fraction coordinates
//! - `progress`: Level advancement and run outcome
//! - `game_loop`: Frame-driven orchestrator with host callbacks
//! - `view`: Geometry exposed to the rendering collaborator
//! - `tuning`: Data-driven gameplay constants

pub mod game_loop;
pub mod highscores;
pub mod levels;
pub mod progress;
pub mod sim;
pub mod tuning;
pub mod view;

pub use game_loop::{GameLoop, LoopHooks, LoopStatus, PointerHandle};
pub use highscores::HighScores;
pub use levels::{Level, LevelCatalog};
pub use progress::{Advance, Progress, RunOutcome, RunSummary};
pub use tuning::Tuning;

use glam::Vec2;

/// Gameplay defaults (overridable through `Tuning`)
pub mod consts {
    /// Downward acceleration while free (pixels/s²)
    pub const GRAVITY: f32 = 980.0;
    /// Velocity multiplier applied once per free tick
    pub const AIR_RESISTANCE: f32 = 0.99;
    /// Horizontal speed kept after hitting a side wall
    pub const WALL_RESTITUTION: f32 = 0.7;
    /// Vertical speed kept after hitting the floor
    pub const FLOOR_RESTITUTION: f32 = 0.5;
    /// Horizontal speed kept after touching the floor
    pub const FLOOR_FRICTION: f32 = 0.9;

    /// Candy radius (pixels)
    pub const CANDY_RADIUS: f32 = 15.0;
    /// Monster bounding box (pixels)
    pub const MONSTER_WIDTH: f32 = 80.0;
    pub const MONSTER_HEIGHT: f32 = 80.0;

    /// Points sampled along a rope when testing a cut
    pub const CUT_SAMPLES: usize = 10;
    /// Pointer distance to a sample that cuts the rope (pixels)
    pub const CUT_RADIUS: f32 = 20.0;

    /// Mouth opens within `half_width * ratio + candy radius`
    pub const MOUTH_OPEN_RATIO: f32 = 1.0;
    /// Candy is eaten within `half_width * ratio`
    pub const EAT_RATIO: f32 = 1.0 / 3.0;

    /// Candy is lost once below `canvas height + margin` (pixels)
    pub const LOST_MARGIN: f32 = 50.0;
    /// Score awarded for each candy eaten
    pub const SCORE_PER_CANDY: u32 = 100;

    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Most ropes a single level may define (attachment bitset width)
    pub const MAX_ROPES: usize = 64;
}

/// Point at parameter `t` in [0, 1] along the segment `a -> b`
#[inline]
pub fn lerp_point(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Resolve a canvas-fraction position to pixels
#[inline]
pub fn fraction_to_pixels(fraction: Vec2, canvas: Vec2) -> Vec2 {
    fraction * canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_point_endpoints() {
        let a = Vec2::new(10.0, 20.0);
        let b = Vec2::new(30.0, -20.0);
        assert_eq!(lerp_point(a, b, 0.0), a);
        assert_eq!(lerp_point(a, b, 1.0), b);
        assert_eq!(lerp_point(a, b, 0.5), Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_fraction_to_pixels() {
        let px = fraction_to_pixels(Vec2::new(0.5, 0.1), Vec2::new(800.0, 600.0));
        assert!((px.x - 400.0).abs() < 1e-4);
        assert!((px.y - 60.0).abs() < 1e-4);
    }
}
