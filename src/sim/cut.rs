//! Cut input resolution
//!
//! A cut is evaluated only on the frame a press starts. Holding or dragging
//! the pointer afterwards never cuts anything.

use glam::Vec2;

use super::state::{GameEvent, Rope};
use crate::tuning::Tuning;

/// Rising-edge detector for the pointer press
#[derive(Debug, Clone, Copy, Default)]
pub struct PressEdge {
    was_pressing: bool,
}

impl PressEdge {
    /// Feed the current press state; true only on a false -> true transition
    pub fn update(&mut self, pressing: bool) -> bool {
        let edge = pressing && !self.was_pressing;
        self.was_pressing = pressing;
        edge
    }
}

/// Whether the pointer is close enough to any sample along the rope
pub fn rope_hit(rope: &Rope, pointer: Vec2, tuning: &Tuning) -> bool {
    let radius_sq = tuning.cut_radius * tuning.cut_radius;
    rope.sample_points(tuning.cut_samples)
        .any(|p| p.distance_squared(pointer) < radius_sq)
}

/// Cut every uncut rope near the pointer. Returns how many were cut.
pub fn resolve_cuts(
    ropes: &mut [Rope],
    pointer: Vec2,
    tuning: &Tuning,
    out: &mut Vec<GameEvent>,
) -> usize {
    let mut cut = 0;
    for rope in ropes.iter_mut().filter(|r| !r.cut) {
        if rope_hit(rope, pointer, tuning) {
            rope.cut = true;
            cut += 1;
            log::debug!("Rope {} cut at ({:.0}, {:.0})", rope.id, pointer.x, pointer.y);
            out.push(GameEvent::RopeCut { rope: rope.id });
        }
    }
    cut
}
