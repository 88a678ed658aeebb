//! Rope constraint stepping
//!
//! A rope has no dynamics of its own: each tick its end point is derived
//! from where the candy is. Slack ropes end at the candy; taut ropes end
//! `length` pixels from the anchor in the candy's direction.

use glam::Vec2;

use super::state::Rope;
use crate::lerp_point;

impl Rope {
    /// Recompute the end point and angle from the candy position
    pub fn step(&mut self, candy_pos: Vec2) {
        if self.cut {
            return;
        }

        let to_candy = candy_pos - self.anchor;
        let dist = to_candy.length();

        self.end = if dist > self.length {
            self.anchor + to_candy / dist * self.length
        } else {
            candy_pos
        };

        let d = self.end - self.anchor;
        self.angle = d.y.atan2(d.x);
    }

    /// Whether the rope is held at full length
    pub fn is_taut(&self) -> bool {
        !self.cut && self.anchor.distance(self.end) >= self.length - 1e-3
    }

    /// `count` evenly spaced points from anchor to end, both included
    pub fn sample_points(&self, count: usize) -> impl Iterator<Item = Vec2> + '_ {
        let last = count.saturating_sub(1).max(1) as f32;
        (0..count).map(move |i| lerp_point(self.anchor, self.end, i as f32 / last))
    }
}

/// Step every uncut rope toward the candy
pub fn step_ropes(ropes: &mut [Rope], candy_pos: Vec2) {
    for rope in ropes.iter_mut().filter(|r| !r.cut) {
        rope.step(candy_pos);
    }
}
