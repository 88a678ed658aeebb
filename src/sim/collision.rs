//! Candy/monster contact and the out-of-canvas check
//!
//! Two independent thresholds, both scaled by the monster half width:
//! the mouth opens when the candy gets close, and the candy is eaten when
//! it gets much closer.

use glam::Vec2;

use super::state::{Candy, Monster};
use crate::tuning::Tuning;

/// Outcome of a contact check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Candy centre to monster centre
    pub distance: f32,
    pub mouth_open: bool,
    pub eaten: bool,
}

/// Distance below which the mouth opens
#[inline]
pub fn mouth_open_distance(monster: &Monster, candy: &Candy, tuning: &Tuning) -> f32 {
    monster.half_width() * tuning.mouth_open_ratio + candy.radius
}

/// Distance below which the candy is eaten
#[inline]
pub fn eat_distance(monster: &Monster, tuning: &Tuning) -> f32 {
    monster.half_width() * tuning.eat_ratio
}

/// Pure contact test, no mutation
pub fn contact(candy: &Candy, monster: &Monster, tuning: &Tuning) -> Contact {
    let distance = candy.pos.distance(monster.pos);
    Contact {
        distance,
        mouth_open: distance < mouth_open_distance(monster, candy, tuning),
        eaten: distance < eat_distance(monster, tuning),
    }
}

/// Update the monster's cosmetic flags from the candy position
pub fn check_monster(candy: &Candy, monster: &mut Monster, tuning: &Tuning) -> Contact {
    let c = contact(candy, monster, tuning);
    monster.mouth_open = c.mouth_open;
    if c.eaten {
        monster.happy = true;
    }
    c
}

/// Free candy that dropped far enough below the canvas
pub fn candy_lost(candy: &Candy, canvas: Vec2, tuning: &Tuning) -> bool {
    !candy.is_attached() && candy.pos.y > canvas.y + tuning.lost_margin
}
