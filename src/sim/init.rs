//! Entity initialization from a level description

use glam::Vec2;

use super::rope::step_ropes;
use super::state::{Candy, Monster, Rope, RopeSet, SimPhase, SimState};
use crate::consts::MAX_ROPES;
use crate::fraction_to_pixels;
use crate::levels::Level;
use crate::tuning::Tuning;

/// Build fresh simulation state for `level` at the given canvas size.
///
/// Returns `None` when the canvas has no usable area yet, or when the level
/// has more ropes than a candy can track.
pub fn init_level(level: &Level, level_index: usize, canvas: Vec2, tuning: &Tuning) -> Option<SimState> {
    if !(canvas.x > 0.0 && canvas.y > 0.0 && canvas.is_finite()) {
        log::warn!(
            "Skipping level {} init: canvas is {}x{}",
            level_index + 1,
            canvas.x,
            canvas.y
        );
        return None;
    }
    if level.rope_anchors.len() > MAX_ROPES {
        log::warn!(
            "Skipping level {} init: {} ropes exceeds the limit of {}",
            level_index + 1,
            level.rope_anchors.len(),
            MAX_ROPES
        );
        return None;
    }

    let mut ropes: Vec<Rope> = level
        .rope_anchors
        .iter()
        .enumerate()
        .map(|(i, a)| Rope::new(i as u8, fraction_to_pixels(a.position().to_vec2(), canvas), a.length))
        .collect();

    let candy_start = fraction_to_pixels(level.candy_start_position.to_vec2(), canvas);
    let mut candy = Candy::new(candy_start, tuning.candy_radius, RopeSet::first_n(ropes.len()));

    // Settle ropes against the start position so frame zero already
    // satisfies the length and mean constraints
    step_ropes(&mut ropes, candy.pos);
    if let Some(mean) = super::candy::attached_mean(&ropes, candy.ropes) {
        candy.pos = mean;
    }

    let monster = Monster::new(
        fraction_to_pixels(level.monster_position.to_vec2(), canvas),
        tuning.monster_width,
        tuning.monster_height,
    );

    log::info!(
        "Level {} '{}' initialized: {} ropes, canvas {}x{}",
        level_index + 1,
        level.name,
        ropes.len(),
        canvas.x,
        canvas.y
    );

    Some(SimState {
        canvas,
        level_index,
        ropes,
        candy,
        monster,
        phase: SimPhase::Running,
        eaten: false,
        time_ticks: 0,
    })
}
