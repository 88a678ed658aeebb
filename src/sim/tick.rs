//! Per-frame simulation tick
//!
//! Order: cuts -> ropes -> candy -> monster contact -> lost check.
//! Terminal phases skip everything so the frozen frame stays untouched.

use glam::Vec2;

use super::collision::{candy_lost, check_monster};
use super::cut::resolve_cuts;
use super::rope::step_ropes;
use super::state::{GameEvent, SimPhase, SimState};
use crate::tuning::Tuning;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Pointer position in canvas pixels
    pub pointer: Vec2,
    /// A press started this frame
    pub cut: bool,
}

/// Advance the level by one frame of `dt` seconds
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32, tuning: &Tuning, out: &mut Vec<GameEvent>) {
    if state.is_frozen() {
        return;
    }

    state.time_ticks += 1;

    if input.cut {
        resolve_cuts(&mut state.ropes, input.pointer, tuning, out);
    }

    step_ropes(&mut state.ropes, state.candy.pos);

    if state.candy.update(&state.ropes, dt, state.canvas, tuning) {
        log::debug!(
            "Candy released at ({:.0}, {:.0}) on tick {}",
            state.candy.pos.x,
            state.candy.pos.y,
            state.time_ticks
        );
        out.push(GameEvent::CandyReleased);
    }

    let was_open = state.monster.mouth_open;
    let contact = check_monster(&state.candy, &mut state.monster, tuning);
    if contact.mouth_open != was_open {
        out.push(if contact.mouth_open {
            GameEvent::MouthOpened
        } else {
            GameEvent::MouthClosed
        });
    }

    if contact.eaten {
        state.eaten = true;
        state.phase = SimPhase::Eaten;
        out.push(GameEvent::CandyEaten);
        return;
    }

    if candy_lost(&state.candy, state.canvas, tuning) {
        state.phase = SimPhase::Lost;
        out.push(GameEvent::CandyLost);
    }
}
