//! Geometry handed to the rendering collaborator once per frame

use glam::Vec2;

use crate::sim::{Candy, Monster, Rope, SimState};

/// Drawable segment of an uncut rope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RopeView {
    pub anchor: Vec2,
    pub end: Vec2,
    pub taut: bool,
}

/// Read-only frame snapshot
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub canvas: Vec2,
    pub ropes: &'a [Rope],
    pub candy: &'a Candy,
    pub monster: &'a Monster,
    pub level_index: usize,
    pub level_completed: bool,
    pub lost: bool,
    pub score: u64,
}

impl<'a> FrameView<'a> {
    pub fn new(state: &'a SimState, level_completed: bool, lost: bool, score: u64) -> Self {
        Self {
            canvas: state.canvas,
            ropes: &state.ropes,
            candy: &state.candy,
            monster: &state.monster,
            level_index: state.level_index,
            level_completed,
            lost,
            score,
        }
    }

    /// Uncut ropes only; cut ropes are not drawn
    pub fn visible_ropes(&self) -> impl Iterator<Item = RopeView> + 'a {
        self.ropes.iter().filter(|r| !r.cut).map(|r| RopeView {
            anchor: r.anchor,
            end: r.end,
            taut: r.is_taut(),
        })
    }
}

/// Receives the frame geometry; implemented by the host renderer
pub trait FrameSink {
    fn draw(&mut self, frame: &FrameView<'_>);
}
