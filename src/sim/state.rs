//! Simulation state and entity types
//!
//! One `SimState` holds everything a level run mutates. It is rebuilt from
//! scratch for every level by `init::init_level`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_ROPES;

/// Rope identifier (index into `SimState::ropes`)
pub type RopeId = u8;

/// Set of rope ids, one bit per rope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RopeSet(u64);

impl RopeSet {
    pub const EMPTY: Self = Self(0);

    /// Set containing ropes `0..count`
    pub fn first_n(count: usize) -> Self {
        debug_assert!(count <= MAX_ROPES);
        if count >= MAX_ROPES {
            Self(u64::MAX)
        } else {
            Self((1u64 << count) - 1)
        }
    }

    /// Ids past `MAX_ROPES` are ignored
    #[inline]
    pub fn insert(&mut self, id: RopeId) {
        if (id as usize) < MAX_ROPES {
            self.0 |= 1u64 << id;
        }
    }

    #[inline]
    pub fn remove(&mut self, id: RopeId) {
        if (id as usize) < MAX_ROPES {
            self.0 &= !(1u64 << id);
        }
    }

    #[inline]
    pub fn contains(&self, id: RopeId) -> bool {
        (id as usize) < MAX_ROPES && self.0 & (1u64 << id) != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = RopeId> + '_ {
        let bits = self.0;
        (0..MAX_ROPES as u8).filter(move |id| bits & (1u64 << *id) != 0)
    }
}

/// A massless rope from a fixed anchor to the candy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rope {
    pub id: RopeId,
    pub anchor: Vec2,
    /// Effective end point (the candy, or the taut limit toward it)
    pub end: Vec2,
    /// Maximum anchor-to-end distance (pixels)
    pub length: f32,
    /// Direction anchor -> end (radians)
    pub angle: f32,
    /// Once cut, a rope stays cut for the rest of the run
    pub cut: bool,
}

impl Rope {
    pub fn new(id: RopeId, anchor: Vec2, length: f32) -> Self {
        Self {
            id,
            anchor,
            end: anchor,
            length,
            angle: 0.0,
            cut: false,
        }
    }
}

/// Candy motion mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandyMode {
    /// Position follows the uncut ropes
    Attached,
    /// Free fall with wall and floor bounces
    Free,
}

/// The payload the monster wants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mode: CandyMode,
    /// Ropes tied to this candy (cut or not)
    pub ropes: RopeSet,
}

impl Candy {
    pub fn new(pos: Vec2, radius: f32, ropes: RopeSet) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            mode: CandyMode::Attached,
            ropes,
        }
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.mode == CandyMode::Attached
    }
}

/// The receiver. `mouth_open` and `happy` only drive visuals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub mouth_open: bool,
    pub happy: bool,
}

impl Monster {
    pub fn new(pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            pos,
            width,
            height,
            mouth_open: false,
            happy: false,
        }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }
}

/// Phase of the current level run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Physics is stepping
    Running,
    /// Candy reached the monster; state is frozen until the next level
    Eaten,
    /// Candy fell out of the canvas; the run is over
    Lost,
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RopeCut { rope: RopeId },
    CandyReleased,
    MouthOpened,
    MouthClosed,
    CandyEaten,
    CandyLost,
}

/// Latest pointer/touch state written by the platform input handlers
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub pos: Vec2,
    pub pressing: bool,
}

/// Complete per-level simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Canvas size in pixels; bounds for walls, floor, and the lost check
    pub canvas: Vec2,
    pub level_index: usize,
    /// Ropes indexed by id
    pub ropes: Vec<Rope>,
    pub candy: Candy,
    pub monster: Monster,
    pub phase: SimPhase,
    /// Collision truth, independent of the monster's cosmetic flags
    pub eaten: bool,
    /// Ticks stepped since initialization
    pub time_ticks: u64,
}

impl SimState {
    /// Terminal phases stop all entity mutation
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.phase != SimPhase::Running
    }

    pub fn uncut_ropes(&self) -> impl Iterator<Item = &Rope> {
        self.ropes.iter().filter(|r| !r.cut)
    }
}
