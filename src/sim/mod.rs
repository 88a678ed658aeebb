//! Per-level simulation
//!
//! Everything here is synchronous and deterministic:
//! - Caller-supplied frame delta only
//! - Stable iteration order (ropes by id)
//! - No rendering or platform dependencies

pub mod candy;
pub mod collision;
pub mod cut;
pub mod init;
pub mod rope;
pub mod state;
pub mod tick;

pub use candy::attached_mean;
pub use collision::{Contact, candy_lost, check_monster, contact};
pub use cut::{PressEdge, resolve_cuts};
pub use init::init_level;
pub use rope::step_ropes;
pub use state::{
    Candy, CandyMode, GameEvent, Monster, PointerState, Rope, RopeId, RopeSet, SimPhase, SimState,
};
pub use tick::{TickInput, tick};
