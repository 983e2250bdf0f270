//! Locomotion state machine
//!
//! Owns the character's motion state and computes the desired velocity the
//! physics integrator applies each tick.

mod dynamics;
mod state;

pub use dynamics::{Locomotion, BOOST_JUMP_HEIGHT, CHARACTER_GRAVITY};
pub use state::{next_state, MotionState};
