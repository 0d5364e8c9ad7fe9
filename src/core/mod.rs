//! Core deterministic primitives.
//!
//! Everything here is free of game rules. The game layer builds its
//! growth, spoilage, and land allocation on top of these types.

pub mod countdown;
pub mod hash;
pub mod position;
pub mod rng;

// Re-export core types
pub use countdown::{Countdown, Timed};
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use position::Position;
pub use rng::DeterministicRng;
