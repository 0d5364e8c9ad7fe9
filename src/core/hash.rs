//! State Hashing for Verification
//!
//! Provides deterministic hashing of game state for:
//! - Replay validation (same seed + same driver = same hash)
//! - Cheap equality checks between two running games

use sha2::{Sha256, Digest};

use super::countdown::Countdown;
use super::position::Position;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for game state.
///
/// Wraps SHA-256 with helpers for game primitives.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for full game state.
    pub fn for_game_state() -> Self {
        Self::new(b"QUEENS_FARMING_STATE_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a length-prefixed string.
    ///
    /// The prefix keeps `("ab", "c")` and `("a", "bc")` apart.
    #[inline]
    pub fn update_str(&mut self, value: &str) {
        self.update_u64(value.len() as u64);
        self.hasher.update(value.as_bytes());
    }

    /// Update with a grid position.
    #[inline]
    pub fn update_position(&mut self, value: Position) {
        self.update_i32(value.x);
        self.update_i32(value.y);
    }

    /// Update with a countdown (armed flag, then remaining ticks).
    #[inline]
    pub fn update_countdown(&mut self, value: &Countdown) {
        match value.remaining() {
            Some(remaining) => {
                self.update_bool(true);
                self.update_u32(remaining);
            }
            None => self.update_bool(false),
        }
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for game verification.
///
/// This function is called by `GameMaster::compute_hash()`.
/// The parameter is a closure that adds state-specific data.
pub fn compute_state_hash<F>(round: u32, seed: i64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_game_state();

    // Always hash round and seed first
    hasher.update_u32(round);
    hasher.update_bytes(&seed.to_le_bytes());

    // Add game-specific state
    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
