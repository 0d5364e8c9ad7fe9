//! # Queens Farming
//!
//! Deterministic engine for a turn-based farming economy game.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      QUEENS FARMING                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  core/                - Deterministic primitives             │
//! │  ├── countdown.rs     - Turn-driven timers                   │
//! │  ├── position.rs      - Integer grid coordinates             │
//! │  ├── rng.rs           - Deterministic Xorshift128+ PRNG      │
//! │  └── hash.rs          - State hashing for verification       │
//! │                                                              │
//! │  game/                - Game rules (deterministic)           │
//! │  ├── vegetable.rs     - Vegetable catalog                    │
//! │  ├── acreage.rs       - Land types and growth                │
//! │  ├── barn.rs          - Gold, storage, spoilage              │
//! │  ├── farm.rs          - Barn plus acreages                   │
//! │  ├── *_market.rs      - Shared vegetable and land markets    │
//! │  ├── player.rs        - Move budget and actions              │
//! │  ├── turn.rs          - Turn handle and driver trait         │
//! │  ├── master.rs        - Round loop and result                │
//! │  └── strategy.rs      - Greedy reference driver              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time dependencies
//! - Timers only advance at explicit turn boundaries
//! - The land shuffle draws from a seeded Xorshift128+
//!
//! The same configuration and the same deterministic driver always end in
//! the same state hash.
//!
//! ## Example
//!
//! ```
//! use queens_farming::game::{GameConfig, GameMaster, PlayerTurn};
//!
//! let mut master = GameMaster::new(GameConfig::new(7, 100, 10, ["Ann", "Ben"])).unwrap();
//! let outcome = master.play(&mut |turn: &mut PlayerTurn<'_>| turn.quit_game());
//! assert_eq!(outcome.describe(), "Player 1 (Ann): 10\nPlayer 2 (Ben): 10\nAnn and Ben have won!");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::position::Position;
pub use core::rng::DeterministicRng;
pub use game::error::{GameError, GameResult, IllegalMove};
pub use game::master::{GameConfig, GameMaster, GameOutcome};
pub use game::turn::{PlayerTurn, TurnDriver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Moves each player gets per turn
pub const MOVES_PER_TURN: u32 = 2;
