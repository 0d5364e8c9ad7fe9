//! Game Logic Module
//!
//! Farming rules, markets, and the round loop. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `vegetable`: Vegetable catalog
//! - `acreage`: Land types and crop growth
//! - `barn`: Gold, stored vegetables, spoilage
//! - `vegetable_market`: Paired price ladders
//! - `acreage_market`: Shuffled land pool
//! - `farm`: Barn plus acreages, land purchase rules
//! - `player`: Move budget and player actions
//! - `turn`: Turn handle and driver trait
//! - `master`: Round loop, win check, result
//! - `strategy`: Greedy reference driver
//! - `events`: Game journal
//! - `error`: Error types

pub mod acreage;
pub mod acreage_market;
pub mod barn;
pub mod error;
pub mod events;
pub mod farm;
pub mod master;
pub mod player;
pub mod strategy;
pub mod turn;
pub mod vegetable;
pub mod vegetable_market;

// Re-export key types
pub use acreage::{Acreage, AcreageType, Crop};
pub use acreage_market::AcreageMarket;
pub use barn::Barn;
pub use error::{GameError, GameResult, IllegalMove};
pub use events::{GameEvent, GameEventData};
pub use farm::{Changes, Farm, Tile};
pub use master::{EndReason, GameConfig, GameMaster, GameOutcome, Standing};
pub use player::{Player, PlayerSnapshot};
pub use strategy::GreedyFarmer;
pub use turn::{Markets, PlayerTurn, TurnDriver};
pub use vegetable::Vegetable;
pub use vegetable_market::{MarketConfig, VegetableMarket};
