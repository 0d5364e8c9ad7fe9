//! Shared pool of purchasable land.
//!
//! The pool is fixed at game start: every type contributes its per-player
//! quota, minus the parcels each farm starts with, times the number of
//! players. The pool is shuffled once with the game seed and handed out in
//! that order, so the type a player receives is not known in advance.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::position::Position;
use crate::core::rng::DeterministicRng;
use crate::game::acreage::{Acreage, AcreageType};
use crate::game::error::IllegalMove;
use crate::game::farm::STARTING_ACREAGES;

/// Gold per step of distance from the barn.
pub const PRICE_FACTOR: u32 = 10;

/// The acreage pool shared by all players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcreageMarket {
    acreages: Vec<AcreageType>,
    next: usize,
}

impl AcreageMarket {
    /// Build and shuffle the pool for `players` players.
    pub fn new(seed: i64, players: usize) -> Self {
        let mut acreages = Vec::new();
        for acreage_type in AcreageType::ALL {
            let starting = STARTING_ACREAGES
                .iter()
                .filter(|(_, t)| *t == acreage_type)
                .count();
            let quota = (acreage_type.per_player() as usize).saturating_sub(starting);
            acreages.extend(std::iter::repeat(acreage_type).take(quota * players));
        }

        let mut rng = DeterministicRng::from_game_seed(seed);
        rng.shuffle(&mut acreages);
        debug!(seed, players, pool = acreages.len(), "acreage market shuffled");

        Self { acreages, next: 0 }
    }

    /// Price of the land at `position`: `10 × (distance − 1)`.
    pub fn price_for(&self, position: Position) -> u32 {
        let distance = Position::ORIGIN.manhattan_distance(position);
        PRICE_FACTOR.saturating_mul(distance.saturating_sub(1))
    }

    /// Is any acreage left?
    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.next < self.acreages.len()
    }

    /// Number of acreages left.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.acreages.len() - self.next
    }

    /// Type of the acreage that would be handed out next.
    pub fn peek(&self) -> Option<AcreageType> {
        self.acreages.get(self.next).copied()
    }

    /// Types still in the pool, in hand-out order.
    pub fn upcoming(&self) -> &[AcreageType] {
        &self.acreages[self.next..]
    }

    /// Hand out the next acreage.
    pub fn take_next(&mut self) -> Result<Acreage, IllegalMove> {
        let acreage_type = self.peek().ok_or(IllegalMove::NoAcreagesLeft)?;
        self.next += 1;
        Ok(Acreage::new(acreage_type))
    }
}
