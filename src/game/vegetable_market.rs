//! Shared vegetable market.
//!
//! Each species has a price ladder and an index into it. Species are coupled
//! in pairs that always share an index: selling more of the first species of
//! a pair than of the second moves the pair's index up, and vice versa.
//! Sales are tallied during a turn and only move prices when [`adapt`] runs
//! at the turn boundary.
//!
//! [`adapt`]: VegetableMarket::adapt

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::game::error::{GameError, GameResult};
use crate::game::vegetable::Vegetable;

/// Sales difference needed to move a pair's index by one step.
pub const PRICE_SHIFT_DIVISOR: i64 = 2;

/// Longest allowed price ladder.
pub const MAX_LADDER_LEN: usize = 5;

/// Order in which the price table is shown.
pub const DISPLAY_ORDER: [Vegetable; 4] = [
    Vegetable::Mushroom,
    Vegetable::Carrot,
    Vegetable::Tomato,
    Vegetable::Salad,
];

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Price table and coupling for a [`VegetableMarket`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Price ladder per species
    pub ladders: BTreeMap<Vegetable, Vec<u32>>,
    /// Coupled species pairs
    pub pairs: Vec<(Vegetable, Vegetable)>,
    /// Starting index into every ladder
    pub initial_index: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            ladders: BTreeMap::from([
                (Vegetable::Carrot, vec![3, 2, 2, 2, 1]),
                (Vegetable::Salad, vec![6, 5, 4, 3, 2]),
                (Vegetable::Tomato, vec![3, 5, 6, 7, 9]),
                (Vegetable::Mushroom, vec![12, 15, 16, 17, 20]),
            ]),
            pairs: vec![
                (Vegetable::Carrot, Vegetable::Mushroom),
                (Vegetable::Salad, Vegetable::Tomato),
            ],
            initial_index: 2,
        }
    }
}

impl MarketConfig {
    /// Check that every species is priced and every pair is well formed.
    pub fn validate(&self) -> GameResult<()> {
        for vegetable in Vegetable::ALL {
            let ladder = self.ladders.get(&vegetable).ok_or_else(|| {
                GameError::illegal_argument(format!("No price ladder for {}", vegetable.plural()))
            })?;
            if ladder.len() > MAX_LADDER_LEN {
                return Err(GameError::illegal_argument(format!(
                    "The {} ladder has more than {MAX_LADDER_LEN} prices",
                    vegetable.singular()
                )));
            }
            if self.initial_index >= ladder.len() {
                return Err(GameError::illegal_argument(format!(
                    "Initial price index {} is outside the {} ladder",
                    self.initial_index,
                    vegetable.singular()
                )));
            }
        }

        let mut paired = Vec::new();
        for &(first, second) in &self.pairs {
            if first == second {
                return Err(GameError::illegal_argument(format!(
                    "Cannot pair {} with itself",
                    first.plural()
                )));
            }
            if paired.contains(&first) || paired.contains(&second) {
                return Err(GameError::illegal_argument(
                    "A vegetable may belong to at most one pair",
                ));
            }
            paired.extend([first, second]);
        }
        Ok(())
    }
}

// =============================================================================
// MARKET
// =============================================================================

/// The vegetable market shared by all players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VegetableMarket {
    config: MarketConfig,
    indices: BTreeMap<Vegetable, usize>,
    sold: BTreeMap<Vegetable, u32>,
}

impl VegetableMarket {
    /// Build a market from a validated price table.
    pub fn new(config: MarketConfig) -> GameResult<Self> {
        config.validate()?;
        let indices = Vegetable::ALL
            .into_iter()
            .map(|v| (v, config.initial_index))
            .collect();
        Ok(Self {
            config,
            indices,
            sold: BTreeMap::new(),
        })
    }

    /// Current index into the ladder of `vegetable`.
    #[inline]
    pub fn index_of(&self, vegetable: Vegetable) -> usize {
        self.indices.get(&vegetable).copied().unwrap_or(self.config.initial_index)
    }

    /// Current unit price of `vegetable`.
    pub fn price(&self, vegetable: Vegetable) -> u32 {
        self.config
            .ladders
            .get(&vegetable)
            .and_then(|ladder| ladder.get(self.index_of(vegetable)))
            .copied()
            .unwrap_or(0)
    }

    /// Units of `vegetable` sold since the last adaptation.
    #[inline]
    pub fn sold(&self, vegetable: Vegetable) -> u32 {
        self.sold.get(&vegetable).copied().unwrap_or(0)
    }

    /// Tally a sale. Prices are unaffected until [`adapt`](Self::adapt).
    pub fn record_sale(&mut self, vegetable: Vegetable, amount: u32) {
        let tally = self.sold.entry(vegetable).or_insert(0);
        *tally = tally.saturating_add(amount);
    }

    /// Move paired indices according to the tallies, then reset the tallies.
    pub fn adapt(&mut self) {
        for &(first, second) in &self.config.pairs {
            let delta = i64::from(self.sold(first)) - i64::from(self.sold(second));
            let shift = delta / PRICE_SHIFT_DIVISOR;
            if shift == 0 {
                continue;
            }

            let top = self.ladder_len(first).min(self.ladder_len(second)).saturating_sub(1);
            let moved = (self.index_of(first) as i64 + shift).clamp(0, top as i64) as usize;
            self.indices.insert(first, moved);
            self.indices.insert(second, moved);
            debug!(first = %first, second = %second, index = moved, "market prices moved");
        }
        self.sold.clear();
    }

    /// Current prices in display order.
    pub fn price_table(&self) -> Vec<(Vegetable, u32)> {
        DISPLAY_ORDER.iter().map(|&v| (v, self.price(v))).collect()
    }

    fn ladder_len(&self, vegetable: Vegetable) -> usize {
        self.config.ladders.get(&vegetable).map_or(0, Vec::len)
    }
}

impl Default for VegetableMarket {
    fn default() -> Self {
        let config = MarketConfig::default();
        let indices = Vegetable::ALL
            .into_iter()
            .map(|v| (v, config.initial_index))
            .collect();
        Self {
            config,
            indices,
            sold: BTreeMap::new(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
