//! Turn handles and drivers.
//!
//! The game master owns the shared markets and lends them, together with
//! the active player, to a [`PlayerTurn`] for the duration of one turn. A
//! [`TurnDriver`] decides what the player does with that handle.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::core::position::Position;
use crate::game::acreage::AcreageType;
use crate::game::acreage_market::AcreageMarket;
use crate::game::barn::Barn;
use crate::game::error::GameResult;
use crate::game::farm::{Changes, Farm};
use crate::game::player::Player;
use crate::game::vegetable::Vegetable;
use crate::game::vegetable_market::VegetableMarket;

/// Markets shared by every player of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markets {
    /// Vegetable prices
    pub vegetables: VegetableMarket,
    /// Land pool
    pub acreages: AcreageMarket,
}

/// The active player's view of the game for one turn.
pub struct PlayerTurn<'a> {
    player: &'a mut Player,
    markets: &'a mut Markets,
    round: u32,
}

impl<'a> PlayerTurn<'a> {
    /// Open a turn for `player`.
    pub fn new(player: &'a mut Player, markets: &'a mut Markets, round: u32) -> Self {
        Self { player, markets, round }
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Current round (1-based).
    #[inline]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The acting player.
    #[inline]
    pub fn player(&self) -> &Player {
        self.player
    }

    /// The acting player's farm.
    #[inline]
    pub fn farm(&self) -> &Farm {
        self.player.farm()
    }

    /// The acting player's barn.
    #[inline]
    pub fn barn(&self) -> &Barn {
        self.player.barn()
    }

    /// Moves left this turn.
    #[inline]
    pub fn moves_left(&self) -> u32 {
        self.player.moves_left()
    }

    /// Changes from the player's previous farm update.
    #[inline]
    pub fn changes(&self) -> Changes {
        self.player.changes()
    }

    /// The shared vegetable market.
    #[inline]
    pub fn vegetable_market(&self) -> &VegetableMarket {
        &self.markets.vegetables
    }

    /// The shared acreage market.
    #[inline]
    pub fn acreage_market(&self) -> &AcreageMarket {
        &self.markets.acreages
    }

    /// Current prices in display order.
    pub fn market_table(&self) -> Vec<(Vegetable, u32)> {
        self.markets.vegetables.price_table()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Plant one `vegetable` from the barn at `position`.
    pub fn plant(&mut self, position: Position, vegetable: Vegetable) -> GameResult<()> {
        self.player.plant(position, vegetable)
    }

    /// Harvest `amount` vegetables at `position`.
    pub fn harvest(&mut self, position: Position, amount: u32) -> GameResult<(Vegetable, u32)> {
        self.player.harvest(position, amount)
    }

    /// Buy one `vegetable`.
    pub fn buy_vegetable(&mut self, vegetable: Vegetable) -> GameResult<(Vegetable, u32)> {
        self.player.buy_vegetable(vegetable, &self.markets.vegetables)
    }

    /// Buy land at `position`.
    pub fn buy_acreage(&mut self, position: Position) -> GameResult<(AcreageType, u32)> {
        self.player.buy_acreage(position, &mut self.markets.acreages)
    }

    /// Sell the requested quantities.
    pub fn sell(&mut self, quantities: &BTreeMap<Vegetable, u32>) -> GameResult<Vec<(Vegetable, u32)>> {
        self.player.sell(quantities, &mut self.markets.vegetables)
    }

    /// Sell everything in the barn.
    pub fn sell_all(&mut self) -> GameResult<Vec<(Vegetable, u32)>> {
        self.player.sell_all(&mut self.markets.vegetables)
    }

    /// Give up the remaining moves.
    pub fn end_turn(&mut self) {
        self.player.end_turn();
    }

    /// Leave the game.
    pub fn quit_game(&mut self) {
        self.player.quit_game();
    }
}

/// Decides a player's actions, one call per turn.
pub trait TurnDriver {
    /// Play one turn. Returning with moves left ends the turn.
    fn play_turn(&mut self, turn: &mut PlayerTurn<'_>);
}

impl<F> TurnDriver for F
where
    F: FnMut(&mut PlayerTurn<'_>),
{
    fn play_turn(&mut self, turn: &mut PlayerTurn<'_>) {
        self(turn)
    }
}
