//! Players and their move budget.
//!
//! A player is idle (no moves) outside its turn. The game master grants a
//! fixed budget at the start of the turn; each successful action spends one
//! move, a failed action spends nothing. Ending the turn or quitting drops
//! the remaining budget.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::core::countdown::Timed;
use crate::core::position::Position;
use crate::game::acreage::AcreageType;
use crate::game::acreage_market::AcreageMarket;
use crate::game::barn::Barn;
use crate::game::error::{GameError, GameResult};
use crate::game::events::GameEventData;
use crate::game::farm::{Changes, Farm};
use crate::game::vegetable::Vegetable;
use crate::game::vegetable_market::VegetableMarket;

/// A participant in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    farm: Farm,
    moves: u32,
    has_quit: bool,
    changes: Changes,
    #[serde(skip)]
    pending: Vec<GameEventData>,
}

/// Read-only summary of a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Display name
    pub name: String,
    /// Gold in the barn
    pub gold: u32,
    /// Barn stock, ordered for display
    pub barn: Vec<(Vegetable, u32)>,
    /// Turns until the barn spoils
    pub spoils_in: Option<u32>,
    /// Owned acreages
    pub acreages: Vec<(Position, AcreageType, Option<Vegetable>, u32)>,
    /// Result of the last farm update
    pub changes: Changes,
    /// Moves left in the current turn
    pub moves: u32,
    /// Has left the game
    pub has_quit: bool,
}

impl Player {
    /// Create a player with the standard starting farm.
    pub fn new(name: impl Into<String>, gold: u32) -> Self {
        Self {
            name: name.into(),
            farm: Farm::starting(gold),
            moves: 0,
            has_quit: false,
            changes: Changes::default(),
            pending: Vec::new(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gold in the barn.
    #[inline]
    pub fn gold(&self) -> u32 {
        self.farm.barn().gold()
    }

    /// The farm.
    #[inline]
    pub fn farm(&self) -> &Farm {
        &self.farm
    }

    /// The barn.
    #[inline]
    pub fn barn(&self) -> &Barn {
        self.farm.barn()
    }

    /// Moves left in the current turn.
    #[inline]
    pub fn moves_left(&self) -> u32 {
        self.moves
    }

    /// Can the player still act this turn?
    #[inline]
    pub fn has_moves_left(&self) -> bool {
        self.moves > 0
    }

    /// Has the player left the game?
    #[inline]
    pub fn has_quit(&self) -> bool {
        self.has_quit
    }

    /// Result of the last end-of-turn update.
    #[inline]
    pub fn changes(&self) -> Changes {
        self.changes
    }

    /// Independent copy of the player's visible state.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            name: self.name.clone(),
            gold: self.gold(),
            barn: self.barn().entries(),
            spoils_in: self.barn().countdown().remaining(),
            acreages: self
                .farm
                .acreages()
                .iter()
                .map(|(&p, a)| (p, a.acreage_type(), a.vegetable(), a.stock()))
                .collect(),
            changes: self.changes,
            moves: self.moves,
            has_quit: self.has_quit,
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Plant one `vegetable` from the barn at `position`.
    pub fn plant(&mut self, position: Position, vegetable: Vegetable) -> GameResult<()> {
        self.require_move()?;
        self.farm.plant_on_acreage(position, vegetable)?;
        debug!(player = %self.name, %position, %vegetable, "planted");
        self.spend_move(GameEventData::VegetablePlanted { position, vegetable });
        Ok(())
    }

    /// Harvest `amount` vegetables at `position`.
    pub fn harvest(&mut self, position: Position, amount: u32) -> GameResult<(Vegetable, u32)> {
        self.require_move()?;
        let (vegetable, amount) = self.farm.harvest_acreage(position, amount)?;
        debug!(player = %self.name, %position, %vegetable, amount, "harvested");
        self.spend_move(GameEventData::VegetablesHarvested { position, vegetable, amount });
        Ok((vegetable, amount))
    }

    /// Buy one `vegetable` at the market.
    pub fn buy_vegetable(
        &mut self,
        vegetable: Vegetable,
        market: &VegetableMarket,
    ) -> GameResult<(Vegetable, u32)> {
        self.require_move()?;
        let (vegetable, price) = self.farm.buy_vegetable(vegetable, market)?;
        self.spend_move(GameEventData::VegetableBought { vegetable, price });
        Ok((vegetable, price))
    }

    /// Buy the next acreage from the market and place it at `position`.
    pub fn buy_acreage(
        &mut self,
        position: Position,
        market: &mut AcreageMarket,
    ) -> GameResult<(AcreageType, u32)> {
        self.require_move()?;
        let (acreage_type, price) = self.farm.buy_acreage(position, market)?;
        debug!(player = %self.name, %position, acreage = %acreage_type, price, "acreage bought");
        self.spend_move(GameEventData::AcreageBought { position, acreage_type, price });
        Ok((acreage_type, price))
    }

    /// Sell the requested quantities.
    pub fn sell(
        &mut self,
        quantities: &BTreeMap<Vegetable, u32>,
        market: &mut VegetableMarket,
    ) -> GameResult<Vec<(Vegetable, u32)>> {
        self.require_move()?;
        let sales = self.farm.sell(quantities, market)?;
        self.record_sales(&sales);
        Ok(sales)
    }

    /// Sell everything in the barn.
    pub fn sell_all(&mut self, market: &mut VegetableMarket) -> GameResult<Vec<(Vegetable, u32)>> {
        self.require_move()?;
        let sales = self.farm.sell_all(market)?;
        self.record_sales(&sales);
        Ok(sales)
    }

    /// Give up the remaining moves of this turn.
    pub fn end_turn(&mut self) {
        self.moves = 0;
    }

    /// Leave the game. Ends the game for everyone.
    pub fn quit_game(&mut self) {
        self.end_turn();
        if !self.has_quit {
            info!(player = %self.name, "player quit");
            self.has_quit = true;
            self.pending.push(GameEventData::PlayerQuit);
        }
    }

    // =========================================================================
    // Turn protocol
    // =========================================================================

    /// Grant a fresh move budget.
    pub(crate) fn allow_moves(&mut self, moves: u32) {
        self.moves = moves;
    }

    /// End-of-turn update: tick the farm, then let the market adapt.
    pub(crate) fn update(&mut self, market: &mut VegetableMarket) -> Changes {
        self.changes = self.farm.update();
        market.adapt();
        self.pending.push(GameEventData::TurnEnded { changes: self.changes });
        self.changes
    }

    /// Drain events produced since the last call.
    pub(crate) fn take_events(&mut self) -> Vec<GameEventData> {
        std::mem::take(&mut self.pending)
    }

    fn require_move(&self) -> GameResult<()> {
        if self.moves == 0 {
            return Err(GameError::NoMovesLeft);
        }
        Ok(())
    }

    fn spend_move(&mut self, event: GameEventData) {
        self.moves -= 1;
        self.pending.push(event);
    }

    fn record_sales(&mut self, sales: &[(Vegetable, u32)]) {
        let count = sales.len() as u32;
        let revenue: u32 = sales.iter().map(|&(_, price)| price).sum();
        debug!(player = %self.name, count, revenue, "sold");
        self.spend_move(GameEventData::VegetablesSold { count, revenue });
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::error::IllegalMove;

    fn active(gold: u32) -> Player {
        let mut player = Player::new("Alice", gold);
        player.allow_moves(2);
        player
    }

    #[test]
    fn test_new_player_is_idle() {
        let mut player = Player::new("Alice", 5);
        assert_eq!(player.moves_left(), 0);
        assert_eq!(player.gold(), 5);
        assert_eq!(
            player.plant(Position::new(-1, 0), Vegetable::Carrot),
            Err(GameError::NoMovesLeft)
        );
    }

    #[test]
    fn test_every_action_needs_a_move() {
        let mut market = VegetableMarket::default();
        let mut acreages = AcreageMarket::new(3, 1);
        let mut player = Player::new("Alice", 100);
        let before = player.clone();
        let pool = acreages.remaining();

        assert_eq!(player.harvest(Position::new(-1, 0), 1), Err(GameError::NoMovesLeft));
        assert_eq!(
            player.buy_vegetable(Vegetable::Carrot, &market),
            Err(GameError::NoMovesLeft)
        );
        assert_eq!(
            player.buy_acreage(Position::new(0, 2), &mut acreages),
            Err(GameError::NoMovesLeft)
        );
        let request = BTreeMap::from([(Vegetable::Mushroom, 1)]);
        assert_eq!(player.sell(&request, &mut market), Err(GameError::NoMovesLeft));
        assert_eq!(player.sell_all(&mut market), Err(GameError::NoMovesLeft));

        assert_eq!(player, before);
        assert_eq!(acreages.remaining(), pool);
        assert_eq!(market.sold(Vegetable::Mushroom), 0);
    }

    #[test]
    fn test_success_costs_one_move() {
        let mut player = active(0);
        player.plant(Position::new(-1, 0), Vegetable::Carrot).unwrap();
        assert_eq!(player.moves_left(), 1);
        player.plant(Position::new(1, 0), Vegetable::Salad).unwrap();
        assert!(!player.has_moves_left());

        assert_eq!(
            player.plant(Position::new(0, 1), Vegetable::Tomato),
            Err(GameError::NoMovesLeft)
        );
    }

    #[test]
    fn test_failure_costs_nothing() {
        let mut player = active(0);
        let before = player.clone();
        assert_eq!(
            player.plant(Position::new(0, 1), Vegetable::Mushroom),
            Err(GameError::IllegalMove(IllegalMove::VegetableNotSuitable))
        );
        assert_eq!(player, before);
        assert!(player.take_events().is_empty());
    }

    #[test]
    fn test_sell_all_events() {
        let mut market = VegetableMarket::default();
        let mut player = active(0);
        let sales = player.sell_all(&mut market).unwrap();
        assert_eq!(sales.len(), 4);
        assert_eq!(player.gold(), 28);
        assert_eq!(
            player.take_events(),
            vec![GameEventData::VegetablesSold { count: 4, revenue: 28 }]
        );
        assert!(player.take_events().is_empty());
    }

    #[test]
    fn test_sell_specific() {
        let mut market = VegetableMarket::default();
        let mut player = active(0);
        let request = BTreeMap::from([(Vegetable::Mushroom, 1)]);
        assert_eq!(player.sell(&request, &mut market), Ok(vec![(Vegetable::Mushroom, 16)]));
        assert_eq!(
            player.sell(&request, &mut market),
            Err(GameError::IllegalMove(IllegalMove::NotEnoughInBarn))
        );
        assert_eq!(player.moves_left(), 1);
    }

    #[test]
    fn test_buy_vegetable_and_acreage() {
        let market = VegetableMarket::default();
        let mut acreages = AcreageMarket::new(3, 1);
        let mut player = active(20);

        assert_eq!(player.buy_vegetable(Vegetable::Tomato, &market), Ok((Vegetable::Tomato, 6)));
        let (_, price) = player.buy_acreage(Position::new(-1, 1), &mut acreages).unwrap();
        assert_eq!(price, 10);
        assert_eq!(player.gold(), 4);
        assert!(player.farm().acreage_at(Position::new(-1, 1)).is_some());
    }

    #[test]
    fn test_end_turn_and_quit() {
        let mut player = active(0);
        player.end_turn();
        assert!(!player.has_moves_left());
        assert!(!player.has_quit());

        player.allow_moves(2);
        player.quit_game();
        assert!(player.has_quit());
        assert_eq!(player.moves_left(), 0);
        assert_eq!(player.take_events(), vec![GameEventData::PlayerQuit]);
    }

    #[test]
    fn test_update_adapts_market() {
        let mut market = VegetableMarket::default();
        let mut player = active(0);
        let request = BTreeMap::from([(Vegetable::Salad, 1)]);
        player.sell(&request, &mut market).unwrap();
        player.harvest(Position::new(-1, 0), 1).unwrap_err();

        let changes = player.update(&mut market);
        assert_eq!(changes, Changes::default());
        assert_eq!(market.sold(Vegetable::Salad), 0);
        assert_eq!(player.changes(), changes);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut player = active(0);
        let snapshot = player.snapshot();
        player.plant(Position::new(-1, 0), Vegetable::Carrot).unwrap();

        assert_eq!(snapshot.barn.len(), 4);
        assert_eq!(snapshot.moves, 2);
        assert_eq!(player.snapshot().barn.len(), 3);
        assert_eq!(snapshot.spoils_in, Some(6));
    }
}
