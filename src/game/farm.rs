//! A player's farm: the barn at the origin plus owned acreages.
//!
//! ```text
//!        y
//!        ^
//!    1   |      [Fi]
//!    0   | [G]  [B]  [G]
//!        +-----------------> x
//!          -1    0    1
//! ```
//!
//! Land can only be extended north, east, or west of existing acreages,
//! never below the barn row.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::core::countdown::Timed;
use crate::core::position::Position;
use crate::game::acreage::{Acreage, AcreageType};
use crate::game::acreage_market::AcreageMarket;
use crate::game::barn::Barn;
use crate::game::error::IllegalMove;
use crate::game::vegetable::Vegetable;
use crate::game::vegetable_market::VegetableMarket;

/// Acreages every farm starts with.
pub const STARTING_ACREAGES: [(Position, AcreageType); 3] = [
    (Position::new(-1, 0), AcreageType::Garden),
    (Position::new(1, 0), AcreageType::Garden),
    (Position::new(0, 1), AcreageType::Field),
];

/// Vegetables consumed from the barn by one planting.
const PLANT_COST: u32 = 1;

/// What happened to a farm during its end-of-turn update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    /// Stored vegetables spoiled this update
    pub barn_spoiled: bool,
    /// Vegetables added on acreages by growth
    pub newly_grown: u32,
}

/// Snapshot of whatever occupies a farm position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    /// The barn at the origin
    Barn(Barn),
    /// An owned acreage
    Acreage(Acreage),
}

/// A player's farm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farm {
    barn: Barn,
    acreages: BTreeMap<Position, Acreage>,
}

impl Farm {
    /// Build a farm from explicit parts.
    pub fn new(barn: Barn, acreages: BTreeMap<Position, Acreage>) -> Self {
        Self { barn, acreages }
    }

    /// The standard starting farm: three acreages and a barn holding one of
    /// every vegetable plus `gold`.
    pub fn starting(gold: u32) -> Self {
        let mut barn = Barn::new(gold);
        for vegetable in Vegetable::ALL {
            barn.store(vegetable, 1);
        }
        let acreages = STARTING_ACREAGES
            .iter()
            .map(|&(position, acreage_type)| (position, Acreage::new(acreage_type)))
            .collect();
        Self::new(barn, acreages)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The barn.
    #[inline]
    pub fn barn(&self) -> &Barn {
        &self.barn
    }

    /// Owned acreages by position.
    #[inline]
    pub fn acreages(&self) -> &BTreeMap<Position, Acreage> {
        &self.acreages
    }

    /// The acreage at `position`, if owned.
    #[inline]
    pub fn acreage_at(&self, position: Position) -> Option<&Acreage> {
        self.acreages.get(&position)
    }

    /// Is anything at `position`?
    pub fn is_tile(&self, position: Position) -> bool {
        position.is_origin() || self.acreages.contains_key(&position)
    }

    /// Snapshot of the tile at `position`.
    pub fn tile_at(&self, position: Position) -> Option<Tile> {
        if position.is_origin() {
            return Some(Tile::Barn(self.barn.clone()));
        }
        self.acreages.get(&position).cloned().map(Tile::Acreage)
    }

    /// Vegetables currently growing on all acreages.
    pub fn growing_vegetables(&self) -> u32 {
        self.acreages.values().map(Acreage::stock).sum()
    }

    /// Lowest x and lowest y over the barn and all acreages.
    pub fn south_west_corner(&self) -> Position {
        self.acreages.keys().fold(Position::ORIGIN, |corner, p| {
            Position::new(corner.x.min(p.x), corner.y.min(p.y))
        })
    }

    /// Highest x and highest y over the barn and all acreages.
    pub fn north_east_corner(&self) -> Position {
        self.acreages.keys().fold(Position::ORIGIN, |corner, p| {
            Position::new(corner.x.max(p.x), corner.y.max(p.y))
        })
    }

    /// Can land be bought at `position`?
    ///
    /// The position must be free, on or above the barn row, not the barn
    /// itself, and adjacent to an owned acreage to its south, west, or east.
    pub fn is_purchasable(&self, position: Position) -> bool {
        if self.acreages.contains_key(&position) || position.y < 0 || position.is_origin() {
            return false;
        }
        [position.south(), position.west(), position.east()]
            .iter()
            .any(|neighbor| self.acreages.contains_key(neighbor))
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Buy the next acreage from the market and place it at `position`.
    pub fn buy_acreage(
        &mut self,
        position: Position,
        market: &mut AcreageMarket,
    ) -> Result<(AcreageType, u32), IllegalMove> {
        if !self.is_purchasable(position) {
            return Err(IllegalMove::NotPurchasable);
        }
        if !market.has_remaining() {
            return Err(IllegalMove::NoAcreagesLeft);
        }
        let price = market.price_for(position);
        if self.barn.gold() < price {
            return Err(IllegalMove::NotEnoughGold);
        }

        let acreage = market.take_next()?;
        let acreage_type = acreage.acreage_type();
        self.barn.spend(price)?;
        self.acreages.insert(position, acreage);
        Ok((acreage_type, price))
    }

    /// Plant one unit of `vegetable` from the barn at `position`.
    pub fn plant_on_acreage(
        &mut self,
        position: Position,
        vegetable: Vegetable,
    ) -> Result<(), IllegalMove> {
        let acreage = self
            .acreages
            .get_mut(&position)
            .ok_or(IllegalMove::NoAcreageAtPosition)?;
        if self.barn.amount_of(vegetable) < PLANT_COST {
            return Err(IllegalMove::NotEnoughToPlant);
        }
        acreage.plant(vegetable)?;
        self.barn.remove(vegetable, PLANT_COST);
        Ok(())
    }

    /// Harvest `amount` units at `position` into the barn.
    pub fn harvest_acreage(
        &mut self,
        position: Position,
        amount: u32,
    ) -> Result<(Vegetable, u32), IllegalMove> {
        let acreage = self
            .acreages
            .get_mut(&position)
            .ok_or(IllegalMove::NoAcreageAtPosition)?;
        let (vegetable, harvested) = acreage.harvest(amount)?;
        self.barn.store(vegetable, harvested);
        Ok((vegetable, harvested))
    }

    /// Buy one vegetable into the barn.
    pub fn buy_vegetable(
        &mut self,
        vegetable: Vegetable,
        market: &VegetableMarket,
    ) -> Result<(Vegetable, u32), IllegalMove> {
        self.barn.buy_at_market(vegetable, market)
    }

    /// Sell the requested quantities from the barn.
    pub fn sell(
        &mut self,
        quantities: &BTreeMap<Vegetable, u32>,
        market: &mut VegetableMarket,
    ) -> Result<Vec<(Vegetable, u32)>, IllegalMove> {
        self.barn.sell_at_market(quantities, market)
    }

    /// Sell everything in the barn.
    pub fn sell_all(
        &mut self,
        market: &mut VegetableMarket,
    ) -> Result<Vec<(Vegetable, u32)>, IllegalMove> {
        let everything = self.barn.stock();
        self.barn.sell_at_market(&everything, market)
    }

    /// End-of-turn update: spoil the barn first, then grow every acreage.
    pub fn update(&mut self) -> Changes {
        let barn_spoiled = self.barn.update();

        let before = self.growing_vegetables();
        for acreage in self.acreages.values_mut() {
            acreage.update();
        }
        let newly_grown = self.growing_vegetables().saturating_sub(before);

        Changes { barn_spoiled, newly_grown }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_farm() {
        let farm = Farm::starting(20);
        assert_eq!(farm.barn().gold(), 20);
        assert_eq!(farm.barn().total_vegetables(), 4);
        assert_eq!(farm.acreages().len(), 3);
        assert!(matches!(farm.tile_at(Position::ORIGIN), Some(Tile::Barn(_))));
        assert!(matches!(farm.tile_at(Position::new(0, 1)), Some(Tile::Acreage(_))));
        assert_eq!(farm.tile_at(Position::new(0, 2)), None);
        assert!(farm.is_tile(Position::ORIGIN));
        assert!(farm.is_tile(Position::new(-1, 0)));
        assert!(!farm.is_tile(Position::new(0, 2)));
    }

    #[test]
    fn test_corners() {
        let farm = Farm::starting(0);
        assert_eq!(farm.south_west_corner(), Position::new(-1, 0));
        assert_eq!(farm.north_east_corner(), Position::new(1, 1));

        let farm = Farm::new(Barn::new(0), BTreeMap::new());
        assert_eq!(farm.south_west_corner(), Position::ORIGIN);
        assert_eq!(farm.north_east_corner(), Position::ORIGIN);
    }

    #[test]
    fn test_is_purchasable() {
        let farm = Farm::starting(0);
        assert!(!farm.is_purchasable(Position::ORIGIN));
        assert!(!farm.is_purchasable(Position::new(0, 1)));
        assert!(!farm.is_purchasable(Position::new(-1, -1)));
        assert!(farm.is_purchasable(Position::new(-1, 1)));
        assert!(farm.is_purchasable(Position::new(0, 2)));
        assert!(farm.is_purchasable(Position::new(2, 0)));
        assert!(!farm.is_purchasable(Position::new(3, 0)));
    }

    #[test]
    fn test_land_never_grows_south() {
        let mut acreages = BTreeMap::new();
        acreages.insert(Position::new(0, 3), Acreage::new(AcreageType::Field));
        let farm = Farm::new(Barn::new(0), acreages);

        assert!(!farm.is_purchasable(Position::new(0, 2)));
        assert!(farm.is_purchasable(Position::new(0, 4)));
        assert!(farm.is_purchasable(Position::new(1, 3)));
        assert!(farm.is_purchasable(Position::new(-1, 3)));
    }

    #[test]
    fn test_buy_acreage() {
        let mut market = AcreageMarket::new(1, 1);
        let mut farm = Farm::starting(10);
        let next = market.peek().unwrap();

        assert_eq!(
            farm.buy_acreage(Position::new(1, 1), &mut market),
            Ok((next, 10))
        );
        assert_eq!(farm.barn().gold(), 0);
        assert_eq!(farm.acreage_at(Position::new(1, 1)).map(Acreage::acreage_type), Some(next));

        let remaining = market.remaining();
        assert_eq!(
            farm.buy_acreage(Position::new(2, 0), &mut market),
            Err(IllegalMove::NotEnoughGold)
        );
        assert_eq!(market.remaining(), remaining);
        assert_eq!(
            farm.buy_acreage(Position::new(5, 5), &mut market),
            Err(IllegalMove::NotPurchasable)
        );
    }

    #[test]
    fn test_buy_acreage_exhausted() {
        let mut market = AcreageMarket::new(1, 0);
        let mut farm = Farm::starting(100);
        assert_eq!(
            farm.buy_acreage(Position::new(0, 2), &mut market),
            Err(IllegalMove::NoAcreagesLeft)
        );
        assert_eq!(farm.barn().gold(), 100);
    }

    #[test]
    fn test_plant_consumes_barn_stock() {
        let mut farm = Farm::starting(0);
        farm.plant_on_acreage(Position::new(-1, 0), Vegetable::Mushroom).unwrap();
        assert_eq!(farm.barn().amount_of(Vegetable::Mushroom), 0);

        assert_eq!(
            farm.plant_on_acreage(Position::new(1, 0), Vegetable::Mushroom),
            Err(IllegalMove::NotEnoughToPlant)
        );
        assert_eq!(
            farm.plant_on_acreage(Position::new(0, 2), Vegetable::Carrot),
            Err(IllegalMove::NoAcreageAtPosition)
        );
        farm.plant_on_acreage(Position::new(0, 1), Vegetable::Carrot).unwrap();
        assert_eq!(farm.barn().amount_of(Vegetable::Carrot), 0);
        assert_eq!(farm.barn().total_vegetables(), 2);
    }

    #[test]
    fn test_failed_plant_keeps_barn() {
        let mut farm = Farm::starting(0);
        let before = farm.clone();
        assert_eq!(
            farm.plant_on_acreage(Position::new(0, 1), Vegetable::Mushroom),
            Err(IllegalMove::VegetableNotSuitable)
        );
        assert_eq!(farm, before);
    }

    #[test]
    fn test_harvest_into_barn() {
        let mut farm = Farm::starting(0);
        farm.plant_on_acreage(Position::new(1, 0), Vegetable::Carrot).unwrap();
        let changes = farm.update();
        assert_eq!(changes, Changes { barn_spoiled: false, newly_grown: 1 });

        assert_eq!(
            farm.harvest_acreage(Position::new(1, 0), 2),
            Ok((Vegetable::Carrot, 2))
        );
        assert_eq!(farm.barn().amount_of(Vegetable::Carrot), 2);
        assert_eq!(
            farm.harvest_acreage(Position::ORIGIN, 1),
            Err(IllegalMove::NoAcreageAtPosition)
        );
    }

    #[test]
    fn test_update_reports_spoilage() {
        let mut farm = Farm::starting(0);
        for _ in 0..5 {
            assert!(!farm.update().barn_spoiled);
        }
        assert!(farm.update().barn_spoiled);
        assert_eq!(farm.barn().total_vegetables(), 0);
    }
}
