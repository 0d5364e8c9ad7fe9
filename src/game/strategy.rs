//! Reference turn driver.
//!
//! [`GreedyFarmer`] plays without lookahead. The first move of a turn goes
//! to the land (harvest what is full, plant what is empty), later moves go
//! to the market (sell the surplus, expand, buy seed). When the preferred
//! kind of action has nothing to do, the other kind is tried.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::core::position::Position;
use crate::game::acreage::AcreageType;
use crate::game::farm::Farm;
use crate::game::turn::{PlayerTurn, TurnDriver};
use crate::game::vegetable::Vegetable;
use crate::game::vegetable_market::VegetableMarket;

/// A single decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Harvest the whole acreage at the position
    Harvest(Position, u32),
    /// Plant from the barn
    Plant(Position, Vegetable),
    /// Sell these quantities
    Sell(BTreeMap<Vegetable, u32>),
    /// Buy land
    BuyAcreage(Position),
    /// Buy one vegetable
    BuyVegetable(Vegetable),
}

/// Greedy reference driver.
#[derive(Clone, Debug)]
pub struct GreedyFarmer {
    /// Land is bought only when gold covers this many times its price
    pub land_margin: u32,
}

impl Default for GreedyFarmer {
    fn default() -> Self {
        Self { land_margin: 2 }
    }
}

impl GreedyFarmer {
    /// Create a farmer with the default land margin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the next action, or `None` when nothing useful is left.
    pub fn next_action(&self, turn: &PlayerTurn<'_>, land_first: bool) -> Option<Action> {
        let farm = turn.farm();
        let market = turn.vegetable_market();

        let land = || harvest_candidate(farm).or_else(|| plant_candidate(farm, market));
        let trade = || {
            sale_candidate(farm, market)
                .or_else(|| self.acreage_candidate(turn))
                .or_else(|| seed_candidate(farm, market))
        };

        if land_first {
            land().or_else(trade)
        } else {
            trade().or_else(land)
        }
    }

    fn acreage_candidate(&self, turn: &PlayerTurn<'_>) -> Option<Action> {
        let acreages = turn.acreage_market();
        if !acreages.has_remaining() {
            return None;
        }
        let farm = turn.farm();
        let frontier: BTreeSet<Position> = farm
            .acreages()
            .keys()
            .flat_map(|p| [p.north(), p.east(), p.west()])
            .filter(|&p| farm.is_purchasable(p))
            .collect();

        let (position, price) = frontier
            .into_iter()
            .map(|p| (p, acreages.price_for(p)))
            .min_by_key(|&(_, price)| price)?;

        let affordable = farm.barn().gold() >= price.saturating_mul(self.land_margin);
        affordable.then_some(Action::BuyAcreage(position))
    }
}

impl TurnDriver for GreedyFarmer {
    fn play_turn(&mut self, turn: &mut PlayerTurn<'_>) {
        let mut land_first = true;
        while turn.moves_left() > 0 {
            let Some(action) = self.next_action(turn, land_first) else {
                break;
            };
            land_first = false;

            let result = match action.clone() {
                Action::Harvest(position, amount) => turn.harvest(position, amount).map(drop),
                Action::Plant(position, vegetable) => turn.plant(position, vegetable),
                Action::Sell(quantities) => turn.sell(&quantities).map(drop),
                Action::BuyAcreage(position) => turn.buy_acreage(position).map(drop),
                Action::BuyVegetable(vegetable) => turn.buy_vegetable(vegetable).map(drop),
            };
            if let Err(error) = result {
                debug!(?action, %error, "action rejected");
                break;
            }
        }
        turn.end_turn();
    }
}

// =============================================================================
// CANDIDATES
// =============================================================================

/// Most valuable species in `available` that grows on `acreage_type`.
fn best_species(
    acreage_type: AcreageType,
    available: &BTreeMap<Vegetable, u32>,
    market: &VegetableMarket,
) -> Option<Vegetable> {
    acreage_type
        .allowed()
        .iter()
        .copied()
        .filter(|v| available.get(v).is_some_and(|&n| n > 0))
        .max_by_key(|&v| market.price(v))
}

fn harvest_candidate(farm: &Farm) -> Option<Action> {
    farm.acreages()
        .iter()
        .find(|(_, a)| !a.is_empty() && a.is_full())
        .map(|(&p, a)| Action::Harvest(p, a.stock()))
}

fn plant_candidate(farm: &Farm, market: &VegetableMarket) -> Option<Action> {
    let stock = farm.barn().stock();
    farm.acreages()
        .iter()
        .filter(|(_, a)| a.is_empty())
        .find_map(|(&p, a)| best_species(a.acreage_type(), &stock, market).map(|v| Action::Plant(p, v)))
}

/// Everything in the barn except one seed per empty acreage.
fn sale_candidate(farm: &Farm, market: &VegetableMarket) -> Option<Action> {
    let mut surplus = farm.barn().stock();
    for acreage in farm.acreages().values().filter(|a| a.is_empty()) {
        if let Some(seed) = best_species(acreage.acreage_type(), &surplus, market) {
            if let Some(n) = surplus.get_mut(&seed) {
                *n -= 1;
            }
        }
    }
    surplus.retain(|_, n| *n > 0);
    (!surplus.is_empty()).then_some(Action::Sell(surplus))
}

/// Seed for the first empty acreage the barn cannot supply.
fn seed_candidate(farm: &Farm, market: &VegetableMarket) -> Option<Action> {
    let stock = farm.barn().stock();
    let gold = farm.barn().gold();
    farm.acreages()
        .values()
        .filter(|a| a.is_empty())
        .filter(|a| best_species(a.acreage_type(), &stock, market).is_none())
        .find_map(|a| {
            a.acreage_type()
                .allowed()
                .iter()
                .copied()
                .filter(|&v| market.price(v) <= gold)
                .max_by_key(|&v| market.price(v))
        })
        .map(Action::BuyVegetable)
}

// =============================================================================
// TESTS
// =============================================================================
