//! The barn: gold and harvested vegetables.
//!
//! Stored vegetables spoil [`SPOIL_TURNS`] turns after the barn last went
//! from empty to non-empty. Depositing into a non-empty barn does not reset
//! the clock.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::countdown::{Countdown, Timed};
use crate::game::error::{GameError, GameResult, IllegalMove};
use crate::game::vegetable::Vegetable;
use crate::game::vegetable_market::VegetableMarket;

/// Turns until stored vegetables spoil.
pub const SPOIL_TURNS: u32 = 6;

/// A player's barn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barn {
    gold: u32,
    stock: BTreeMap<Vegetable, u32>,
    countdown: Countdown,
}

impl Barn {
    /// Create an empty barn holding `gold`.
    pub fn new(gold: u32) -> Self {
        Self {
            gold,
            stock: BTreeMap::new(),
            countdown: Countdown::new(),
        }
    }

    /// Gold held.
    #[inline]
    pub fn gold(&self) -> u32 {
        self.gold
    }

    /// Units of `vegetable` held.
    #[inline]
    pub fn amount_of(&self, vegetable: Vegetable) -> u32 {
        self.stock.get(&vegetable).copied().unwrap_or(0)
    }

    /// Total units over all species.
    pub fn total_vegetables(&self) -> u32 {
        self.stock.values().sum()
    }

    /// Is anything stored?
    #[inline]
    pub fn has_vegetables(&self) -> bool {
        !self.stock.is_empty()
    }

    /// Non-zero stock, keyed by species.
    pub fn stock(&self) -> BTreeMap<Vegetable, u32> {
        self.stock.clone()
    }

    /// Non-zero stock ordered by amount, ties broken by plural name.
    pub fn entries(&self) -> Vec<(Vegetable, u32)> {
        let mut entries: Vec<(Vegetable, u32)> =
            self.stock.iter().map(|(&v, &n)| (v, n)).collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.plural().cmp(b.0.plural())));
        entries
    }

    /// Deposit `amount` units of `vegetable`.
    ///
    /// Arms the spoilage countdown if it is not running and the barn holds
    /// something afterwards.
    pub fn store(&mut self, vegetable: Vegetable, amount: u32) {
        if amount > 0 {
            *self.stock.entry(vegetable).or_insert(0) += amount;
        }
        if !self.countdown.is_armed() && self.has_vegetables() {
            self.countdown.arm(SPOIL_TURNS);
        }
    }

    /// Withdraw up to `amount` units of `vegetable`.
    ///
    /// Removing more than is held empties that species. An empty barn stops
    /// the spoilage countdown.
    pub fn remove(&mut self, vegetable: Vegetable, amount: u32) {
        if let Some(held) = self.stock.get_mut(&vegetable) {
            *held = held.saturating_sub(amount);
            if *held == 0 {
                self.stock.remove(&vegetable);
            }
        }
        if !self.has_vegetables() {
            self.countdown.disarm();
        }
    }

    /// Set the gold amount. Fails on a negative value.
    pub fn set_gold(&mut self, gold: i64) -> GameResult<()> {
        self.gold = u32::try_from(gold).map_err(|_| {
            GameError::illegal_argument("Cannot set the gold value to a negative value")
        })?;
        Ok(())
    }

    /// Add a signed delta to the gold amount. Fails if the result is negative.
    pub fn add_gold(&mut self, delta: i64) -> GameResult<()> {
        self.set_gold(i64::from(self.gold) + delta)
    }

    /// Pay `price` gold.
    pub(crate) fn spend(&mut self, price: u32) -> Result<(), IllegalMove> {
        self.gold = self.gold.checked_sub(price).ok_or(IllegalMove::NotEnoughGold)?;
        Ok(())
    }

    /// Buy one unit of `vegetable` at the current market price.
    pub fn buy_at_market(
        &mut self,
        vegetable: Vegetable,
        market: &VegetableMarket,
    ) -> Result<(Vegetable, u32), IllegalMove> {
        let price = market.price(vegetable);
        self.spend(price)?;
        self.store(vegetable, 1);
        debug!(vegetable = %vegetable, price, "vegetable bought");
        Ok((vegetable, price))
    }

    /// Sell the requested quantities.
    ///
    /// Nothing changes unless every species is held in the requested amount.
    /// Each unit sells at the price quoted before the call; the returned list
    /// holds one `(species, price)` entry per unit sold, in request order.
    pub fn sell_at_market(
        &mut self,
        quantities: &BTreeMap<Vegetable, u32>,
        market: &mut VegetableMarket,
    ) -> Result<Vec<(Vegetable, u32)>, IllegalMove> {
        if quantities.iter().any(|(&v, &n)| self.amount_of(v) < n) {
            return Err(IllegalMove::NotEnoughInBarn);
        }

        let mut sales = Vec::new();
        let mut revenue: u32 = 0;
        for (&vegetable, &amount) in quantities {
            let price = market.price(vegetable);
            sales.extend(std::iter::repeat((vegetable, price)).take(amount as usize));
            revenue = revenue.saturating_add(price.saturating_mul(amount));
        }

        for (&vegetable, &amount) in quantities {
            market.record_sale(vegetable, amount);
            self.remove(vegetable, amount);
        }
        self.gold = self.gold.saturating_add(revenue);

        debug!(units = sales.len(), revenue, "vegetables sold");
        Ok(sales)
    }
}

impl Timed for Barn {
    fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    fn countdown_mut(&mut self) -> &mut Countdown {
        &mut self.countdown
    }

    fn on_countdown(&mut self) {
        debug!(lost = self.total_vegetables(), "barn spoiled");
        self.stock.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stocked() -> Barn {
        let mut barn = Barn::new(10);
        for vegetable in Vegetable::ALL {
            barn.store(vegetable, 1);
        }
        barn
    }

    #[test]
    fn test_store_arms_once() {
        let mut barn = Barn::new(0);
        assert!(!barn.countdown().is_armed());

        barn.store(Vegetable::Carrot, 2);
        assert_eq!(barn.countdown().remaining(), Some(SPOIL_TURNS));

        barn.update();
        barn.store(Vegetable::Salad, 1);
        // Re-deposit keeps the remaining time
        assert_eq!(barn.countdown().remaining(), Some(SPOIL_TURNS - 1));
    }

    #[test]
    fn test_store_nothing_keeps_barn_idle() {
        let mut barn = Barn::new(0);
        barn.store(Vegetable::Tomato, 0);
        assert!(!barn.has_vegetables());
        assert!(!barn.countdown().is_armed());
    }

    #[test]
    fn test_remove_clamps_and_disarms() {
        let mut barn = Barn::new(0);
        barn.store(Vegetable::Carrot, 3);
        barn.remove(Vegetable::Carrot, 10);
        assert_eq!(barn.amount_of(Vegetable::Carrot), 0);
        assert!(!barn.countdown().is_armed());

        // Removing a species never held is harmless
        barn.remove(Vegetable::Mushroom, 1);
        assert_eq!(barn.total_vegetables(), 0);
    }

    #[test]
    fn test_spoilage_clears_stock_not_gold() {
        let mut barn = stocked();
        for _ in 0..SPOIL_TURNS - 1 {
            assert!(!barn.update());
        }
        assert!(barn.update());
        assert!(!barn.has_vegetables());
        assert_eq!(barn.gold(), 10);
        assert!(!barn.countdown().is_armed());
    }

    #[test]
    fn test_gold_adjustment() {
        let mut barn = Barn::new(5);
        barn.add_gold(7).unwrap();
        assert_eq!(barn.gold(), 12);

        let err = barn.add_gold(-13).unwrap_err();
        assert!(matches!(err, GameError::IllegalArgument(_)));
        assert_eq!(barn.gold(), 12);

        assert!(barn.set_gold(-1).is_err());
        barn.set_gold(0).unwrap();
        assert_eq!(barn.gold(), 0);
    }

    #[test]
    fn test_buy_at_market() {
        let market = VegetableMarket::default();
        let mut barn = Barn::new(16);

        assert_eq!(
            barn.buy_at_market(Vegetable::Mushroom, &market),
            Ok((Vegetable::Mushroom, 16))
        );
        assert_eq!(barn.gold(), 0);
        assert_eq!(barn.amount_of(Vegetable::Mushroom), 1);
        assert!(barn.countdown().is_armed());

        assert_eq!(
            barn.buy_at_market(Vegetable::Carrot, &market),
            Err(IllegalMove::NotEnoughGold)
        );
        assert_eq!(barn.amount_of(Vegetable::Carrot), 0);
    }

    #[test]
    fn test_sell_is_all_or_nothing() {
        let mut market = VegetableMarket::default();
        let mut barn = stocked();
        let before = barn.clone();

        let request = BTreeMap::from([(Vegetable::Carrot, 1), (Vegetable::Salad, 2)]);
        assert_eq!(
            barn.sell_at_market(&request, &mut market),
            Err(IllegalMove::NotEnoughInBarn)
        );
        assert_eq!(barn, before);
        assert_eq!(market, VegetableMarket::default());
    }

    #[test]
    fn test_sell_everything() {
        let mut market = VegetableMarket::default();
        let mut barn = stocked();
        barn.store(Vegetable::Carrot, 1);

        let sales = barn.sell_at_market(&barn.stock(), &mut market).unwrap();
        assert_eq!(
            sales,
            vec![
                (Vegetable::Carrot, 2),
                (Vegetable::Carrot, 2),
                (Vegetable::Salad, 4),
                (Vegetable::Tomato, 6),
                (Vegetable::Mushroom, 16),
            ]
        );
        assert_eq!(barn.gold(), 10 + 30);
        assert!(!barn.has_vegetables());
        assert!(!barn.countdown().is_armed());

        // Prices only move once the market adapts
        assert_eq!(market.price(Vegetable::Carrot), 2);
        market.adapt();
        assert_eq!(market.index_of(Vegetable::Carrot), 2);
    }

    #[test]
    fn test_entries_order() {
        let mut barn = Barn::new(0);
        barn.store(Vegetable::Tomato, 2);
        barn.store(Vegetable::Salad, 1);
        barn.store(Vegetable::Carrot, 2);
        barn.store(Vegetable::Mushroom, 1);

        assert_eq!(
            barn.entries(),
            vec![
                (Vegetable::Mushroom, 1),
                (Vegetable::Salad, 1),
                (Vegetable::Carrot, 2),
                (Vegetable::Tomato, 2),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_stock_never_underflows(
            ops in proptest::collection::vec((0usize..4, any::<bool>(), 0u32..6), 0..50),
        ) {
            let mut barn = Barn::new(0);
            for (index, deposit, amount) in ops {
                let vegetable = Vegetable::ALL[index];
                let held = barn.amount_of(vegetable);
                if deposit {
                    barn.store(vegetable, amount);
                    prop_assert_eq!(barn.amount_of(vegetable), held + amount);
                } else {
                    barn.remove(vegetable, amount);
                    prop_assert_eq!(barn.amount_of(vegetable), held.saturating_sub(amount));
                }
                prop_assert_eq!(barn.has_vegetables(), barn.countdown().is_armed());
            }
        }
    }
}
