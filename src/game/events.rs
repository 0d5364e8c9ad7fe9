//! Game Events
//!
//! Journal of everything that happened during a game, in order.

use serde::{Serialize, Deserialize};

use crate::core::position::Position;
use crate::game::acreage::AcreageType;
use crate::game::farm::Changes;
use crate::game::master::EndReason;
use crate::game::vegetable::Vegetable;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A vegetable was planted
    VegetablePlanted {
        position: Position,
        vegetable: Vegetable,
    },

    /// Vegetables were moved from an acreage into the barn
    VegetablesHarvested {
        position: Position,
        vegetable: Vegetable,
        amount: u32,
    },

    /// One vegetable was bought at the market
    VegetableBought {
        vegetable: Vegetable,
        price: u32,
    },

    /// Land was bought
    AcreageBought {
        position: Position,
        acreage_type: AcreageType,
        price: u32,
    },

    /// Vegetables were sold
    VegetablesSold {
        count: u32,
        revenue: u32,
    },

    /// The player's turn ended and their farm was updated
    TurnEnded {
        changes: Changes,
    },

    /// The player left the game
    PlayerQuit,

    /// The game is over
    GameEnded {
        reason: EndReason,
        winners: Vec<usize>,
    },
}

/// A game event stamped with round and acting player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Round the event happened in (1-based)
    pub round: u32,

    /// Seat index of the acting player, `None` for game-level events
    pub player: Option<usize>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(round: u32, player: Option<usize>, data: GameEventData) -> Self {
        Self { round, player, data }
    }

    /// Create a player event.
    pub fn by_player(round: u32, player: usize, data: GameEventData) -> Self {
        Self::new(round, Some(player), data)
    }

    /// Create game ended event.
    pub fn game_ended(round: u32, reason: EndReason, winners: Vec<usize>) -> Self {
        Self::new(round, None, GameEventData::GameEnded { reason, winners })
    }

    /// Is this a successful player action (one that cost a move)?
    pub fn is_action(&self) -> bool {
        matches!(
            self.data,
            GameEventData::VegetablePlanted { .. }
                | GameEventData::VegetablesHarvested { .. }
                | GameEventData::VegetableBought { .. }
                | GameEventData::AcreageBought { .. }
                | GameEventData::VegetablesSold { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = GameEvent::by_player(
            3,
            1,
            GameEventData::VegetableBought { vegetable: Vegetable::Salad, price: 4 },
        );
        assert_eq!(event.round, 3);
        assert_eq!(event.player, Some(1));
        assert!(event.is_action());

        let ended = GameEvent::game_ended(3, EndReason::Won, vec![1]);
        assert_eq!(ended.player, None);
        assert!(!ended.is_action());
    }

    #[test]
    fn test_turn_end_is_not_an_action() {
        let event = GameEvent::by_player(
            1,
            0,
            GameEventData::TurnEnded { changes: Changes::default() },
        );
        assert!(!event.is_action());
    }
}
