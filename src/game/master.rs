//! Game Master
//!
//! Owns the players and the shared markets and runs the round loop:
//!
//! ```text
//! round r:
//!   for each player in seating order:
//!     grant MOVES_PER_TURN moves
//!     driver plays the turn
//!     quit?  -> game over, nobody else moves
//!     update the player's farm, adapt the market
//!   anyone at or above the win threshold? -> game over
//! ```
//!
//! The loop is fully deterministic: given the same configuration and a
//! deterministic driver, two games end with the same state hash.

use serde::{Serialize, Deserialize};
use tracing::{info, info_span, warn};

use crate::core::countdown::Timed;
use crate::core::hash::{compute_state_hash, StateHash, StateHasher};
use crate::game::acreage_market::AcreageMarket;
use crate::game::error::{GameError, GameResult};
use crate::game::events::GameEvent;
use crate::game::player::Player;
use crate::game::turn::{Markets, PlayerTurn, TurnDriver};
use crate::game::vegetable::Vegetable;
use crate::game::vegetable_market::{MarketConfig, VegetableMarket};
use crate::MOVES_PER_TURN;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Everything needed to set up a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the acreage shuffle
    pub seed: i64,
    /// Gold needed to win
    pub win_gold: u32,
    /// Gold every player starts with
    pub start_gold: u32,
    /// Player names in seating order
    pub players: Vec<String>,
    /// Stop after this many full rounds
    pub round_limit: Option<u32>,
    /// Vegetable price table
    pub market: MarketConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            win_gold: 100,
            start_gold: 10,
            players: vec!["Alice".to_string(), "Bob".to_string()],
            round_limit: None,
            market: MarketConfig::default(),
        }
    }
}

impl GameConfig {
    /// Configuration with the standard market and no round limit.
    pub fn new<I, S>(seed: i64, win_gold: u32, start_gold: u32, players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seed,
            win_gold,
            start_gold,
            players: players.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Check the configuration before a game is built from it.
    pub fn validate(&self) -> GameResult<()> {
        if self.players.is_empty() {
            return Err(GameError::illegal_argument("A game needs at least one player"));
        }
        if let Some(name) = self
            .players
            .iter()
            .find(|name| name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()))
        {
            return Err(GameError::illegal_argument(format!(
                "Player names may only contain letters: {name:?}"
            )));
        }
        if self.win_gold == 0 {
            return Err(GameError::illegal_argument("The gold needed to win must be at least 1"));
        }
        if self.round_limit == Some(0) {
            return Err(GameError::illegal_argument("The round limit must be at least 1"));
        }
        self.market.validate()
    }
}

// =============================================================================
// RESULT
// =============================================================================

/// Why the game stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// A player quit
    Quit,
    /// Someone reached the win threshold
    Won,
    /// The configured round limit was reached
    RoundLimit,
}

/// Final standing of one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// Display name
    pub name: String,
    /// Final gold
    pub gold: u32,
}

/// Result of a finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Every player in seating order
    pub standings: Vec<Standing>,
    /// Seat indices of the winners, in seating order
    pub winners: Vec<usize>,
    /// Rounds started, including an interrupted one
    pub rounds: u32,
    /// Why the game stopped
    pub reason: EndReason,
}

impl GameOutcome {
    /// Names of the winners.
    pub fn winner_names(&self) -> Vec<&str> {
        self.winners
            .iter()
            .filter_map(|&i| self.standings.get(i))
            .map(|s| s.name.as_str())
            .collect()
    }

    /// End-of-game message: one gold line per player, then the winners.
    pub fn describe(&self) -> String {
        let mut lines: Vec<String> = self
            .standings
            .iter()
            .enumerate()
            .map(|(i, s)| format!("Player {} ({}): {}", i + 1, s.name, s.gold))
            .collect();

        let names = self.winner_names();
        let announcement = match names.as_slice() {
            [] => String::new(),
            [single] => format!("{single} has won!"),
            [rest @ .., last] => format!("{} and {last} have won!", rest.join(", ")),
        };
        lines.push(announcement);
        lines.join("\n")
    }
}

/// Players whose gold reaches the best score, where the best score is
/// capped at the win threshold.
pub fn winners(golds: &[u32], win_gold: u32) -> Vec<usize> {
    let bar = golds.iter().copied().max().unwrap_or(0).min(win_gold);
    golds
        .iter()
        .enumerate()
        .filter(|&(_, &gold)| gold >= bar)
        .map(|(i, _)| i)
        .collect()
}

// =============================================================================
// GAME MASTER
// =============================================================================

/// Runs a game from setup to result.
#[derive(Debug)]
pub struct GameMaster {
    config: GameConfig,
    players: Vec<Player>,
    markets: Markets,
    round: u32,
    events: Vec<GameEvent>,
    outcome: Option<GameOutcome>,
}

impl GameMaster {
    /// Set up a game. Every player starts idle.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        config.validate()?;

        let markets = Markets {
            vegetables: VegetableMarket::new(config.market.clone())?,
            acreages: AcreageMarket::new(config.seed, config.players.len()),
        };
        let players = config
            .players
            .iter()
            .map(|name| Player::new(name.clone(), config.start_gold))
            .collect();

        info!(
            seed = config.seed,
            players = config.players.len(),
            win_gold = config.win_gold,
            "game created"
        );

        Ok(Self {
            config,
            players,
            markets,
            round: 0,
            events: Vec::new(),
            outcome: None,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The configuration the game was built from.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Players in seating order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The shared markets.
    pub fn markets(&self) -> &Markets {
        &self.markets
    }

    /// Current round (0 before the game starts).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Event journal.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Result, once the game has finished.
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// Has any player reached the win threshold?
    pub fn has_someone_won(&self) -> bool {
        self.players.iter().any(|p| p.gold() >= self.config.win_gold)
    }

    // =========================================================================
    // Round loop
    // =========================================================================

    /// Play until someone wins, someone quits, or the round limit is hit.
    ///
    /// Calling `play` on a finished game returns the stored result.
    pub fn play<D: TurnDriver + ?Sized>(&mut self, driver: &mut D) -> GameOutcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let reason = loop {
            self.round += 1;
            info!(round = self.round, "round started");

            if self.play_round(driver) {
                break EndReason::Quit;
            }
            if self.has_someone_won() {
                break EndReason::Won;
            }
            if self.config.round_limit.is_some_and(|limit| self.round >= limit) {
                break EndReason::RoundLimit;
            }
        };

        self.finish(reason)
    }

    /// Play one round. Returns `true` if a player quit.
    fn play_round<D: TurnDriver + ?Sized>(&mut self, driver: &mut D) -> bool {
        let round = self.round;
        for index in 0..self.players.len() {
            let span = info_span!("turn", round, player = %self.players[index].name());
            let _enter = span.enter();

            self.players[index].allow_moves(MOVES_PER_TURN);
            {
                let mut turn = PlayerTurn::new(&mut self.players[index], &mut self.markets, round);
                driver.play_turn(&mut turn);
            }

            let player = &mut self.players[index];
            if player.has_quit() {
                self.collect_events(index);
                return true;
            }
            if player.has_moves_left() {
                warn!(moves = player.moves_left(), "driver returned with moves left");
                player.end_turn();
            }
            player.update(&mut self.markets.vegetables);
            self.collect_events(index);
        }
        false
    }

    fn collect_events(&mut self, index: usize) {
        let round = self.round;
        let drained = self.players[index].take_events();
        self.events
            .extend(drained.into_iter().map(|data| GameEvent::by_player(round, index, data)));
    }

    fn finish(&mut self, reason: EndReason) -> GameOutcome {
        let golds: Vec<u32> = self.players.iter().map(Player::gold).collect();
        let outcome = GameOutcome {
            standings: self
                .players
                .iter()
                .map(|p| Standing { name: p.name().to_string(), gold: p.gold() })
                .collect(),
            winners: winners(&golds, self.config.win_gold),
            rounds: self.round,
            reason,
        };

        info!(
            rounds = self.round,
            ?reason,
            winners = ?outcome.winner_names(),
            "game ended"
        );
        self.events
            .push(GameEvent::game_ended(self.round, reason, outcome.winners.clone()));
        self.outcome = Some(outcome.clone());
        outcome
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Hash of every player, farm, barn, and market.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.round, self.config.seed, |h| {
            h.update_u32(self.players.len() as u32);
            for player in &self.players {
                hash_player(h, player);
            }
            hash_markets(h, &self.markets);
        })
    }
}

fn hash_player(h: &mut StateHasher, player: &Player) {
    h.update_str(player.name());
    h.update_u32(player.moves_left());
    h.update_bool(player.has_quit());

    let barn = player.barn();
    h.update_u32(barn.gold());
    for vegetable in Vegetable::ALL {
        h.update_u32(barn.amount_of(vegetable));
    }
    h.update_countdown(barn.countdown());

    let acreages = player.farm().acreages();
    h.update_u32(acreages.len() as u32);
    for (&position, acreage) in acreages {
        h.update_position(position);
        h.update_u8(acreage.acreage_type() as u8);
        match acreage.vegetable() {
            Some(vegetable) => h.update_u8(vegetable as u8 + 1),
            None => h.update_u8(0),
        }
        h.update_u32(acreage.stock());
        h.update_countdown(acreage.countdown());
    }
}

fn hash_markets(h: &mut StateHasher, markets: &Markets) {
    for vegetable in Vegetable::ALL {
        h.update_u32(markets.vegetables.index_of(vegetable) as u32);
        h.update_u32(markets.vegetables.sold(vegetable));
    }
    let upcoming = markets.acreages.upcoming();
    h.update_u32(upcoming.len() as u32);
    for &acreage_type in upcoming {
        h.update_u8(acreage_type as u8);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::GameEventData;
    use crate::game::farm::Changes;

    fn game(names: &[&str]) -> GameMaster {
        GameMaster::new(GameConfig::new(1, 100, 10, names.iter().copied())).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(GameConfig::default().validate().is_ok());
        assert!(GameConfig::new(1, 100, 10, Vec::<String>::new()).validate().is_err());
        assert!(GameConfig::new(1, 0, 10, ["A"]).validate().is_err());
        assert!(GameConfig::new(1, 10, 10, ["A1"]).validate().is_err());
        assert!(GameConfig::new(1, 10, 10, [""]).validate().is_err());

        let config = GameConfig { round_limit: Some(0), ..GameConfig::default() };
        assert!(GameMaster::new(config).is_err());
    }

    #[test]
    fn test_config_json_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"seed": -4, "players": ["Ann"]}"#).unwrap();
        assert_eq!(config.seed, -4);
        assert_eq!(config.players, vec!["Ann".to_string()]);
        assert_eq!(config.win_gold, 100);
        assert_eq!(config.market, MarketConfig::default());
    }

    #[test]
    fn test_players_start_idle() {
        let master = game(&["A", "B"]);
        assert_eq!(master.round(), 0);
        assert!(master.players().iter().all(|p| p.moves_left() == 0));
        assert_eq!(master.markets().acreages.remaining(), 20);
        assert!(master.outcome().is_none());
    }

    #[test]
    fn test_winners_clamped_and_tied() {
        assert_eq!(winners(&[123, 111], 100), vec![0, 1]);
        assert_eq!(winners(&[123, 99], 100), vec![0]);
        assert_eq!(winners(&[50, 50, 20], 100), vec![0, 1]);
        assert_eq!(winners(&[0, 0], 100), vec![0, 1]);
    }

    #[test]
    fn test_describe() {
        let outcome = GameOutcome {
            standings: vec![
                Standing { name: "A".into(), gold: 12 },
                Standing { name: "B".into(), gold: 12 },
                Standing { name: "C".into(), gold: 12 },
            ],
            winners: vec![0, 1, 2],
            rounds: 1,
            reason: EndReason::Quit,
        };
        assert_eq!(
            outcome.describe(),
            "Player 1 (A): 12\nPlayer 2 (B): 12\nPlayer 3 (C): 12\nA, B and C have won!"
        );

        let single = GameOutcome { winners: vec![1], ..outcome };
        assert!(single.describe().ends_with("\nB has won!"));
    }

    #[test]
    fn test_quit_stops_immediately() {
        let mut master = game(&["A", "B"]);
        let mut turns = Vec::new();
        let outcome = master.play(&mut |turn: &mut PlayerTurn<'_>| {
            turns.push(turn.player().name().to_string());
            turn.quit_game();
        });

        assert_eq!(turns, vec!["A".to_string()]);
        assert_eq!(outcome.reason, EndReason::Quit);
        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.winners, vec![0, 1]);
        // The quitting player was not updated
        assert_eq!(master.players()[0].changes(), Changes::default());
        assert_eq!(
            master.events().first().map(|e| &e.data),
            Some(&GameEventData::PlayerQuit)
        );
    }

    #[test]
    fn test_round_limit_and_unspent_moves() {
        let mut master = GameMaster::new(GameConfig {
            round_limit: Some(3),
            ..GameConfig::new(5, 100, 0, ["A", "B"])
        })
        .unwrap();

        // Does nothing; the master ends every turn
        let outcome = master.play(&mut |_: &mut PlayerTurn<'_>| {});
        assert_eq!(outcome.reason, EndReason::RoundLimit);
        assert_eq!(outcome.rounds, 3);

        let turn_ends = master
            .events()
            .iter()
            .filter(|e| matches!(e.data, GameEventData::TurnEnded { .. }))
            .count();
        assert_eq!(turn_ends, 6);
        assert!(master.players().iter().all(|p| p.moves_left() == 0));
    }

    #[test]
    fn test_play_twice_returns_stored_outcome() {
        let mut master = game(&["A"]);
        let first = master.play(&mut |turn: &mut PlayerTurn<'_>| turn.quit_game());
        let second = master.play(&mut |_: &mut PlayerTurn<'_>| panic!("no more turns"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_hash_tracks_state() {
        let mut a = game(&["A", "B"]);
        let b = game(&["A", "B"]);
        assert_eq!(a.compute_hash(), b.compute_hash());

        a.play(&mut |turn: &mut PlayerTurn<'_>| turn.quit_game());
        assert_ne!(a.compute_hash(), b.compute_hash());
    }
}
