//! Automated players and the controller that lets them take their turns.
//!
//! An [`AutomatedPlayer`] is a thin wrapper around a [`PlayerConfig`]: it
//! asks the search (or the random number generator) for a successor of the
//! current state and commits it to the [`GameEngine`].

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::ValueEnum;

use crate::board::Player;
use crate::constants::{DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH, PLIES_PER_ROUND};
use crate::engine::{CommitError, GameEngine};
use crate::heuristic::{Heuristic, HeuristicKind};
use crate::search::{Algorithm, SearchError, Searcher};
use crate::state::GameState;

/// How an automated player picks its move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Plain minimax search
    MinMax,
    /// Alpha-beta search
    AlphaBeta,
    /// Uniformly random successor
    Random,
}

impl Strategy {
    fn algorithm(self) -> Option<Algorithm> {
        match self {
            Strategy::MinMax => Some(Algorithm::MinMax),
            Strategy::AlphaBeta => Some(Algorithm::AlphaBeta),
            Strategy::Random => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlayerConfig {
    pub strategy: Strategy,
    pub heuristic: HeuristicKind,
    /// Search depth in full rounds; each round is one move per side.
    pub depth: usize,
    pub player: Player,
    /// Seed for [`Strategy::Random`].
    pub seed: u64,
}

impl PlayerConfig {
    pub fn new(player: Player) -> Self {
        Self {
            strategy: Strategy::AlphaBeta,
            heuristic: HeuristicKind::Mills,
            depth: DEFAULT_SEARCH_DEPTH,
            player,
            seed: 0,
        }
    }

    /// Depth in plies as seen by the search. Depth is capped at
    /// [`MAX_SEARCH_DEPTH`] rounds.
    pub fn plies(&self) -> usize {
        self.depth.min(MAX_SEARCH_DEPTH) * PLIES_PER_ROUND
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("it is not {0}'s turn")]
    NotOurTurn(Player),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Commit(#[from] CommitError),
}

pub struct AutomatedPlayer {
    config: PlayerConfig,
    heuristic: Box<dyn Heuristic>,
    rng: fastrand::Rng,
    stop: Option<Arc<AtomicBool>>,
}

impl AutomatedPlayer {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            heuristic: config.heuristic.build(),
            rng: fastrand::Rng::with_seed(config.seed),
            stop: None,
            config,
        }
    }

    /// Abort searches once `flag` is raised.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn player(&self) -> Player {
        self.config.player
    }

    /// Pick the successor of `state` to play. `state` must have this
    /// player to move.
    pub fn choose_move(&mut self, state: &GameState) -> Result<GameState, MoveError> {
        if state.to_move != self.config.player {
            return Err(MoveError::NotOurTurn(self.config.player));
        }
        let Some(algorithm) = self.config.strategy.algorithm() else {
            let successors = state.next_states();
            if successors.is_empty() {
                return Err(SearchError::NoMoves.into());
            }
            return Ok(successors[self.rng.usize(..successors.len())]);
        };

        let mut searcher = Searcher::new(self.heuristic.as_ref(), algorithm);
        if let Some(flag) = &self.stop {
            searcher = searcher.with_stop_flag(flag.clone());
        }
        let outcome = searcher.search(state, self.config.plies())?;
        Ok(outcome.state)
    }

    /// Choose a move for the live game and commit it.
    pub fn make_move(&mut self, engine: &mut GameEngine) -> Result<(), MoveError> {
        let next = self.choose_move(&engine.current_game_state())?;
        engine.commit_move(next)?;
        Ok(())
    }
}

/// Runs the automated side(s) of a game.
#[derive(Default)]
pub struct PlayersController {
    first: Option<AutomatedPlayer>,
    second: Option<AutomatedPlayer>,
}

impl PlayersController {
    /// `None` leaves that side to outside input.
    pub fn new(first: Option<AutomatedPlayer>, second: Option<AutomatedPlayer>) -> Self {
        Self { first, second }
    }

    pub fn set_player(&mut self, side: Player, player: Option<AutomatedPlayer>) {
        match side {
            Player::First => self.first = player,
            Player::Second => self.second = player,
        }
    }

    pub fn is_automated(&self, side: Player) -> bool {
        match side {
            Player::First => self.first.is_some(),
            Player::Second => self.second.is_some(),
        }
    }

    fn player_mut(&mut self, side: Player) -> Option<&mut AutomatedPlayer> {
        match side {
            Player::First => self.first.as_mut(),
            Player::Second => self.second.as_mut(),
        }
    }

    /// Let the side to move play if it is automated.
    ///
    /// Returns `Ok(false)` when the game is over or the side to move is not
    /// automated.
    pub fn play_turn(&mut self, engine: &mut GameEngine) -> Result<bool, MoveError> {
        if engine.is_finished() || engine.pawns_to_remove() > 0 {
            return Ok(false);
        }
        match self.player_mut(engine.current_player()) {
            Some(player) => {
                player.make_move(engine)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Play automated turns until the game ends, a non-automated side is to
    /// move, or `max_plies` turns have been played. Returns the winner.
    pub fn run(
        &mut self,
        engine: &mut GameEngine,
        max_plies: usize,
    ) -> Result<Option<Player>, MoveError> {
        let mut plies = 0;
        while plies < max_plies && self.play_turn(engine)? {
            plies += 1;
        }
        match engine.winner() {
            Some(winner) => log::info!("{winner} wins after {plies} plies"),
            None => log::info!("no result after {plies} plies"),
        }
        Ok(engine.winner())
    }
}
