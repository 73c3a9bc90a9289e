//! Position evaluation for the search.
//!
//! Scores are from First's point of view: positive favors First, negative
//! favors Second. Richer heuristics are built by calling a simpler one and
//! adding their own term, not by inheritance.

use clap::ValueEnum;

use crate::board::Player;
use crate::constants::{
    CLOSED_MILL_WEIGHT, DEFAULT_MILL_WEIGHT, MOBILITY_WEIGHT, WINNING_WEIGHT,
};
use crate::mills::mills_of;
use crate::movegen::all_legal_moves;
use crate::state::GameState;

pub trait Heuristic: Send + Sync {
    /// Evaluation from First's perspective.
    fn evaluate(&self, state: &GameState) -> f64;

    /// Evaluation from `perspective`'s point of view.
    fn score(&self, state: &GameState, perspective: Player) -> f64 {
        match perspective {
            Player::First => self.evaluate(state),
            Player::Second => -self.evaluate(state),
        }
    }
}

/// Pawn difference, plus a large bonus once the game is decided.
#[derive(Clone, Copy, Debug, Default)]
pub struct PawnCount;

impl Heuristic for PawnCount {
    fn evaluate(&self, state: &GameState) -> f64 {
        let mut evaluation = state.first_player_pawns() as f64 - state.second_player_pawns() as f64;
        match state.winner {
            Some(Player::First) => evaluation += WINNING_WEIGHT,
            Some(Player::Second) => evaluation -= WINNING_WEIGHT,
            None => {}
        }
        evaluation
    }
}

/// [`PawnCount`] plus a fixed weight per active mill.
#[derive(Clone, Copy, Debug)]
pub struct MillCount {
    pub mill_weight: f64,
}

impl Default for MillCount {
    fn default() -> Self {
        Self {
            mill_weight: DEFAULT_MILL_WEIGHT,
        }
    }
}

impl Heuristic for MillCount {
    fn evaluate(&self, state: &GameState) -> f64 {
        let first = mills_of(&state.board, Player::First).len() as f64;
        let second = mills_of(&state.board, Player::Second).len() as f64;
        PawnCount.evaluate(state) + self.mill_weight * (first - second)
    }
}

/// [`MillCount`] plus a term for how many moves each side has.
#[derive(Clone, Copy, Debug)]
pub struct Mobility {
    pub mills: MillCount,
    pub mobility_weight: f64,
}

impl Default for Mobility {
    fn default() -> Self {
        Self {
            mills: MillCount::default(),
            mobility_weight: MOBILITY_WEIGHT,
        }
    }
}

impl Heuristic for Mobility {
    fn evaluate(&self, state: &GameState) -> f64 {
        let moves = |p: Player| all_legal_moves(&state.board, p, state.regime(p)).len() as f64;
        self.mills.evaluate(state)
            + self.mobility_weight * (moves(Player::First) - moves(Player::Second))
    }
}

/// Heuristic choice as a plain value, for configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum HeuristicKind {
    /// Pawn difference only
    Pawns,
    /// Pawn difference plus 18 per mill
    Mills,
    /// Pawn difference plus 26 per mill
    ClosedMills,
    /// Mills plus the difference in legal moves
    Mobility,
}

impl HeuristicKind {
    pub fn build(self) -> Box<dyn Heuristic> {
        match self {
            HeuristicKind::Pawns => Box::new(PawnCount),
            HeuristicKind::Mills => Box::new(MillCount::default()),
            HeuristicKind::ClosedMills => Box::new(MillCount {
                mill_weight: CLOSED_MILL_WEIGHT,
            }),
            HeuristicKind::Mobility => Box::new(Mobility::default()),
        }
    }
}
