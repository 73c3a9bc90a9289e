//! Depth-limited game-tree search: minimax and alpha-beta.
//!
//! Both algorithms share one depth-first walker; alpha-beta only adds the
//! `[alpha, beta]` window and the cutoff. First is always the maximizing
//! side and Second the minimizing side, matching the sign convention of
//! [`Heuristic::evaluate`].
//!
//! Ties go to the first successor in generation order, for both algorithms,
//! so given the same heuristic and depth they choose the same move. Alpha-beta
//! only visits fewer nodes.
//!
//! Every node works on its own successor states, so there is nothing shared
//! between sibling branches. A search can be interrupted by raising its stop
//! flag, which is checked once per node.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::ValueEnum;

use crate::board::Player;
use crate::heuristic::Heuristic;
use crate::state::GameState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Plain minimax
    MinMax,
    /// Minimax with alpha-beta pruning
    AlphaBeta,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no legal moves from the root position")]
    NoMoves,
    #[error("search cancelled")]
    Cancelled,
    #[error("search depth must be at least one ply")]
    ZeroDepth,
}

/// The chosen successor and how the search got there.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Successor of the root to play.
    pub state: GameState,
    /// Backed-up evaluation of that successor, from First's perspective.
    pub evaluation: f64,
    /// Nodes visited, root included.
    pub nodes: u64,
}

/// A configured search over one heuristic.
pub struct Searcher<'a> {
    heuristic: &'a dyn Heuristic,
    algorithm: Algorithm,
    stop: Option<Arc<AtomicBool>>,
}

impl<'a> Searcher<'a> {
    pub fn new(heuristic: &'a dyn Heuristic, algorithm: Algorithm) -> Self {
        Self {
            heuristic,
            algorithm,
            stop: None,
        }
    }

    /// Abort with [`SearchError::Cancelled`] once `flag` is raised.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    /// Search `plies` half-moves ahead of `root` and pick the best successor
    /// for the side to move. `plies` must be at least 1.
    pub fn search(&self, root: &GameState, plies: usize) -> Result<SearchOutcome, SearchError> {
        if plies == 0 {
            return Err(SearchError::ZeroDepth);
        }
        let mut walker = Walker {
            heuristic: self.heuristic,
            pruning: self.algorithm == Algorithm::AlphaBeta,
            stop: self.stop.as_deref(),
            nodes: 0,
        };
        let (state, evaluation) = walker.root(root, plies)?;
        log::debug!(
            "{:?} for {}: {} nodes at {} plies, evaluation {:.1}",
            self.algorithm,
            root.to_move,
            walker.nodes,
            plies,
            evaluation
        );
        Ok(SearchOutcome {
            state,
            evaluation,
            nodes: walker.nodes,
        })
    }
}

/// Minimax search from `root`.
pub fn minimax(
    root: &GameState,
    heuristic: &dyn Heuristic,
    plies: usize,
) -> Result<SearchOutcome, SearchError> {
    Searcher::new(heuristic, Algorithm::MinMax).search(root, plies)
}

/// Alpha-beta search from `root`.
pub fn alpha_beta(
    root: &GameState,
    heuristic: &dyn Heuristic,
    plies: usize,
) -> Result<SearchOutcome, SearchError> {
    Searcher::new(heuristic, Algorithm::AlphaBeta).search(root, plies)
}

struct Walker<'a> {
    heuristic: &'a dyn Heuristic,
    pruning: bool,
    stop: Option<&'a AtomicBool>,
    nodes: u64,
}

impl Walker<'_> {
    #[inline]
    fn enter(&mut self) -> Result<(), SearchError> {
        if self.stop.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(SearchError::Cancelled);
        }
        self.nodes += 1;
        Ok(())
    }

    fn root(&mut self, root: &GameState, plies: usize) -> Result<(GameState, f64), SearchError> {
        self.enter()?;
        let maximizing = root.to_move == Player::First;
        let mut alpha = f64::NEG_INFINITY;
        let mut beta = f64::INFINITY;
        let mut best: Option<(GameState, f64)> = None;

        for child in root.next_states() {
            let value = self.value(&child, plies - 1, alpha, beta)?;
            let improves = match best {
                None => true,
                Some((_, best_value)) if maximizing => value > best_value,
                Some((_, best_value)) => value < best_value,
            };
            if improves {
                best = Some((child, value));
                if self.pruning {
                    if maximizing {
                        alpha = alpha.max(value);
                    } else {
                        beta = beta.min(value);
                    }
                }
            }
        }
        best.ok_or(SearchError::NoMoves)
    }

    fn value(
        &mut self,
        state: &GameState,
        depth: usize,
        mut alpha: f64,
        mut beta: f64,
    ) -> Result<f64, SearchError> {
        self.enter()?;
        if depth == 0 {
            return Ok(self.heuristic.evaluate(state));
        }
        let children = state.next_states();
        if children.is_empty() {
            return Ok(self.heuristic.evaluate(state));
        }

        let maximizing = state.to_move == Player::First;
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        for child in &children {
            let value = self.value(child, depth - 1, alpha, beta)?;
            if maximizing {
                best = best.max(value);
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                beta = beta.min(best);
            }
            if self.pruning && alpha >= beta {
                break;
            }
        }
        Ok(best)
    }
}
