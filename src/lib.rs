//! Mill-Rust: rules engine and game-tree search for Nine Men's Morris.
//!
//! This crate provides the full rules of the game (placing, moving, flying,
//! mills, captures and win detection) and minimax / alpha-beta search for
//! automated players.
//!
//! ## Modules
//!
//! - [`constants`] - Board topology and engine parameters
//! - [`board`] - Players, fields and the board itself
//! - [`mills`] - Mill detection
//! - [`movegen`] - Legal placements, moves and flights
//! - [`state`] - Game-state snapshots and successor generation
//! - [`engine`] - Interactive rules engine driven by field selections
//! - [`heuristic`] - Position evaluation
//! - [`search`] - Minimax and alpha-beta search
//! - [`player`] - Automated players and the turn controller
//! - [`protocol`] - Text protocol for driving a game over stdin/stdout
//!
//! ## Example
//!
//! ```
//! use mill_rust::board::Player;
//! use mill_rust::engine::GameEngine;
//! use mill_rust::heuristic::MillCount;
//! use mill_rust::search::alpha_beta;
//!
//! // First places on D2, Second on B2
//! let mut engine = GameEngine::new();
//! engine.handle_selection(4);
//! engine.handle_selection(3);
//!
//! // Search two plies ahead and play the result
//! let outcome = alpha_beta(&engine.current_game_state(), &MillCount::default(), 2).unwrap();
//! engine.commit_move(outcome.state).unwrap();
//! assert_eq!(engine.current_player(), Player::Second);
//! ```

pub mod board;
pub mod constants;
pub mod engine;
pub mod heuristic;
pub mod mills;
pub mod movegen;
pub mod player;
pub mod protocol;
pub mod search;
pub mod state;
