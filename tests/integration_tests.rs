//! Integration tests for mill-rust
//!
//! Whole games played through the public API, plus property checks over
//! seeded random boards and random playouts.

use mill_rust::board::{Board, Player};
use mill_rust::constants::{FIELD_COUNT, LOSING_PAWNS, PLAYER_PAWNS};
use mill_rust::engine::{GameEngine, SelectionError};
use mill_rust::heuristic::{HeuristicKind, MillCount};
use mill_rust::mills::{active_mills, mill_difference};
use mill_rust::movegen::{MoveRegime, all_legal_moves, has_legal_move};
use mill_rust::player::{AutomatedPlayer, PlayerConfig, PlayersController, Strategy};
use mill_rust::search::{alpha_beta, minimax};
use mill_rust::state::{GameState, Phase};

// =============================================================================
// Helper functions
// =============================================================================

/// A board with every field independently empty, First or Second.
fn random_board(rng: &mut fastrand::Rng) -> Board {
    let mut board = Board::new();
    for pos in 0..FIELD_COUNT {
        match rng.u8(0..3) {
            1 => board.set(pos, Player::First),
            2 => board.set(pos, Player::Second),
            _ => {}
        }
    }
    board
}

fn pick<T: Copy>(rng: &mut fastrand::Rng, items: &[T]) -> T {
    items[rng.usize(..items.len())]
}

/// Play one complete turn for the side to move through field selections,
/// including any captures it earns.
fn play_random_turn(engine: &mut GameEngine, rng: &mut fastrand::Rng) {
    let mover = engine.current_player();
    if engine.phase() == Phase::PlacingPawns {
        let targets = engine.current_possible_move_indices();
        engine.handle_selection(pick(rng, &targets));
    } else {
        let state = engine.current_game_state();
        let moves = all_legal_moves(&state.board, mover, state.regime(mover));
        let mv = pick(rng, &moves);
        if let Some(from) = mv.from {
            engine.handle_selection(from);
        }
        engine.handle_selection(mv.to);
    }
    while engine.pawns_to_remove() > 0 {
        let targets = engine.current_possible_move_indices();
        engine.handle_selection(pick(rng, &targets));
    }
}

fn assert_counts_match_board(engine: &GameEngine) {
    for player in Player::ALL {
        assert_eq!(
            engine.board().count(player),
            engine.player(player).on_board,
            "{player} pawn count out of sync"
        );
    }
}

// =============================================================================
// Full games through the rules engine
// =============================================================================

#[test]
fn test_placement_takes_eighteen_turns() {
    for seed in 0..20 {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut engine = GameEngine::new();
        let mut turns = 0;
        while engine.phase() == Phase::PlacingPawns {
            play_random_turn(&mut engine, &mut rng);
            turns += 1;
            assert_counts_match_board(&engine);
        }
        assert_eq!(turns, 2 * PLAYER_PAWNS, "seed {seed}");
        assert_eq!(engine.player(Player::First).to_place, 0);
        assert_eq!(engine.player(Player::Second).to_place, 0);
    }
}

#[test]
fn test_random_games_stay_consistent() {
    for seed in 0..20 {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut engine = GameEngine::new();
        let mut seen_normal_play = false;
        for _ in 0..300 {
            if engine.is_finished() {
                break;
            }
            play_random_turn(&mut engine, &mut rng);
            assert_counts_match_board(&engine);
            assert_eq!(engine.pawns_to_remove(), 0);
            assert_eq!(engine.selected_field(), None);

            // Normal play never reverts to placement.
            if seen_normal_play {
                assert_eq!(engine.phase(), Phase::NormalPlay);
            }
            seen_normal_play |= engine.phase() == Phase::NormalPlay;
        }

        if let Some(winner) = engine.winner() {
            let loser = winner.opponent();
            let state = engine.current_game_state();
            let lost_on_pawns = engine.player(loser).on_board <= LOSING_PAWNS;
            let blocked = engine.current_player() == loser
                && !has_legal_move(engine.board(), loser, state.regime(loser));
            assert!(lost_on_pawns || blocked, "seed {seed}: {winner} wins without cause");
            assert_eq!(engine.try_select(0), Err(SelectionError::GameFinished));
        }
    }
}

#[test]
fn test_engine_turns_are_successor_states() {
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..10 {
        let mut engine = GameEngine::new();
        for _ in 0..60 {
            if engine.is_finished() {
                break;
            }
            let state = engine.current_game_state();
            let mut probe = GameEngine::from_state(state);
            play_random_turn(&mut probe, &mut rng);
            assert!(
                state.next_states().contains(&probe.current_game_state()),
                "turn played through selections is not a generated successor"
            );
            play_random_turn(&mut engine, &mut rng);
        }
    }
}

#[test]
fn test_invalid_selections_change_nothing() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut engine = GameEngine::new();
    for _ in 0..80 {
        if engine.is_finished() {
            break;
        }
        let before = engine.current_game_state();
        let selected = engine.selected_field();
        // Includes a couple of indices off the board.
        let field = rng.usize(..FIELD_COUNT + 2);
        if engine.try_select(field).is_err() {
            assert_eq!(engine.current_game_state(), before);
            assert_eq!(engine.selected_field(), selected);
        }

        while engine.pawns_to_remove() > 0 {
            let targets = engine.current_possible_move_indices();
            engine.handle_selection(pick(&mut rng, &targets));
        }
        if !engine.is_finished() {
            play_random_turn(&mut engine, &mut rng);
        }
    }
}

// =============================================================================
// Properties over random boards
// =============================================================================

#[test]
fn test_active_mills_idempotent() {
    let mut rng = fastrand::Rng::with_seed(1);
    for _ in 0..500 {
        let board = random_board(&mut rng);
        let mills = active_mills(&board);
        assert_eq!(mills, active_mills(&board));
        let diff = mill_difference(mills, &board);
        assert_eq!(diff.current, mills);
        assert!(diff.newly_closed.is_empty());
    }
}

#[test]
fn test_has_legal_move_agrees_with_generation() {
    let mut rng = fastrand::Rng::with_seed(2);
    for _ in 0..500 {
        let board = random_board(&mut rng);
        for player in Player::ALL {
            for regime in [MoveRegime::Placement, MoveRegime::Normal, MoveRegime::Flying] {
                let moves = all_legal_moves(&board, player, regime);
                assert_eq!(has_legal_move(&board, player, regime), !moves.is_empty());
                for mv in moves {
                    assert!(board.is_empty(mv.to));
                    if let Some(from) = mv.from {
                        assert_eq!(board.get(from), Some(player));
                    }
                }
            }
        }
    }
}

#[test]
fn test_successors_conserve_pawns() {
    let mut rng = fastrand::Rng::with_seed(3);
    for _ in 0..100 {
        let state = GameState::from_board(random_board(&mut rng), Player::First);
        for next in state.next_states() {
            assert_eq!(next.to_move, Player::Second);
            assert_eq!(next.first_player_pawns(), state.first_player_pawns());
            assert!(next.second_player_pawns() <= state.second_player_pawns());
            assert_eq!(next.board.count(Player::Second), next.second_player_pawns());
        }
    }
}

#[test]
fn test_minimax_and_alpha_beta_agree() {
    let mut rng = fastrand::Rng::with_seed(4);
    let mut checked = 0;
    while checked < 25 {
        let to_move = if rng.bool() { Player::First } else { Player::Second };
        let state = GameState::from_board(random_board(&mut rng), to_move);
        if state.is_finished() {
            continue;
        }
        for heuristic in [HeuristicKind::Pawns, HeuristicKind::Mobility] {
            let heuristic = heuristic.build();
            let plain = minimax(&state, heuristic.as_ref(), 3).unwrap();
            let pruned = alpha_beta(&state, heuristic.as_ref(), 3).unwrap();
            assert_eq!(plain.state, pruned.state);
            assert_eq!(plain.evaluation, pruned.evaluation);
            assert!(pruned.nodes <= plain.nodes);
        }
        checked += 1;
    }
}

// =============================================================================
// Automated players
// =============================================================================

#[test]
fn test_controller_plays_through_placement() {
    let mut engine = GameEngine::new();
    let mut first = PlayerConfig::new(Player::First);
    first.depth = 1;
    first.heuristic = HeuristicKind::Pawns;
    let mut second = PlayerConfig::new(Player::Second);
    second.strategy = Strategy::Random;
    second.seed = 11;
    let mut controller = PlayersController::new(
        Some(AutomatedPlayer::new(first)),
        Some(AutomatedPlayer::new(second)),
    );
    controller.run(&mut engine, 2 * PLAYER_PAWNS).unwrap();
    assert_eq!(engine.phase(), Phase::NormalPlay);
    assert_eq!(engine.pawns_to_remove(), 0);
    assert_counts_match_board(&engine);
}

#[test]
fn test_self_play_to_completion() {
    let mut engine = GameEngine::new();
    let mut first = PlayerConfig::new(Player::First);
    first.strategy = Strategy::Random;
    first.seed = 5;
    let mut second = PlayerConfig::new(Player::Second);
    second.strategy = Strategy::Random;
    second.seed = 6;
    let mut controller = PlayersController::new(
        Some(AutomatedPlayer::new(first)),
        Some(AutomatedPlayer::new(second)),
    );
    let winner = controller.run(&mut engine, 1000).unwrap();
    assert_eq!(winner, engine.winner());
    assert_counts_match_board(&engine);
}

#[test]
fn test_search_finds_winning_capture() {
    // First moves G4-G1, closes A1-D1-G1 and leaves Second with two pawns.
    let board = Board::with_pawns(&[0, 1, 10, 13, 14], &[21, 22, 16]);
    let mut engine = GameEngine::from_state(GameState::from_board(board, Player::First));
    let mut config = PlayerConfig::new(Player::First);
    config.depth = 1;
    let mut player = AutomatedPlayer::new(config);
    player.make_move(&mut engine).unwrap();
    assert_eq!(engine.winner(), Some(Player::First));
    assert_eq!(engine.player(Player::Second).on_board, 2);

    let heuristic = MillCount::default();
    let state = engine.current_game_state();
    assert!(minimax(&state, &heuristic, 2).is_err());
}
