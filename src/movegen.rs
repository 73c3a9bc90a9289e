//! Legal move generation for the three movement regimes.
//!
//! Moves are produced in a fixed order: placements by ascending field, and
//! moves by ascending source field, then by destination in adjacency-table
//! (or, when flying, ascending) order. The search relies on this order for
//! reproducible tie-breaking.

use crate::board::{Board, Player, Pos};
use crate::constants::{ADJACENT, FIELD_COUNT, FLYING_PAWNS};
use crate::state::Phase;

/// A single placement or movement, before any capture is resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// Source field, or `None` for a placement.
    pub from: Option<Pos>,
    pub to: Pos,
}

impl Move {
    pub fn place(to: Pos) -> Self {
        Self { from: None, to }
    }

    pub fn shift(from: Pos, to: Pos) -> Self {
        Self {
            from: Some(from),
            to,
        }
    }

    /// Apply the move for `player` to a copy of `board`.
    pub fn apply(&self, board: &Board, player: Player) -> Board {
        let mut next = *board;
        if let Some(from) = self.from {
            next.clear(from);
        }
        next.set(self.to, player);
        next
    }
}

/// How a player may currently move their pawns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveRegime {
    /// Put a new pawn on any empty field.
    Placement,
    /// Slide a pawn to an adjacent empty field.
    Normal,
    /// Jump a pawn to any empty field.
    Flying,
}

impl MoveRegime {
    pub fn for_player(phase: Phase, pawns_on_board: usize) -> Self {
        match phase {
            Phase::PlacingPawns => MoveRegime::Placement,
            Phase::NormalPlay if pawns_on_board <= FLYING_PAWNS => MoveRegime::Flying,
            Phase::NormalPlay => MoveRegime::Normal,
        }
    }
}

/// Empty fields a pawn on `from` may move to.
///
/// Placement has no source, so under [`MoveRegime::Placement`] this is every
/// empty field, the same as flying.
pub fn destinations(board: &Board, from: Pos, regime: MoveRegime) -> Vec<Pos> {
    match regime {
        MoveRegime::Normal => ADJACENT[from]
            .iter()
            .copied()
            .filter(|&to| board.is_empty(to))
            .collect(),
        MoveRegime::Flying | MoveRegime::Placement => board.empty_fields(),
    }
}

/// Check a single move without generating the full list.
pub fn is_legal_destination(board: &Board, from: Pos, to: Pos, regime: MoveRegime) -> bool {
    board.is_empty(to)
        && match regime {
            MoveRegime::Normal => ADJACENT[from].contains(&to),
            MoveRegime::Flying | MoveRegime::Placement => true,
        }
}

/// Whether `player` has at least one legal move. Same answer as
/// `!all_legal_moves(..).is_empty()` without building the list.
pub fn has_legal_move(board: &Board, player: Player, regime: MoveRegime) -> bool {
    let has_empty = (0..FIELD_COUNT).any(|pos| board.is_empty(pos));
    match regime {
        MoveRegime::Placement => has_empty,
        MoveRegime::Flying => has_empty && board.count(player) > 0,
        MoveRegime::Normal => (0..FIELD_COUNT)
            .filter(|&from| board.get(from) == Some(player))
            .any(|from| ADJACENT[from].iter().any(|&to| board.is_empty(to))),
    }
}

/// Every legal placement or move for `player`.
pub fn all_legal_moves(board: &Board, player: Player, regime: MoveRegime) -> Vec<Move> {
    if regime == MoveRegime::Placement {
        return board.empty_fields().into_iter().map(Move::place).collect();
    }
    let mut moves = Vec::new();
    for from in board.fields_owned_by(player) {
        for to in destinations(board, from, regime) {
            moves.push(Move::shift(from, to));
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_selection() {
        assert_eq!(
            MoveRegime::for_player(Phase::PlacingPawns, 2),
            MoveRegime::Placement
        );
        assert_eq!(MoveRegime::for_player(Phase::NormalPlay, 4), MoveRegime::Normal);
        assert_eq!(MoveRegime::for_player(Phase::NormalPlay, 3), MoveRegime::Flying);
    }

    #[test]
    fn test_placement_targets_all_empty_fields() {
        let board = Board::with_pawns(&[0, 5], &[7]);
        let moves = all_legal_moves(&board, Player::First, MoveRegime::Placement);
        assert_eq!(moves.len(), 21);
        assert!(moves.iter().all(|m| m.from.is_none()));
        assert_eq!(moves[0], Move::place(1));
        assert!(moves.windows(2).all(|w| w[0].to < w[1].to));
    }

    #[test]
    fn test_normal_moves_follow_adjacency() {
        // D2 (4) touches D1, B2, F2, D3; D1 is taken.
        let board = Board::with_pawns(&[4, 1], &[]);
        assert_eq!(destinations(&board, 4, MoveRegime::Normal), vec![3, 5, 7]);
        let moves = all_legal_moves(&board, Player::First, MoveRegime::Normal);
        assert_eq!(
            moves,
            vec![
                Move::shift(1, 0),
                Move::shift(1, 2),
                Move::shift(4, 3),
                Move::shift(4, 5),
                Move::shift(4, 7),
            ]
        );
    }

    #[test]
    fn test_flying_reaches_any_empty_field() {
        let board = Board::with_pawns(&[0, 1, 2], &[3, 4, 5, 6]);
        let dests = destinations(&board, 0, MoveRegime::Flying);
        assert_eq!(dests.len(), 24 - 7);
        assert!(dests.contains(&23));
        assert!(is_legal_destination(&board, 0, 23, MoveRegime::Flying));
        assert!(!is_legal_destination(&board, 0, 23, MoveRegime::Normal));
        assert!(!is_legal_destination(&board, 0, 3, MoveRegime::Flying));
    }

    #[test]
    fn test_blocked_player_has_no_moves() {
        // First in the corners of the outer square, hemmed in by Second.
        let board = Board::with_pawns(&[0, 2, 21, 23], &[1, 9, 14, 22]);
        assert!(all_legal_moves(&board, Player::First, MoveRegime::Normal).is_empty());
        assert!(!has_legal_move(&board, Player::First, MoveRegime::Normal));
        assert!(!all_legal_moves(&board, Player::Second, MoveRegime::Normal).is_empty());
        assert!(has_legal_move(&board, Player::Second, MoveRegime::Normal));
        // The same pawns may still fly anywhere.
        assert!(has_legal_move(&board, Player::First, MoveRegime::Flying));
    }

    #[test]
    fn test_apply_move() {
        let board = Board::with_pawns(&[4], &[]);
        let next = Move::shift(4, 7).apply(&board, Player::First);
        assert!(next.is_empty(4));
        assert_eq!(next.get(7), Some(Player::First));
        assert_eq!(board.get(4), Some(Player::First));
    }
}
