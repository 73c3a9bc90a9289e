//! Game-state snapshots and successor generation.
//!
//! A [`GameState`] is a plain value: the board, both players' pawn counts,
//! the side to move, and the winner if the game is decided. The search only
//! ever derives new states from existing ones; nothing here mutates a state
//! that has already been handed out.
//!
//! Successor generation resolves a whole turn, including captures: a move
//! that closes `k` mills is expanded once per unordered choice of `k`
//! opponent pawns to remove.

use crate::board::{Board, Player, Pos};
use crate::constants::{FLYING_PAWNS, LOSING_PAWNS, PLAYER_PAWNS};
use crate::mills::{MillSet, active_mills, mill_difference};
use crate::movegen::{MoveRegime, all_legal_moves, has_legal_move};

/// Pawn counts for one player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayerState {
    /// Pawns still to be placed.
    pub to_place: usize,
    /// Pawns currently on the board.
    pub on_board: usize,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            to_place: PLAYER_PAWNS,
            on_board: 0,
        }
    }

    #[inline]
    pub fn has_pawns_to_place(&self) -> bool {
        self.to_place > 0
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.on_board <= FLYING_PAWNS
    }

    /// Record a placement. Does nothing once every pawn is placed.
    pub fn place(&mut self) {
        if self.to_place > 0 {
            self.to_place -= 1;
            self.on_board += 1;
        }
    }

    /// Record a captured pawn.
    pub fn remove(&mut self) {
        self.on_board = self.on_board.saturating_sub(1);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    PlacingPawns,
    NormalPlay,
}

impl Phase {
    /// Normal play starts once neither player has pawns left to place.
    pub fn of(first: &PlayerState, second: &PlayerState) -> Phase {
        if first.has_pawns_to_place() || second.has_pawns_to_place() {
            Phase::PlacingPawns
        } else {
            Phase::NormalPlay
        }
    }
}

/// Decide whether the game is over.
///
/// Only evaluated in normal play: a player with [`LOSING_PAWNS`] or fewer on
/// the board has lost, and so has the side to move if it cannot move at all.
pub fn decide_winner(
    board: &Board,
    first: &PlayerState,
    second: &PlayerState,
    to_move: Player,
) -> Option<Player> {
    let phase = Phase::of(first, second);
    if phase != Phase::NormalPlay {
        return None;
    }
    let state_of = |p: Player| match p {
        Player::First => first,
        Player::Second => second,
    };
    for player in [to_move, to_move.opponent()] {
        if state_of(player).on_board <= LOSING_PAWNS {
            return Some(player.opponent());
        }
    }
    let regime = MoveRegime::for_player(phase, state_of(to_move).on_board);
    if !has_legal_move(board, to_move, regime) {
        return Some(to_move.opponent());
    }
    None
}

/// Snapshot of a game as seen by the search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    pub board: Board,
    pub first: PlayerState,
    pub second: PlayerState,
    pub to_move: Player,
    pub winner: Option<Player>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// The start of a game: empty board, First to place.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            first: PlayerState::new(),
            second: PlayerState::new(),
            to_move: Player::First,
            winner: None,
        }
    }

    /// Build a state from its parts, deciding the winner.
    pub fn with_players(
        board: Board,
        first: PlayerState,
        second: PlayerState,
        to_move: Player,
    ) -> Self {
        let winner = decide_winner(&board, &first, &second, to_move);
        Self {
            board,
            first,
            second,
            to_move,
            winner,
        }
    }

    /// A normal-play position with every pawn already placed.
    pub fn from_board(board: Board, to_move: Player) -> Self {
        let counts = |p: Player| PlayerState {
            to_place: 0,
            on_board: board.count(p),
        };
        Self::with_players(board, counts(Player::First), counts(Player::Second), to_move)
    }

    #[inline]
    pub fn player(&self, player: Player) -> &PlayerState {
        match player {
            Player::First => &self.first,
            Player::Second => &self.second,
        }
    }

    #[inline]
    fn player_mut(&mut self, player: Player) -> &mut PlayerState {
        match player {
            Player::First => &mut self.first,
            Player::Second => &mut self.second,
        }
    }

    pub fn first_player_pawns(&self) -> usize {
        self.first.on_board
    }

    pub fn second_player_pawns(&self) -> usize {
        self.second.on_board
    }

    pub fn phase(&self) -> Phase {
        Phase::of(&self.first, &self.second)
    }

    pub fn regime(&self, player: Player) -> MoveRegime {
        MoveRegime::for_player(self.phase(), self.player(player).on_board)
    }

    pub fn active_mills(&self) -> MillSet {
        active_mills(&self.board)
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Successors for the side to move.
    pub fn next_states(&self) -> Vec<GameState> {
        self.next_states_for(self.to_move)
    }

    /// Every state reachable by one complete turn of `player`.
    ///
    /// Order: moves in generation order, then removal choices in ascending
    /// lexicographic order. A decided game has no successors.
    pub fn next_states_for(&self, player: Player) -> Vec<GameState> {
        if self.winner.is_some() {
            return Vec::new();
        }
        let opponent = player.opponent();
        let baseline = self.active_mills();
        let mut out = Vec::new();

        for mv in all_legal_moves(&self.board, player, self.regime(player)) {
            let mut next = *self;
            next.board = mv.apply(&self.board, player);
            if mv.from.is_none() {
                next.player_mut(player).place();
            }

            let targets = next.board.fields_owned_by(opponent);
            let owed = mill_difference(baseline, &next.board)
                .newly_closed
                .len()
                .min(targets.len());
            if owed == 0 {
                out.push(next.finish_turn(player));
                continue;
            }

            for removed in combinations(&targets, owed) {
                let mut captured = next;
                for pos in removed {
                    captured.board.clear(pos);
                    captured.player_mut(opponent).remove();
                }
                out.push(captured.finish_turn(player));
            }
        }
        out
    }

    fn finish_turn(mut self, mover: Player) -> GameState {
        self.to_move = mover.opponent();
        self.winner = decide_winner(&self.board, &self.first, &self.second, self.to_move);
        self
    }
}

/// All `k`-element subsets of `items`, in lexicographic order of position.
pub(crate) fn combinations(items: &[Pos], k: usize) -> Vec<Vec<Pos>> {
    let n = items.len();
    if k > n {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.iter().map(|&i| items[i]).collect());

        // Advance the rightmost index that still has room.
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if idx[i] != i + n - k {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.phase(), Phase::PlacingPawns);
        assert_eq!(state.to_move, Player::First);
        assert_eq!(state.winner, None);
        assert_eq!(state.next_states().len(), 24);
    }

    #[test]
    fn test_player_state_place_and_remove() {
        let mut p = PlayerState::new();
        for _ in 0..PLAYER_PAWNS + 2 {
            p.place();
        }
        assert_eq!(p.to_place, 0);
        assert_eq!(p.on_board, PLAYER_PAWNS);
        assert!(!p.is_flying());
        for _ in 0..6 {
            p.remove();
        }
        assert!(p.is_flying());
    }

    #[test]
    fn test_combinations() {
        assert_eq!(
            combinations(&[1, 2, 3, 4], 2),
            vec![
                vec![1, 2],
                vec![1, 3],
                vec![1, 4],
                vec![2, 3],
                vec![2, 4],
                vec![3, 4],
            ]
        );
        assert_eq!(combinations(&[5, 6], 1), vec![vec![5], vec![6]]);
        assert_eq!(combinations(&[5, 6], 0), vec![Vec::<Pos>::new()]);
        assert!(combinations(&[5], 2).is_empty());
    }

    #[test]
    fn test_placement_successors_switch_side() {
        let state = GameState::new();
        for next in state.next_states() {
            assert_eq!(next.to_move, Player::Second);
            assert_eq!(next.first.to_place, PLAYER_PAWNS - 1);
            assert_eq!(next.first.on_board, 1);
        }
    }

    #[test]
    fn test_single_mill_expands_per_capture() {
        // First places at G1 to close A1-D1-G1; Second has three pawns.
        let board = Board::with_pawns(&[0, 1], &[9, 10, 23]);
        let first = PlayerState {
            to_place: 7,
            on_board: 2,
        };
        let second = PlayerState {
            to_place: 6,
            on_board: 3,
        };
        let state = GameState::with_players(board, first, second, Player::First);
        let next = state.next_states();
        // 19 empty fields; placing on 2 yields 3 captures instead of 1 state.
        assert_eq!(next.len(), 18 + 3);
        let captures: Vec<_> = next
            .iter()
            .filter(|s| s.board.get(2) == Some(Player::First))
            .collect();
        assert_eq!(captures.len(), 3);
        for s in &captures {
            assert_eq!(s.second.on_board, 2);
            assert_eq!(s.board.count(Player::Second), 2);
        }
        // Removal order follows the opponent's fields.
        assert!(captures[0].board.is_empty(9));
        assert!(captures[1].board.is_empty(10));
        assert!(captures[2].board.is_empty(23));
    }

    #[test]
    fn test_double_mill_expands_per_pair() {
        // Placing on A1 closes A1-D1-G1 and A1-A4-A7 at once.
        let board = Board::with_pawns(&[1, 2, 9, 21], &[4, 7, 13, 16, 19]);
        let first = PlayerState {
            to_place: 4,
            on_board: 4,
        };
        let second = PlayerState {
            to_place: 4,
            on_board: 5,
        };
        let state = GameState::with_players(board, first, second, Player::First);
        let double: Vec<_> = state
            .next_states()
            .into_iter()
            .filter(|s| s.board.get(0) == Some(Player::First))
            .collect();
        // C(5, 2) unordered pairs.
        assert_eq!(double.len(), 10);
        assert!(double.iter().all(|s| s.second.on_board == 3));
        let distinct: std::collections::HashSet<_> = double.iter().map(|s| s.board).collect();
        assert_eq!(distinct.len(), 10);
    }

    #[test]
    fn test_standing_mill_is_not_recounted() {
        // First already has A1-D1-G1; moving elsewhere closes nothing new.
        let board = Board::with_pawns(&[0, 1, 2, 6, 12], &[21, 22, 18, 20, 16]);
        let state = GameState::from_board(board, Player::First);
        for next in state.next_states() {
            if next.board.get(0) == Some(Player::First)
                && next.board.get(1) == Some(Player::First)
                && next.board.get(2) == Some(Player::First)
            {
                assert_eq!(next.second.on_board, 5, "standing mill must not capture");
            }
        }
    }

    #[test]
    fn test_two_pawns_lose() {
        let board = Board::with_pawns(&[0, 1, 2, 5], &[21, 22]);
        let state = GameState::from_board(board, Player::First);
        assert_eq!(state.winner, Some(Player::First));
        assert!(state.next_states().is_empty());
    }

    #[test]
    fn test_blocked_side_to_move_loses() {
        let board = Board::with_pawns(&[0, 2, 21, 23], &[1, 9, 14, 22]);
        let state = GameState::from_board(board, Player::First);
        assert_eq!(state.winner, Some(Player::Second));

        // Blocked but not to move: the game goes on.
        let state = GameState::from_board(board, Player::Second);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn test_no_winner_during_placement() {
        let board = Board::with_pawns(&[0], &[]);
        let first = PlayerState {
            to_place: 8,
            on_board: 1,
        };
        let state = GameState::with_players(board, first, PlayerState::new(), Player::Second);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn test_flying_successors() {
        let board = Board::with_pawns(&[0, 4, 8], &[21, 22, 14, 16]);
        let state = GameState::from_board(board, Player::First);
        assert_eq!(state.regime(Player::First), MoveRegime::Flying);
        // 3 pawns x 17 empty fields, no mill can close (no two in a line).
        assert_eq!(state.next_states().len(), 3 * 17);
    }
}
