//! The interactive rules engine.
//!
//! [`GameEngine`] owns the live game: the board, both players' pawn counts,
//! whose turn it is, and the transient selection/removal state. Input arrives
//! one field at a time through [`GameEngine::handle_selection`]:
//!
//! - while a capture is owed, a click removes an opponent pawn;
//! - during placement, a click puts a pawn on an empty field;
//! - during normal play, the first click picks one of the mover's pawns and
//!   the second click picks its destination.
//!
//! Invalid input is ignored and leaves the game untouched. Listeners are told
//! about every change synchronously, before the mutating call returns.

use crate::board::{Board, Player, Pos, field_name};
use crate::constants::FIELD_COUNT;
use crate::mills::{MillSet, active_mills, mill_difference};
use crate::movegen::{MoveRegime, destinations, is_legal_destination};
use crate::state::{GameState, Phase, PlayerState, decide_winner};

/// Change notifications, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    BoardChanged(Board),
    TurnChanged(Player),
    GameFinished(Player),
}

/// Handle returned by [`GameEngine::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Why a selection was ignored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("the game is already finished")]
    GameFinished,
    #[error("field {0} is off the board")]
    OutOfRange(Pos),
    #[error("field {} is occupied", field_name(*.0))]
    Occupied(Pos),
    #[error("field {} does not hold an opponent pawn", field_name(*.0))]
    NotOpponentPawn(Pos),
    #[error("no pawn selected to move")]
    NoSourceSelected,
    #[error("cannot move from {} to {}", field_name(*.from), field_name(*.to))]
    IllegalDestination { from: Pos, to: Pos },
}

/// Why a searched state could not be committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    #[error("the game is already finished")]
    GameFinished,
    #[error("a capture is still owed")]
    RemovalPending,
    #[error("state is not reachable in one turn from the current position")]
    NotASuccessor,
}

type Listener = Box<dyn FnMut(&GameEvent)>;

pub struct GameEngine {
    board: Board,
    first: PlayerState,
    second: PlayerState,
    current: Player,
    phase: Phase,
    selected: Option<Pos>,
    pawns_to_remove: usize,
    /// Mills active after the last mutation; new captures are counted against it.
    last_turn_mills: MillSet,
    winner: Option<Player>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    /// A new game: empty board, First to place.
    pub fn new() -> Self {
        Self::from_state(GameState::new())
    }

    /// Continue a game from an arbitrary snapshot. The winner is decided
    /// from the snapshot's board and counts, not taken from `state.winner`.
    pub fn from_state(state: GameState) -> Self {
        Self {
            board: state.board,
            first: state.first,
            second: state.second,
            current: state.to_move,
            phase: state.phase(),
            selected: None,
            pawns_to_remove: 0,
            last_turn_mills: active_mills(&state.board),
            winner: decide_winner(&state.board, &state.first, &state.second, state.to_move),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Captures still owed by the current player.
    pub fn pawns_to_remove(&self) -> usize {
        self.pawns_to_remove
    }

    /// Source field picked by the first click of a move.
    pub fn selected_field(&self) -> Option<Pos> {
        self.selected
    }

    pub fn player(&self, player: Player) -> &PlayerState {
        match player {
            Player::First => &self.first,
            Player::Second => &self.second,
        }
    }

    fn player_mut(&mut self, player: Player) -> &mut PlayerState {
        match player {
            Player::First => &mut self.first,
            Player::Second => &mut self.second,
        }
    }

    /// Register a listener for [`GameEvent`]s.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: GameEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    /// Feed one clicked field into the game. Invalid input is ignored.
    pub fn handle_selection(&mut self, field: Pos) {
        if let Err(err) = self.try_select(field) {
            log::trace!("ignored selection of {field}: {err}");
        }
    }

    /// Like [`handle_selection`](Self::handle_selection), but reports why
    /// the input was ignored. The game is unchanged on `Err`.
    pub fn try_select(&mut self, field: Pos) -> Result<(), SelectionError> {
        if self.winner.is_some() {
            return Err(SelectionError::GameFinished);
        }
        if field >= FIELD_COUNT {
            return Err(SelectionError::OutOfRange(field));
        }

        if self.pawns_to_remove > 0 {
            self.remove_pawn(field)?;
        } else if self.phase == Phase::PlacingPawns {
            self.place_pawn(field)?;
        } else {
            self.select_or_move(field)?;
        }

        self.update_phase();
        self.check_winner();
        Ok(())
    }

    fn remove_pawn(&mut self, field: Pos) -> Result<(), SelectionError> {
        let opponent = self.current.opponent();
        if self.board.get(field) != Some(opponent) {
            return Err(SelectionError::NotOpponentPawn(field));
        }
        self.board.clear(field);
        self.player_mut(opponent).remove();
        self.pawns_to_remove -= 1;
        self.last_turn_mills = active_mills(&self.board);
        self.emit(GameEvent::BoardChanged(self.board));
        if self.pawns_to_remove == 0 {
            self.switch_player();
        }
        Ok(())
    }

    fn place_pawn(&mut self, field: Pos) -> Result<(), SelectionError> {
        if !self.board.is_empty(field) {
            return Err(SelectionError::Occupied(field));
        }
        let player = self.current;
        self.board.set(field, player);
        self.player_mut(player).place();
        self.emit(GameEvent::BoardChanged(self.board));
        self.resolve_mills();
        Ok(())
    }

    fn select_or_move(&mut self, field: Pos) -> Result<(), SelectionError> {
        match self.board.get(field) {
            Some(owner) if owner == self.current => {
                self.selected = Some(field);
                Ok(())
            }
            Some(_) => Err(SelectionError::Occupied(field)),
            None => {
                let from = self.selected.ok_or(SelectionError::NoSourceSelected)?;
                let regime = self.regime(self.current);
                if !is_legal_destination(&self.board, from, field, regime) {
                    return Err(SelectionError::IllegalDestination { from, to: field });
                }
                self.board.clear(from);
                self.board.set(field, self.current);
                self.selected = None;
                self.emit(GameEvent::BoardChanged(self.board));
                self.resolve_mills();
                Ok(())
            }
        }
    }

    /// Owe one capture per newly closed mill, or hand over the turn.
    fn resolve_mills(&mut self) {
        let diff = mill_difference(self.last_turn_mills, &self.board);
        self.last_turn_mills = diff.current;
        let opponent_pawns = self.board.count(self.current.opponent());
        let owed = diff.newly_closed.len().min(opponent_pawns);
        if owed > 0 {
            log::debug!("{} closed {} mill(s)", self.current, owed);
            self.pawns_to_remove = owed;
        } else {
            self.switch_player();
        }
    }

    fn switch_player(&mut self) {
        self.current = self.current.opponent();
        self.selected = None;
        self.emit(GameEvent::TurnChanged(self.current));
    }

    fn update_phase(&mut self) {
        if self.phase == Phase::PlacingPawns
            && Phase::of(&self.first, &self.second) == Phase::NormalPlay
        {
            log::debug!("all pawns placed, entering normal play");
            self.phase = Phase::NormalPlay;
        }
    }

    fn check_winner(&mut self) {
        if self.winner.is_some() || self.pawns_to_remove > 0 || self.phase != Phase::NormalPlay {
            return;
        }
        if let Some(winner) = decide_winner(&self.board, &self.first, &self.second, self.current) {
            log::debug!("{winner} wins");
            self.winner = Some(winner);
            self.emit(GameEvent::GameFinished(winner));
        }
    }

    fn regime(&self, player: Player) -> MoveRegime {
        MoveRegime::for_player(self.phase, self.player(player).on_board)
    }

    /// Fields the next click may usefully target, for highlighting.
    ///
    /// Removable pawns while a capture is owed, empty fields during
    /// placement, and the destinations of the selected pawn during normal
    /// play (nothing until a pawn is selected).
    pub fn current_possible_move_indices(&self) -> Vec<Pos> {
        if self.winner.is_some() {
            return Vec::new();
        }
        if self.pawns_to_remove > 0 {
            return self.board.fields_owned_by(self.current.opponent());
        }
        match (self.phase, self.selected) {
            (Phase::PlacingPawns, _) => self.board.empty_fields(),
            (Phase::NormalPlay, Some(from)) => {
                destinations(&self.board, from, self.regime(self.current))
            }
            (Phase::NormalPlay, None) => Vec::new(),
        }
    }

    /// Snapshot of the live game for the search.
    pub fn current_game_state(&self) -> GameState {
        GameState {
            board: self.board,
            first: self.first,
            second: self.second,
            to_move: self.current,
            winner: self.winner,
        }
    }

    /// Every state `player` can reach from `state` in one complete turn.
    pub fn all_possible_next_states(player: Player, state: &GameState) -> Vec<GameState> {
        state.next_states_for(player)
    }

    /// Install a state chosen by the search as the new live game.
    pub fn commit_move(&mut self, state: GameState) -> Result<(), CommitError> {
        if self.winner.is_some() {
            return Err(CommitError::GameFinished);
        }
        if self.pawns_to_remove > 0 {
            return Err(CommitError::RemovalPending);
        }
        if !self.current_game_state().next_states().contains(&state) {
            return Err(CommitError::NotASuccessor);
        }

        self.board = state.board;
        self.first = state.first;
        self.second = state.second;
        self.selected = None;
        self.last_turn_mills = active_mills(&self.board);
        self.emit(GameEvent::BoardChanged(self.board));
        if state.to_move != self.current {
            self.switch_player();
        }
        self.update_phase();
        self.check_winner();
        Ok(())
    }
}
