//! Mill detection.
//!
//! A mill is identified by its index into [`MILLS`]. Sets of mills are kept
//! as a 16-bit mask, so comparing the mills active before and after a move is
//! a single bit operation.

use crate::board::{Board, Player};
use crate::constants::{MILLS, MILL_COUNT};

/// A set of mills, identified by their index into [`MILLS`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MillSet(u16);

impl MillSet {
    pub const EMPTY: MillSet = MillSet(0);

    #[inline]
    pub fn insert(&mut self, mill: usize) {
        self.0 |= 1 << mill;
    }

    #[inline]
    pub fn contains(&self, mill: usize) -> bool {
        self.0 & (1 << mill) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Mills in `self` that are not in `other`.
    #[inline]
    pub fn difference(&self, other: MillSet) -> MillSet {
        MillSet(self.0 & !other.0)
    }

    #[inline]
    pub fn is_subset(&self, other: MillSet) -> bool {
        self.difference(other).is_empty()
    }

    /// Mill indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MILL_COUNT).filter(move |&m| self.contains(m))
    }
}

/// Result of comparing the active mills against a previous baseline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MillDifference {
    /// Mills active on the board now.
    pub current: MillSet,
    /// Mills active now that were not in the baseline. Each one owes a capture.
    pub newly_closed: MillSet,
}

/// Owner of a mill if all three of its fields belong to the same player.
#[inline]
pub fn mill_owner(board: &Board, mill: usize) -> Option<Player> {
    let [a, b, c] = MILLS[mill];
    let owner = board.get(a)?;
    (board.get(b) == Some(owner) && board.get(c) == Some(owner)).then_some(owner)
}

/// All mills currently closed on the board, by either player.
pub fn active_mills(board: &Board) -> MillSet {
    let mut set = MillSet::EMPTY;
    for mill in 0..MILL_COUNT {
        if mill_owner(board, mill).is_some() {
            set.insert(mill);
        }
    }
    set
}

/// Active mills owned by `player`.
pub fn mills_of(board: &Board, player: Player) -> MillSet {
    let mut set = MillSet::EMPTY;
    for mill in 0..MILL_COUNT {
        if mill_owner(board, mill) == Some(player) {
            set.insert(mill);
        }
    }
    set
}

/// Compare the board's active mills against `previous`.
pub fn mill_difference(previous: MillSet, board: &Board) -> MillDifference {
    let current = active_mills(board);
    MillDifference {
        current,
        newly_closed: current.difference(previous),
    }
}
