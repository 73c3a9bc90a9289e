use std::fmt;

use crate::constants::{
    ADJACENT, EMPTY_SYMBOL, FIELD_COUNT, FIELD_NAMES, FIRST_SYMBOL, SECOND_SYMBOL,
};

/// A field on the board, as an index in `0..FIELD_COUNT`.
pub type Pos = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::First, Player::Second];

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::First => FIRST_SYMBOL,
            Player::Second => SECOND_SYMBOL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::First => "First",
            Player::Second => "Second",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The 24 fields of the board and who owns each of them.
///
/// `Board` is `Copy`: every snapshot owns its fields outright, so a copy
/// handed to the search never aliases the live game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    fields: [Option<Player>; FIELD_COUNT],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board with the given fields owned by each player.
    pub fn with_pawns(first: &[Pos], second: &[Pos]) -> Self {
        let mut board = Self::new();
        for &pos in first {
            board.set(pos, Player::First);
        }
        for &pos in second {
            board.set(pos, Player::Second);
        }
        board
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Player> {
        self.fields[pos]
    }

    #[inline]
    pub fn set(&mut self, pos: Pos, player: Player) {
        self.fields[pos] = Some(player);
    }

    #[inline]
    pub fn clear(&mut self, pos: Pos) {
        self.fields[pos] = None;
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.fields[pos].is_none()
    }

    /// Fields owned by `player`, in ascending order.
    pub fn fields_owned_by(&self, player: Player) -> Vec<Pos> {
        (0..FIELD_COUNT)
            .filter(|&pos| self.fields[pos] == Some(player))
            .collect()
    }

    /// Empty fields, in ascending order.
    pub fn empty_fields(&self) -> Vec<Pos> {
        (0..FIELD_COUNT).filter(|&pos| self.is_empty(pos)).collect()
    }

    /// Number of pawns `player` has on the board.
    pub fn count(&self, player: Player) -> usize {
        self.fields.iter().filter(|&&f| f == Some(player)).count()
    }
}

/// Parse a field given either by name (e.g. "D2", case-insensitive) or by index.
pub fn parse_field(s: &str) -> Option<Pos> {
    let s = s.trim();
    if let Ok(idx) = s.parse::<usize>() {
        return (idx < FIELD_COUNT).then_some(idx);
    }
    FIELD_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(s))
}

/// Name of a field (e.g. "D2"), or "--" for an index off the board.
pub fn field_name(pos: Pos) -> &'static str {
    FIELD_NAMES.get(pos).copied().unwrap_or("--")
}

/// Cell of a field in the 13x13 text grid (two characters per column/row).
fn grid_coord(pos: Pos) -> (usize, usize) {
    let name = FIELD_NAMES[pos].as_bytes();
    (
        (name[0] - b'A') as usize * 2,
        (name[1] - b'1') as usize * 2,
    )
}

const GRID: usize = 13;

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut grid = [[' '; GRID]; GRID];
        for a in 0..FIELD_COUNT {
            let (ax, ay) = grid_coord(a);
            grid[ay][ax] = self.fields[a].map_or(EMPTY_SYMBOL, Player::symbol);
            // Draw each connection once, from its lower-numbered end.
            for &b in ADJACENT[a].iter().filter(|&&b| b > a) {
                let (bx, by) = grid_coord(b);
                if ay == by {
                    for cell in &mut grid[ay][ax + 1..bx] {
                        *cell = '-';
                    }
                } else {
                    for row in &mut grid[ay + 1..by] {
                        row[ax] = '|';
                    }
                }
            }
        }

        for y in (0..GRID).rev() {
            let label = if y % 2 == 0 {
                char::from(b'1' + (y / 2) as u8)
            } else {
                ' '
            };
            let line: String = grid[y].iter().collect();
            writeln!(f, "{label} {}", line.trim_end())?;
        }
        writeln!(f, "  A B C D E F G")
    }
}
