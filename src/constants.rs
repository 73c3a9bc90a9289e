//! Board topology, rule constants, and engine parameters.
//!
//! The board has 24 fields arranged on three concentric squares joined by
//! four spokes. Fields are numbered row by row from the bottom-left corner:
//!
//! ```text
//! 7  21----------22----------23
//!    |           |           |
//! 6  |   18------19------20  |
//!    |   |       |       |   |
//! 5  |   |   15--16--17  |   |
//!    |   |   |       |   |   |
//! 4  9---10--11      12--13--14
//!    |   |   |       |   |   |
//! 3  |   |   6---7---8   |   |
//!    |   |       |       |   |
//! 2  |   3-------4-------5   |
//!    |           |           |
//! 1  0-----------1-----------2
//!    A   B   C   D   E   F   G
//! ```
//!
//! All tables here are process-wide constants shared by every game.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of fields on the board.
pub const FIELD_COUNT: usize = 24;

/// Number of distinct mills (8 along the squares, 8 across the spokes).
pub const MILL_COUNT: usize = 16;

/// The 16 mills, each a line of three fields.
pub const MILLS: [[usize; 3]; MILL_COUNT] = [
    // Horizontal lines
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [9, 10, 11],
    [12, 13, 14],
    [15, 16, 17],
    [18, 19, 20],
    [21, 22, 23],
    // Vertical lines
    [0, 9, 21],
    [3, 10, 18],
    [6, 11, 15],
    [1, 4, 7],
    [16, 19, 22],
    [8, 12, 17],
    [5, 13, 20],
    [2, 14, 23],
];

/// Neighbors of each field for non-flying moves, in ascending order.
pub const ADJACENT: [&[usize]; FIELD_COUNT] = [
    &[1, 9],           // 0  A1
    &[0, 2, 4],        // 1  D1
    &[1, 14],          // 2  G1
    &[4, 10],          // 3  B2
    &[1, 3, 5, 7],     // 4  D2
    &[4, 13],          // 5  F2
    &[7, 11],          // 6  C3
    &[4, 6, 8],        // 7  D3
    &[7, 12],          // 8  E3
    &[0, 10, 21],      // 9  A4
    &[3, 9, 11, 18],   // 10 B4
    &[6, 10, 15],      // 11 C4
    &[8, 13, 17],      // 12 E4
    &[5, 12, 14, 20],  // 13 F4
    &[2, 13, 23],      // 14 G4
    &[11, 16],         // 15 C5
    &[15, 17, 19],     // 16 D5
    &[12, 16],         // 17 E5
    &[10, 19],         // 18 B6
    &[16, 18, 20, 22], // 19 D6
    &[13, 19],         // 20 F6
    &[9, 22],          // 21 A7
    &[19, 21, 23],     // 22 D7
    &[14, 22],         // 23 G7
];

/// Human-readable field names, indexed by field.
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "A1", "D1", "G1", "B2", "D2", "F2", "C3", "D3", "E3", "A4", "B4", "C4", "E4", "F4", "G4",
    "C5", "D5", "E5", "B6", "D6", "F6", "A7", "D7", "G7",
];

// =============================================================================
// Rules
// =============================================================================

/// Pawns each player places during the placement phase.
pub const PLAYER_PAWNS: usize = 9;

/// A player with this many pawns on the board (or fewer) may fly.
pub const FLYING_PAWNS: usize = 3;

/// A player with this many pawns on the board (or fewer) has lost.
pub const LOSING_PAWNS: usize = 2;

// =============================================================================
// Heuristic Weights
// =============================================================================

/// Bonus (or penalty) applied once a winner is decided.
pub const WINNING_WEIGHT: f64 = 100.0;

/// Weight of one active mill in the mill-count heuristic.
pub const DEFAULT_MILL_WEIGHT: f64 = 18.0;

/// Heavier mill weight from the later tuning.
pub const CLOSED_MILL_WEIGHT: f64 = 26.0;

/// Weight of one legal move in the mobility heuristic.
pub const MOBILITY_WEIGHT: f64 = 1.0;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default search depth, in full rounds (one move by each player).
pub const DEFAULT_SEARCH_DEPTH: usize = 2;

/// Deepest configurable search, in full rounds.
pub const MAX_SEARCH_DEPTH: usize = 8;

/// Plies per configured search round.
pub const PLIES_PER_ROUND: usize = 2;

// =============================================================================
// Display Symbols
// =============================================================================

/// First player's pawn.
pub const FIRST_SYMBOL: char = 'X';

/// Second player's pawn.
pub const SECOND_SYMBOL: char = 'O';

/// Empty field.
pub const EMPTY_SYMBOL: char = '.';
