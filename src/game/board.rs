//! Board representation for Ataxx.
//!
//! A board is a 7x7 grid of signed occupancy values plus the jump counter
//! that drives the stalemate rule. The whole state is a small `Copy` value
//! deriving `Hash`/`Eq`, so a canonical board is directly usable as a
//! transposition-table key: two boards with identical cells and counter
//! compare and hash identically.

use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Side length of the board.
pub const SIDE: usize = 7;

/// Total number of cells.
pub const CELLS: usize = SIDE * SIDE;

/// Number of consecutive jump moves after which the game is scored.
pub const JUMP_LIMIT: u8 = 25;

/// One of the two sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Blue,
}

impl Player {
    /// Occupancy sign of this player's pieces: +1 for Red, -1 for Blue.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Player::Red => 1,
            Player::Blue => -1,
        }
    }

    /// The other side.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }
}

/// A board coordinate, column-major to match move notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    pub col: u8,
    pub row: u8,
}

impl Square {
    /// Create a square. Both coordinates must be below `SIDE`.
    #[must_use]
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.row as usize * SIDE + self.col as usize
    }

    /// Chebyshev distance to another square.
    #[must_use]
    pub fn chebyshev(self, other: Square) -> u8 {
        let dc = self.col.abs_diff(other.col);
        let dr = self.row.abs_diff(other.row);
        dc.max(dr)
    }
}

/// An Ataxx position: cell occupancy plus the jump counter.
///
/// Cells hold `+1` (Red), `-1` (Blue), or `0` (empty). The counter
/// increments on jump moves and resets on clone moves; it is unchanged by
/// canonicalization. Boards are treated as immutable values; only the
/// rules engine produces new ones.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [i8; CELLS],
    jumps: u8,
}

impl Board {
    /// An empty board with a zeroed jump counter.
    pub(crate) const fn empty() -> Self {
        Self {
            cells: [0; CELLS],
            jumps: 0,
        }
    }

    /// Build a board from raw cell contents and a jump counter.
    ///
    /// Intended for tests and position setup; regular play goes through
    /// the rules engine.
    #[must_use]
    pub const fn from_parts(cells: [i8; CELLS], jumps: u8) -> Self {
        Self { cells, jumps }
    }

    /// Occupancy at a square: +1 Red, -1 Blue, 0 empty.
    #[inline]
    #[must_use]
    pub fn get(&self, sq: Square) -> i8 {
        self.cells[sq.index()]
    }

    #[inline]
    pub(crate) fn set(&mut self, sq: Square, piece: i8) {
        self.cells[sq.index()] = piece;
    }

    /// Current jump-counter value.
    #[inline]
    #[must_use]
    pub fn jumps(&self) -> u8 {
        self.jumps
    }

    pub(crate) fn reset_jumps(&mut self) {
        self.jumps = 0;
    }

    pub(crate) fn bump_jumps(&mut self) {
        self.jumps += 1;
    }

    /// Piece counts as `(red, blue)`.
    #[must_use]
    pub fn piece_counts(&self) -> (u32, u32) {
        let mut red = 0;
        let mut blue = 0;
        for &cell in &self.cells {
            if cell > 0 {
                red += 1;
            } else if cell < 0 {
                blue += 1;
            }
        }
        (red, blue)
    }

    /// Total number of occupied cells.
    #[must_use]
    pub fn occupancy(&self) -> u32 {
        let (red, blue) = self.piece_counts();
        red + blue
    }

    /// Flip the sign of every cell, leaving the jump counter unchanged.
    #[must_use]
    pub(crate) fn negated(&self) -> Self {
        let mut flipped = *self;
        for cell in &mut flipped.cells {
            *cell = -*cell;
        }
        flipped
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..SIDE).rev() {
            for col in 0..SIDE {
                let piece = self.get(Square::new(col as u8, row as u8));
                let glyph = match piece {
                    1 => 'R',
                    -1 => 'B',
                    _ => '.',
                };
                write!(f, "{glyph} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board(jumps={})", self.jumps)?;
        fmt::Display::fmt(self, f)
    }
}

// Manual serde: serde does not derive Deserialize for 49-element arrays,
// so the board travels as (cells, jumps).
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.cells[..], self.jumps).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (cells, jumps): (Vec<i8>, u8) = Deserialize::deserialize(deserializer)?;
        let cells: [i8; CELLS] = cells
            .try_into()
            .map_err(|v: Vec<i8>| D::Error::custom(format!("expected {CELLS} cells, got {}", v.len())))?;
        Ok(Self { cells, jumps })
    }
}
