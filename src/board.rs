//! The 4x4 board and win detection

use std::fmt;

use crate::piece::{Piece, PieceSet};

/// Width and height of the board
pub const BOARD_SIZE: usize = 4;

/// A cell on the board, `(row, col)` with both in `0..4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Creates a position, if both coordinates are on the board
    pub fn new(row: u8, col: u8) -> Option<Self> {
        ((row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE).then_some(Self { row, col })
    }

    /// Row-major index of this cell, in `0..16`
    #[inline]
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// Every cell, in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE as u8).flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Self { row, col }))
    }
}

impl fmt::Display for Position {
    /// Writes the algebraic square, e.g. `a1` for the top-left cell
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, (b'1' + self.row) as char)
    }
}

const fn pos(row: u8, col: u8) -> Position {
    Position { row, col }
}

/// The 10 scoring lines: 4 rows, 4 columns, the main diagonal and the anti-diagonal
pub const LINES: [[Position; 4]; 10] = [
    [pos(0, 0), pos(0, 1), pos(0, 2), pos(0, 3)],
    [pos(1, 0), pos(1, 1), pos(1, 2), pos(1, 3)],
    [pos(2, 0), pos(2, 1), pos(2, 2), pos(2, 3)],
    [pos(3, 0), pos(3, 1), pos(3, 2), pos(3, 3)],
    [pos(0, 0), pos(1, 0), pos(2, 0), pos(3, 0)],
    [pos(0, 1), pos(1, 1), pos(2, 1), pos(3, 1)],
    [pos(0, 2), pos(1, 2), pos(2, 2), pos(3, 2)],
    [pos(0, 3), pos(1, 3), pos(2, 3), pos(3, 3)],
    [pos(0, 0), pos(1, 1), pos(2, 2), pos(3, 3)],
    [pos(0, 3), pos(1, 2), pos(2, 1), pos(3, 0)],
];

/// A 4x4 grid of cells, each either empty or holding one piece
///
/// This is a plain value: copying it is cheap, and every transition writes to a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// The empty board
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a board from raw cell values, where anything outside `0..16` (e.g. `-1`) is empty
    pub fn from_values(values: [[i8; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut board = Self::empty();
        for position in Position::all() {
            let value = values[position.row as usize][position.col as usize];
            board.cells[position.row as usize][position.col as usize] =
                u8::try_from(value).ok().and_then(Piece::new);
        }
        board
    }

    #[inline]
    pub fn get(&self, position: Position) -> Option<Piece> {
        self.cells[position.row as usize][position.col as usize]
    }

    #[inline]
    pub fn set(&mut self, position: Position, piece: Option<Piece>) {
        self.cells[position.row as usize][position.col as usize] = piece;
    }

    #[inline]
    pub fn is_empty_at(&self, position: Position) -> bool {
        self.get(position).is_none()
    }

    /// Empty cells, in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(|&position| self.is_empty_at(position))
    }

    /// Occupied cells with their pieces, in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|position| self.get(position).map(|piece| (position, piece)))
    }

    /// The set of pieces on the board
    pub fn placed(&self) -> PieceSet {
        self.occupied().map(|(_, piece)| piece).collect()
    }

    /// Whether any of the 10 lines is full and shares at least one attribute
    pub fn check_win(&self) -> bool {
        LINES.iter().any(|line| self.line_wins(line))
    }

    /// Whether this single line is full and all 4 pieces agree on an attribute
    pub fn line_wins(&self, line: &[Position; 4]) -> bool {
        let mut pieces = [Piece::ALL[0]; 4];
        for (slot, &position) in pieces.iter_mut().zip(line) {
            match self.get(position) {
                Some(piece) => *slot = piece,
                None => return false,
            }
        }

        // An attribute is shared if its bit is set in all four, or clear in all four
        let all_set = pieces.iter().fold(0b1111, |acc, p| acc & p.value());
        let any_set = pieces.iter().fold(0, |acc, p| acc | p.value());
        all_set != 0 || any_set != 0b1111
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter() {
            for cell in row {
                match cell {
                    Some(piece) => write!(f, "[{:>2}]", piece.value())?,
                    None => write!(f, "[  ]")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
