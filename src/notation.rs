//! Transport notation for pieces, squares, and moves
//!
//! - A piece is four letters, one per attribute:
//!   color `B`/`N`, shape `C`/`R`, size `G`/`P`, fill `P`/`T`.
//!   Piece 0 is `BCGP` and piece 15 is `NRPT`.
//! - A square is a file `a`..`d` (the column) followed by a rank `1`..`4` (the row),
//!   with `a1` in the top-left corner. Uppercase files are accepted.
//! - A move is `<piece>-<square>`, e.g. `NRPT-c3`.

use std::str::FromStr;

use crate::{
    board::Position,
    error::{QuartoError, QuartoResult},
    piece::Piece,
    state::Move,
};

/// `(letter for 0, letter for 1)` per attribute, in bit order color, shape, size, fill
const LETTERS: [(char, char); 4] = [('B', 'N'), ('C', 'R'), ('G', 'P'), ('P', 'T')];

pub fn piece_to_notation(piece: Piece) -> String {
    piece
        .attributes()
        .into_iter()
        .zip(LETTERS)
        .map(|(bit, (zero, one))| if bit == 0 { zero } else { one })
        .collect()
}

pub fn parse_piece(s: &str) -> QuartoResult<Piece> {
    let invalid = || QuartoError::InvalidPiece(s.to_owned());

    let chars: Vec<char> = s.chars().collect();
    if chars.len() != LETTERS.len() {
        return Err(invalid());
    }

    let mut value = 0u8;
    for (&c, (zero, one)) in chars.iter().zip(LETTERS) {
        let bit = match c.to_ascii_uppercase() {
            c if c == zero => 0,
            c if c == one => 1,
            _ => return Err(invalid()),
        };
        value = value << 1 | bit;
    }

    Piece::new(value).ok_or_else(invalid)
}

pub fn parse_position(s: &str) -> QuartoResult<Position> {
    let invalid = || QuartoError::InvalidPosition(s.to_owned());

    let &[file, rank] = s.as_bytes() else {
        return Err(invalid());
    };
    let file = file.to_ascii_lowercase();
    if !(b'a'..=b'd').contains(&file) || !(b'1'..=b'4').contains(&rank) {
        return Err(invalid());
    }

    Position::new(rank - b'1', file - b'a').ok_or_else(invalid)
}

pub fn parse_move(s: &str) -> QuartoResult<Move> {
    let (piece, position) = s
        .split_once('-')
        .ok_or_else(|| QuartoError::InvalidMove(s.to_owned()))?;

    Ok(Move::new(parse_piece(piece)?, parse_position(position)?))
}

impl FromStr for Piece {
    type Err = QuartoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_piece(s)
    }
}

impl FromStr for Position {
    type Err = QuartoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_position(s)
    }
}

impl FromStr for Move {
    type Err = QuartoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_move(s)
    }
}
