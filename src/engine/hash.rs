//! Canonical keys for game states
//!
//! A state is fully determined by its board and selected piece,
//! so packing those two into a key gives one key per reachable state.

use std::fmt;

use crate::{piece::Piece, state::GameState};

/// Key identifying a [`GameState`] in the transposition table
///
/// - `pieces` holds each occupied cell's value in 4 bits, shifted by `4 * index`
/// - `occupied` has bit `index` set for each occupied cell,
///   so that piece 0 is told apart from an empty cell
/// - `selected` is the piece to place next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    pieces: u64,
    occupied: u16,
    selected: Option<Piece>,
}

impl StateKey {
    pub fn new(state: &GameState) -> Self {
        let mut pieces = 0u64;
        let mut occupied = 0u16;

        for (position, piece) in state.board().occupied() {
            let index = position.index();
            pieces |= (piece.value() as u64) << (4 * index);
            occupied |= 1 << index;
        }

        Self {
            pieces,
            occupied,
            selected: state.selected(),
        }
    }
}

impl fmt::Display for StateKey {
    /// `{pieces:016x}-{occupied:04x}-{selected}`, with `-1` when nothing is selected
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}-{:04x}-", self.pieces, self.occupied)?;
        match self.selected {
            Some(piece) => write!(f, "{}", piece.value()),
            None => write!(f, "-1"),
        }
    }
}
