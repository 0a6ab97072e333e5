//! Game state, move generation, and state transitions
//!
//! A [`GameState`] is fully determined by its board and its selected piece.
//! The available pieces are always derived from those two, never stored,
//! and the side to move is derived from the parity of the available count.

use std::fmt;

use log::debug;

use crate::{
    board::{Board, Position},
    error::{QuartoError, QuartoResult},
    piece::{Piece, PieceSet},
};

/// Place `piece` on `position`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: Piece,
    pub position: Position,
}

impl Move {
    pub fn new(piece: Piece, position: Position) -> Self {
        Self { piece, position }
    }
}

impl fmt::Display for Move {
    /// Writes the move in transport notation, e.g. `BCGP-a1`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.piece, self.position)
    }
}

/// One ply: an optional placement, then the piece handed to the opponent
///
/// Every move produced by [`GameState::valid_moves`] has both halves.
/// A selection-only move is used for the very first ply of a game,
/// and a placement-only move is used when replaying a history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AiMove {
    pub placement: Option<Move>,
    pub handoff: Option<Piece>,
}

impl AiMove {
    /// Place a piece, then hand `handoff` to the opponent
    pub fn new(placement: Move, handoff: Piece) -> Self {
        Self {
            placement: Some(placement),
            handoff: Some(handoff),
        }
    }

    /// Place a piece without selecting one for the opponent
    pub fn place(placement: Move) -> Self {
        Self {
            placement: Some(placement),
            handoff: None,
        }
    }

    /// Only select a piece for the opponent
    pub fn select(handoff: Piece) -> Self {
        Self {
            placement: None,
            handoff: Some(handoff),
        }
    }
}

/// The two sides of a game, named by how the search treats them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Moves when an even number of pieces are available
    Maximizing,
    /// Moves when an odd number of pieces are available
    Minimizing,
}

impl Side {
    /// The side that moves when `available` pieces remain
    #[inline]
    pub fn from_parity(available: usize) -> Self {
        if available % 2 == 0 {
            Side::Maximizing
        } else {
            Side::Minimizing
        }
    }

    /// `+1` for the maximizing side, `-1` for the minimizing side
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Side::Maximizing => 1,
            Side::Minimizing => -1,
        }
    }

    pub fn is_maximizing(self) -> bool {
        self == Side::Maximizing
    }
}

/// A position in the game, plus whether (and by whom) it has been won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    board: Board,
    selected: Option<Piece>,
    game_over: bool,
    winner: Option<Side>,
}

impl GameState {
    /// An ongoing position with the given board and selected piece
    pub fn new(board: Board, selected: Option<Piece>) -> Self {
        Self {
            board,
            selected,
            game_over: false,
            winner: None,
        }
    }

    /// The start of a game: empty board, nothing selected, all 16 pieces available
    pub fn initial() -> Self {
        Self::default()
    }

    /// Replays `moves` from the initial state
    ///
    /// Each move places its own piece and hands nothing over,
    /// so the resulting state has no selected piece.
    /// Errors if a move targets an occupied cell, or places a piece that is already on the board.
    pub fn from_history(moves: &[Move]) -> QuartoResult<Self> {
        let mut state = Self::initial();

        for &mv in moves {
            if !state.board.is_empty_at(mv.position) {
                return Err(QuartoError::Occupied {
                    position: mv.position,
                    piece: mv.piece,
                });
            }
            if !state.available_pieces().contains(mv.piece) {
                return Err(QuartoError::Unavailable { piece: mv.piece });
            }

            state.selected = Some(mv.piece);
            state = state.apply_move(AiMove::place(mv));

            debug!(
                "Replayed {mv}, {} pieces available\n{}",
                state.available_pieces().len(),
                state.board
            );
        }

        Ok(state)
    }

    /// Returns a copy of `self` with `piece` selected for placement
    ///
    /// Errors if `piece` is not currently available.
    pub fn with_selected(&self, piece: Piece) -> QuartoResult<Self> {
        if !self.available_pieces().contains(piece) {
            return Err(QuartoError::Unavailable { piece });
        }

        Ok(Self {
            selected: Some(piece),
            ..*self
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The piece that must be placed next, if one has been selected
    #[inline]
    pub fn selected(&self) -> Option<Piece> {
        self.selected
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[inline]
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// `+1`, `-1`, or `0` when there is no winner
    pub fn winner_sign(&self) -> i8 {
        self.winner.map(Side::sign).unwrap_or_default()
    }

    /// Every piece that is neither on the board nor selected
    pub fn available_pieces(&self) -> PieceSet {
        let mut available = PieceSet::FULL;
        for (_, piece) in self.board.occupied() {
            available.remove(piece);
        }
        if let Some(selected) = self.selected {
            available.remove(selected);
        }
        available
    }

    /// The side to move, derived from the parity of the available count
    pub fn side_to_move(&self) -> Side {
        Side::from_parity(self.available_pieces().len())
    }

    /// Every (placement, handoff) pair for the selected piece
    ///
    /// Empty cells are visited in row-major order, handoff pieces in ascending order.
    /// Nothing is generated if no piece is selected, or if no piece is left to hand over.
    pub fn valid_moves(&self) -> Vec<AiMove> {
        let Some(selected) = self.selected else {
            return Vec::new();
        };

        let handoffs = self.available_pieces().without(selected);
        let mut moves = Vec::with_capacity(16 * handoffs.len());
        for position in self.board.empty_cells() {
            let placement = Move::new(selected, position);
            moves.extend(handoffs.iter().map(|handoff| AiMove::new(placement, handoff)));
        }
        moves
    }

    /// Returns the state reached by playing `mv`; `self` is left untouched
    ///
    /// A placement that completes a line wins for the side that made it.
    /// The game also ends when no pieces were available before the placement.
    /// The handed-over piece becomes the next selected piece.
    pub fn apply_move(&self, mv: AiMove) -> Self {
        let mut next = *self;

        if let Some(placement) = mv.placement {
            let remaining = self.available_pieces().len();
            next.board.set(placement.position, Some(placement.piece));

            let won = next.board.check_win();
            if won || remaining == 0 {
                next.game_over = true;
                if won {
                    next.winner = Some(Side::from_parity(remaining));
                }
            }
        }

        next.selected = mv.handoff;
        next
    }
}
