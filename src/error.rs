//! Error types for position setup, notation, and the text protocol
//!
//! The search itself never fails; everything here is raised while validating
//! input before a search is started.

use thiserror::Error;

use crate::{board::Position, piece::Piece};

/// Errors that can occur while building a position or parsing input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuartoError {
    /// Piece notation that is not four valid attribute letters
    #[error("Invalid piece notation: {0}")]
    InvalidPiece(String),

    /// Square notation outside `a1`..`d4`
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// Move notation that is not `<piece>-<position>`
    #[error("Invalid move notation: {0}")]
    InvalidMove(String),

    /// A move targets a cell that already holds a piece
    #[error("Cannot place {piece} on {position}: cell is occupied")]
    Occupied { position: Position, piece: Piece },

    /// A piece that is on the board or already selected
    #[error("Piece {piece} is not available")]
    Unavailable { piece: Piece },

    /// Search depth outside the supported range
    #[error("Depth must be between 1 and {max}, got {depth}")]
    InvalidDepth { depth: u8, max: u8 },

    /// A protocol line that could not be understood
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// Result type alias for fallible setup and parsing operations
pub type QuartoResult<T> = Result<T, QuartoError>;
