//! A Quarto solver: minimax with alpha-beta pruning over (placement, handoff) plies,
//! backed by a per-search transposition table.

pub mod board;
pub mod engine;
pub mod error;
pub mod notation;
pub mod piece;
pub mod protocol;
pub mod score;
pub mod state;
