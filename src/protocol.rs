//! A line-based text protocol for driving an [`Engine`](crate::engine::Engine)
//!
//! Commands, one per line:
//! - `isready`: answered with `readyok`
//! - `newgame`: forget the current game
//! - `debug on|off`: print an `info` line before each `bestmove`
//! - `position [moves <move>...]`: replay moves from the empty board
//! - `go [<piece>] [depth <n>]`: search with `piece` as the piece to place
//! - `quit`

use std::{fmt, str::FromStr};

use crate::{
    engine::{SearchResult, SearchStats},
    error::{QuartoError, QuartoResult},
    notation::{parse_move, parse_piece},
    piece::Piece,
    score::Score,
    state::Move,
};

/// A parsed protocol command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    IsReady,
    NewGame,
    Debug(bool),
    Position { moves: Vec<Move> },
    Go { piece: Option<Piece>, depth: Option<u8> },
    Quit,
}

impl FromStr for Command {
    type Err = QuartoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QuartoError::InvalidCommand(s.trim().to_owned());
        let mut tokens = s.split_whitespace();

        let command = match tokens.next().ok_or_else(invalid)? {
            "isready" => Command::IsReady,
            "newgame" => Command::NewGame,
            "quit" => Command::Quit,
            "debug" => match tokens.next() {
                Some("on") => Command::Debug(true),
                Some("off") => Command::Debug(false),
                _ => return Err(invalid()),
            },
            "position" => {
                let moves = match tokens.next() {
                    None => Vec::new(),
                    Some("moves") => tokens
                        .by_ref()
                        .map(parse_move)
                        .collect::<QuartoResult<Vec<Move>>>()?,
                    Some(_) => return Err(invalid()),
                };
                Command::Position { moves }
            }
            "go" => {
                let mut piece = None;
                let mut depth = None;
                while let Some(token) = tokens.next() {
                    if token == "depth" {
                        let value = tokens.next().and_then(|d| d.parse::<u8>().ok());
                        depth = Some(value.ok_or_else(invalid)?);
                    } else if piece.is_none() {
                        piece = Some(parse_piece(token)?);
                    } else {
                        return Err(invalid());
                    }
                }
                Command::Go { piece, depth }
            }
            _ => return Err(invalid()),
        };

        if tokens.next().is_some() {
            return Err(invalid());
        }
        Ok(command)
    }
}

/// A line written back in reply to a [`Command`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    ReadyOk,
    Info {
        depth: u8,
        score: Score,
        stats: SearchStats,
    },
    BestMove(SearchResult),
    Error(String),
}

impl Response {
    /// The `info` line describing a finished search
    pub fn info(result: &SearchResult) -> Self {
        Self::Info {
            depth: result.depth,
            score: result.score,
            stats: result.stats,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::ReadyOk => write!(f, "readyok"),
            Response::Info {
                depth,
                score,
                stats,
            } => write!(
                f,
                "info depth {depth} score {score} nodes {} hits {} misses {} cutoffs {} time {}",
                stats.nodes,
                stats.table_hits,
                stats.table_misses,
                stats.cutoffs,
                stats.elapsed.as_millis()
            ),
            Response::BestMove(result) => {
                let Some(best) = result.best_move() else {
                    return write!(f, "bestmove none");
                };
                let Some(placement) = best.placement else {
                    return match best.handoff {
                        Some(piece) => write!(f, "bestmove select {piece}"),
                        None => write!(f, "bestmove none"),
                    };
                };

                write!(f, "bestmove {placement}")?;
                if let Some(piece) = best.handoff {
                    write!(f, " give {piece}")?;
                }
                write!(f, " score {} pv", result.score)?;
                for placement in result.continuation.iter().filter_map(|mv| mv.placement) {
                    write!(f, " {placement}")?;
                }
                Ok(())
            }
            Response::Error(message) => write!(f, "error {message}"),
        }
    }
}
