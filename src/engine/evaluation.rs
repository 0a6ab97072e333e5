use crate::{
    score::Score,
    state::{GameState, Side},
};

/// Scores `state` from the maximizing side's perspective
///
/// Only finished games are scored: an unfinished position is worth exactly [`Score::DRAW`],
/// however favorable it looks.
pub fn evaluate(state: &GameState) -> Score {
    if !state.is_game_over() {
        return Score::DRAW;
    }

    match state.winner() {
        Some(Side::Maximizing) => Score::WIN,
        Some(Side::Minimizing) => Score::LOSS,
        None => Score::DRAW,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::{Board, Position},
        piece::Piece,
        state::{AiMove, Move},
    };

    fn piece(value: u8) -> Piece {
        Piece::new(value).unwrap()
    }

    fn place(state: GameState, value: u8, row: u8, col: u8) -> GameState {
        state.apply_move(AiMove::place(Move::new(
            piece(value),
            Position::new(row, col).unwrap(),
        )))
    }

    #[test]
    fn column_win_for_maximizing_side() {
        let state = GameState::new(
            Board::from_values([
                [0, 2, 13, -1],
                [5, 1, 14, -1],
                [-1, -1, -1, -1],
                [4, -1, -1, -1],
            ]),
            Some(piece(6)),
        );
        assert_eq!(evaluate(&place(state, 6, 2, 0)), Score::WIN);
    }

    #[test]
    fn diagonal_win_for_maximizing_side() {
        let state = GameState::new(
            Board::from_values([
                [0, 2, 12, -1],
                [-1, 1, -1, -1],
                [-1, -1, 3, -1],
                [-1, -1, -1, -1],
            ]),
            Some(piece(4)),
        );
        assert_eq!(evaluate(&place(state, 4, 3, 3)), Score::WIN);
    }

    #[test]
    fn diagonal_win_for_minimizing_side() {
        let state = GameState::new(
            Board::from_values([
                [0, 2, -1, -1],
                [-1, 1, -1, -1],
                [-1, -1, 4, -1],
                [-1, -1, -1, -1],
            ]),
            Some(piece(12)),
        );
        assert_eq!(evaluate(&place(state, 12, 3, 3)), Score::LOSS);
    }

    #[test]
    fn no_completed_line_scores_zero() {
        let state = GameState::new(
            Board::from_values([
                [0, 2, -1, 12],
                [-1, 1, -1, -1],
                [-1, -1, 4, -1],
                [9, -1, -1, -1],
            ]),
            Some(piece(15)),
        );
        assert_eq!(evaluate(&place(state, 15, 0, 2)), Score::DRAW);
    }

    #[test]
    fn unfinished_position_is_never_estimated() {
        // The top row already shares an attribute across three pieces
        let state = GameState::new(
            Board::from_values([
                [0, 2, 12, -1],
                [11, 1, -1, -1],
                [-1, -1, 4, -1],
                [15, -1, -1, -1],
            ]),
            Some(piece(3)),
        );
        assert!(!state.is_game_over());
        assert_eq!(evaluate(&state), Score::DRAW);
    }
}
