use std::time::{Duration, Instant};

use evaluation::evaluate;
use hash::StateKey;
use log::{debug, info, trace};
use transposition::{Bound, TablePolicy, TranspositionTable};

use crate::{
    error::{QuartoError, QuartoResult},
    piece::{PIECE_COUNT, Piece},
    score::Score,
    state::{AiMove, GameState, Move},
};

pub mod evaluation;
pub mod hash;
pub mod transposition;

/// Search depth used when none is configured: enough to reach the end of any game
pub const DEFAULT_MAX_DEPTH: u8 = 16;

/// Largest depth a caller may request, one ply per piece
pub const MAX_DEPTH: u8 = 16;

/// Histories up to this many moves are searched at [`OPENING_DEPTH`]
const OPENING_HISTORY_LEN: usize = 6;

/// Depth forced for early positions, whatever depth was requested
const OPENING_DEPTH: u8 = 5;

/// Tunable engine parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Depth, in plies, that [`Engine::search`] searches to
    pub max_depth: u8,
    /// How the transposition table reuses stored bounds
    pub table_policy: TablePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            table_policy: TablePolicy::default(),
        }
    }
}

/// Counters collected during one top-level search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered, including table hits
    pub nodes: u64,
    pub table_hits: u64,
    pub table_misses: u64,
    /// Unfinished positions scored because the depth ran out
    pub leaf_evaluations: u64,
    /// Finished positions scored
    pub terminal_evaluations: u64,
    /// Alpha-beta cutoffs
    pub cutoffs: u64,
    pub elapsed: Duration,
}

impl SearchStats {
    /// Adds the counters of `other` into `self`
    pub fn merge(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.table_hits += other.table_hits;
        self.table_misses += other.table_misses;
        self.leaf_evaluations += other.leaf_evaluations;
        self.terminal_evaluations += other.terminal_evaluations;
        self.cutoffs += other.cutoffs;
        self.elapsed += other.elapsed;
    }
}

/// Return value of [`Engine::search`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Score of the position, from the maximizing side's perspective
    pub score: Score,
    /// The principal variation, starting with the move to play now
    pub continuation: Vec<AiMove>,
    /// The depth the search was configured to reach
    ///
    /// Zero when nothing was searched.
    pub depth: u8,
    pub stats: SearchStats,
}

impl SearchResult {
    /// The move to play now, if any
    pub fn best_move(&self) -> Option<AiMove> {
        self.continuation.first().copied()
    }

    /// The piece to hand the opponent for their next turn, if any
    pub fn suggested_piece(&self) -> Option<Piece> {
        self.best_move().and_then(|mv| mv.handoff)
    }
}

/// Minimax search with alpha-beta pruning and a transposition table
///
/// The engine also holds the current position, as set up by [`Engine::set_position`].
/// Each engine owns its table: run concurrent searches on separate engines.
#[derive(Debug, Default)]
pub struct Engine {
    debug: bool,
    config: EngineConfig,

    state: GameState,
    history_len: usize,

    table: TranspositionTable,
    stats: SearchStats,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            table: TranspositionTable::new(config.table_policy),
            ..Default::default()
        }
    }

    /// An engine with the default config, searching to `max_depth`
    pub fn with_depth(max_depth: u8) -> Self {
        Self::new(EngineConfig {
            max_depth,
            ..Default::default()
        })
    }

    /// Sets the debug flag
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Whether debugging is enabled
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resets the internal state for a new game
    ///
    /// Resets everything except the [`Engine::debug()`] flag and the config
    pub fn reset_game(&mut self) {
        *self = Self {
            debug: self.debug,
            ..Self::new(self.config)
        };
    }

    /// Sets the position by replaying `moves` from the empty board
    ///
    /// On error the previous position is kept.
    pub fn set_position(&mut self, moves: impl IntoIterator<Item = Move>) -> QuartoResult<()> {
        let moves: Vec<Move> = moves.into_iter().collect();
        self.state = GameState::from_history(&moves)?;
        self.history_len = moves.len();

        Ok(())
    }

    /// The position set up by [`Engine::set_position`]
    pub fn position(&self) -> &GameState {
        &self.state
    }

    /// The depth actually searched when `requested` is asked for on the current position
    ///
    /// Early positions are always searched at a fixed, shallower depth.
    pub fn effective_depth(&self, requested: u8) -> u8 {
        if self.history_len <= OPENING_HISTORY_LEN {
            OPENING_DEPTH
        } else {
            requested
        }
    }

    /// Searches the current position with `selected` as the piece to place
    ///
    /// Without `selected`, the position is searched as-is:
    /// on an empty board this picks the opening piece.
    /// Errors if `depth` is outside `1..=16`, or if `selected` is not available.
    pub fn go(&mut self, selected: Option<Piece>, depth: Option<u8>) -> QuartoResult<SearchResult> {
        if let Some(depth) = depth {
            if !(1..=MAX_DEPTH).contains(&depth) {
                return Err(QuartoError::InvalidDepth {
                    depth,
                    max: MAX_DEPTH,
                });
            }
        }
        let depth = self.effective_depth(depth.unwrap_or(self.config.max_depth));

        let state = match selected {
            Some(piece) => self.state.with_selected(piece)?,
            None => self.state,
        };

        Ok(self.search_to_depth(&state, depth))
    }

    /// Searches `state` to the configured depth
    pub fn search(&mut self, state: &GameState) -> SearchResult {
        self.search_to_depth(state, self.config.max_depth)
    }

    /// Searches `state` to `depth` plies
    ///
    /// - With all 16 pieces available, nothing can be placed yet:
    ///   the result only selects the first available piece
    /// - With no piece selected, the result is empty
    /// - Otherwise the table is cleared and the full search runs
    pub fn search_to_depth(&mut self, state: &GameState, depth: u8) -> SearchResult {
        let available = state.available_pieces();
        if available.len() == PIECE_COUNT {
            return SearchResult {
                continuation: available.first().map(AiMove::select).into_iter().collect(),
                ..Default::default()
            };
        }
        let Some(selected) = state.selected() else {
            return SearchResult::default();
        };

        let start_time = Instant::now();
        self.table.clear();
        self.stats = SearchStats::default();

        let maximizing = state.side_to_move().is_maximizing();
        debug!(
            "Starting search: maximizing={maximizing}, available={}, selected={selected}, depth={depth}, policy={:?}",
            available.len(),
            self.table.policy()
        );

        let (score, continuation) =
            self.minimax(state, depth, Score::ALPHA_START, Score::BETA_START, maximizing);

        self.stats.table_hits = self.table.hits();
        self.stats.table_misses = self.table.misses();
        self.stats.elapsed = start_time.elapsed();
        info!(
            "Search done: score={score}, depth={depth}, nodes={}, table hits={} misses={}, {:?}",
            self.stats.nodes, self.stats.table_hits, self.stats.table_misses, self.stats.elapsed
        );

        SearchResult {
            score,
            continuation,
            depth,
            stats: self.stats,
        }
    }

    /// Scores `node` with `depth` plies left, and returns the best continuation found
    ///
    /// Scores are from the maximizing side's perspective, and `maximizing` says who is to move.
    /// Uses fail-hard alpha-beta: the window only narrows, and the loop stops once `beta <= alpha`.
    fn minimax(
        &mut self,
        node: &GameState,
        depth: u8,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> (Score, Vec<AiMove>) {
        self.stats.nodes += 1;

        let key = StateKey::new(node);
        if let Some(entry) = self.table.lookup(&key, depth, alpha, beta) {
            return (entry.score, entry.continuation.clone());
        }

        if node.is_game_over() || depth == 0 {
            if node.is_game_over() {
                self.stats.terminal_evaluations += 1;
            } else {
                self.stats.leaf_evaluations += 1;
            }

            let score = evaluate(node);
            self.table.store(key, score, depth, Bound::Exact, Vec::new());
            return (score, Vec::new());
        }

        let moves = node.valid_moves();
        if moves.is_empty() {
            // Nothing left to hand over, and nobody has won
            self.table.store(key, Score::DRAW, depth, Bound::Exact, Vec::new());
            return (Score::DRAW, Vec::new());
        }

        let original_alpha = alpha;
        let mut best_score = if maximizing { Score::MIN } else { Score::MAX };
        let mut best_continuation: Vec<AiMove> = Vec::new();

        for mv in moves {
            let child = node.apply_move(mv);
            let (score, continuation) = self.minimax(&child, depth - 1, alpha, beta, !maximizing);

            let improves = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            let faster = score == best_score
                && score.is_decisive()
                && reaches_outcome_sooner(&child, &continuation, &best_continuation);

            if improves || faster {
                best_score = score;
                best_continuation = Vec::with_capacity(continuation.len() + 1);
                best_continuation.push(mv);
                best_continuation.extend(continuation);
            }

            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }

            if beta <= alpha {
                self.stats.cutoffs += 1;
                trace!("Cutoff at depth {depth}: alpha={alpha}, beta={beta}");
                break;
            }
        }

        let bound = if best_score <= original_alpha {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.table
            .store(key, best_score, depth, bound, best_continuation.clone());

        (best_score, best_continuation)
    }
}

/// Whether a child reaching an equal, decisive score gets there sooner than the current best
///
/// A child that is itself won always does.
/// Otherwise its path must be strictly shorter, and the current best path longer than one move.
fn reaches_outcome_sooner(child: &GameState, continuation: &[AiMove], best: &[AiMove]) -> bool {
    if continuation.is_empty() && child.is_game_over() && child.winner().is_some() {
        return true;
    }

    continuation.len() + 1 < best.len() && best.len() > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::{Board, Position},
        state::Side,
    };

    fn piece(value: u8) -> Piece {
        Piece::new(value).unwrap()
    }

    fn at(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    /// Eight pieces available, and placing piece 6 on (2, 0) completes the first column
    fn column_threat() -> GameState {
        let board = Board::from_values([
            [0, 2, 13, -1],
            [5, 1, 14, -1],
            [-1, -1, -1, -1],
            [4, -1, -1, -1],
        ]);
        GameState::new(board, Some(piece(6)))
    }

    fn stored_bound(engine: &mut Engine, state: &GameState, depth: u8) -> Option<Bound> {
        engine
            .table
            .lookup(&StateKey::new(state), depth, Score::MIN, Score::MAX)
            .map(|entry| entry.bound)
    }

    #[test]
    fn shorter_path_replaces_a_longer_one() {
        let ongoing = column_threat();
        let mv = AiMove::new(Move::new(piece(6), at(0, 3)), piece(3));

        assert!(reaches_outcome_sooner(&ongoing, &[mv], &[mv, mv, mv]));
        assert!(!reaches_outcome_sooner(&ongoing, &[mv, mv], &[mv, mv, mv]));
        assert!(!reaches_outcome_sooner(&ongoing, &[mv, mv, mv], &[mv, mv]));
    }

    #[test]
    fn single_move_best_is_kept_against_equal_paths() {
        let ongoing = column_threat();
        let mv = AiMove::new(Move::new(piece(6), at(0, 3)), piece(3));

        assert!(!ongoing.is_game_over());
        assert!(!reaches_outcome_sooner(&ongoing, &[], &[mv]));
        assert!(!reaches_outcome_sooner(&ongoing, &[mv], &[mv]));
    }

    #[test]
    fn immediate_win_always_replaces() {
        let mv = AiMove::new(Move::new(piece(6), at(2, 0)), piece(3));
        let won = column_threat().apply_move(mv);
        assert_eq!(won.winner(), Some(Side::Maximizing));

        assert!(reaches_outcome_sooner(&won, &[], &[mv]));
        assert!(reaches_outcome_sooner(&won, &[], &[mv, mv, mv]));
    }

    #[test]
    fn search_prefers_the_immediate_win() {
        let state = column_threat();
        let result = Engine::with_depth(3).search(&state);

        assert_eq!(result.score, Score::WIN);
        assert_eq!(result.continuation.len(), 1);
        assert_eq!(
            result.best_move().and_then(|mv| mv.placement),
            Some(Move::new(piece(6), at(2, 0)))
        );
    }

    #[test]
    fn nothing_above_alpha_stores_an_upper_bound() {
        let mut engine = Engine::default();
        let state = GameState::new(Board::empty(), Some(piece(0)));

        // Every child is an unfinished leaf worth a draw, which never beats alpha
        let (score, _) = engine.minimax(&state, 1, Score::DRAW, Score::WIN, true);
        assert_eq!(score, Score::DRAW);
        assert_eq!(stored_bound(&mut engine, &state, 1), Some(Bound::Upper));
        assert_eq!(engine.stats.cutoffs, 0);
    }

    #[test]
    fn cutoff_stores_a_lower_bound() {
        let mut engine = Engine::default();
        let state = GameState::new(Board::empty(), Some(piece(0)));

        // The first child already reaches beta
        let (score, continuation) = engine.minimax(&state, 1, Score::LOSS, Score::DRAW, true);
        assert_eq!(score, Score::DRAW);
        assert_eq!(continuation.len(), 1);
        assert_eq!(engine.stats.cutoffs, 1);
        assert_eq!(engine.stats.leaf_evaluations, 1);
        assert_eq!(stored_bound(&mut engine, &state, 1), Some(Bound::Lower));
    }

    #[test]
    fn score_inside_the_window_is_exact() {
        let mut engine = Engine::default();
        let state = GameState::new(Board::empty(), Some(piece(0)));

        let (score, _) = engine.minimax(&state, 1, Score::LOSS, Score::WIN, true);
        assert_eq!(score, Score::DRAW);
        assert_eq!(engine.stats.cutoffs, 0);
        assert_eq!(stored_bound(&mut engine, &state, 1), Some(Bound::Exact));
    }

    #[test]
    fn minimizing_node_classifies_against_the_narrowed_beta() {
        let mut engine = Engine::default();
        let state = GameState::new(Board::empty(), Some(piece(0)));

        // Beta drops to the first child's draw, so the final draw counts as a lower bound
        let (score, _) = engine.minimax(&state, 1, Score::LOSS, Score::WIN, false);
        assert_eq!(score, Score::DRAW);
        assert_eq!(engine.stats.cutoffs, 0);
        assert_eq!(stored_bound(&mut engine, &state, 1), Some(Bound::Lower));
    }

    #[test]
    fn terminal_and_leaf_nodes_are_stored_exact() {
        let mut engine = Engine::default();
        let state = column_threat();
        let won = state.apply_move(AiMove::new(Move::new(piece(6), at(2, 0)), piece(3)));

        assert_eq!(engine.minimax(&won, 4, Score::DRAW, Score::WIN, false).0, Score::WIN);
        assert_eq!(stored_bound(&mut engine, &won, 4), Some(Bound::Exact));

        assert_eq!(engine.minimax(&state, 0, Score::DRAW, Score::WIN, true).0, Score::DRAW);
        assert_eq!(stored_bound(&mut engine, &state, 0), Some(Bound::Exact));
    }
}
