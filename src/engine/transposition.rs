use std::collections::HashMap;

use crate::{engine::hash::StateKey, score::Score, state::AiMove};

/// How a stored score relates to the true value of its position
///
/// See: https://www.chessprogramming.org/Node_Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is exact (PV node)
    Exact,
    /// The true value is at least the score: a beta cutoff happened (cut node)
    Lower,
    /// The true value is at most the score: nothing beat alpha (all node)
    Upper,
}

/// When a stored entry may stand in for a fresh search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TablePolicy {
    /// Any entry searched at least as deep is reused, whatever its [`Bound`]
    #[default]
    Loose,
    /// As [`TablePolicy::Loose`], but bounds are only reused when they fall outside the window:
    /// lower bounds at or above beta, upper bounds at or below alpha
    BoundChecked,
}

/// The bundle of data for a single position in the transposition table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspositionData {
    /// The score that this position received
    pub score: Score,
    /// The remaining depth this score was searched to
    pub depth: u8,
    /// How [`Self::score`] should be interpreted
    pub bound: Bound,
    /// The best continuation found from this position
    pub continuation: Vec<AiMove>,
}

impl TranspositionData {
    /// Constructs a new `Self`
    pub fn new(score: Score, depth: u8, bound: Bound, continuation: Vec<AiMove>) -> Self {
        Self {
            score,
            depth,
            bound,
            continuation,
        }
    }

    /// Whether this entry may be reused inside the window `(alpha, beta)` under `policy`
    fn usable(&self, policy: TablePolicy, alpha: Score, beta: Score) -> bool {
        match policy {
            TablePolicy::Loose => true,
            TablePolicy::BoundChecked => match self.bound {
                Bound::Exact => true,
                Bound::Lower => self.score >= beta,
                Bound::Upper => self.score <= alpha,
            },
        }
    }
}

/// A [transposition table](https://www.chessprogramming.org/Transposition_Table),
/// storing computed scores and continuations for each state visited
///
/// One table serves exactly one top-level search: it is cleared when a search starts,
/// grows without bound during it, and never evicts.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<StateKey, TranspositionData>,
    policy: TablePolicy,
    hits: u64,
    misses: u64,
}

impl TranspositionTable {
    pub fn new(policy: TablePolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> TablePolicy {
        self.policy
    }

    /// Returns the entry for `key` if it was searched to at least `depth`
    ///
    /// Under [`TablePolicy::BoundChecked`] the entry must also be usable inside `(alpha, beta)`.
    /// Every call counts as either a hit or a miss.
    pub fn lookup(
        &mut self,
        key: &StateKey,
        depth: u8,
        alpha: Score,
        beta: Score,
    ) -> Option<&TranspositionData> {
        let policy = self.policy;
        let found = self
            .entries
            .get(key)
            .filter(|entry| entry.depth >= depth && entry.usable(policy, alpha, beta));

        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Stores an entry for `key`, replacing whatever was there
    pub fn store(
        &mut self,
        key: StateKey,
        score: Score,
        depth: u8,
        bound: Bound,
        continuation: Vec<AiMove>,
    ) {
        self.entries
            .insert(key, TranspositionData::new(score, depth, bound, continuation));
    }

    /// Empties the table and resets the hit and miss counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{board::Board, piece::Piece, state::GameState};

    fn key(selected: u8) -> StateKey {
        StateKey::new(&GameState::new(Board::empty(), Piece::new(selected)))
    }

    #[test]
    fn lookup_requires_sufficient_depth() {
        let mut table = TranspositionTable::default();
        table.store(key(1), Score::WIN, 3, Bound::Exact, Vec::new());

        assert!(table.lookup(&key(1), 4, Score::MIN, Score::MAX).is_none());
        assert_eq!(
            table.lookup(&key(1), 3, Score::MIN, Score::MAX).map(|e| e.score),
            Some(Score::WIN)
        );
        assert!(table.lookup(&key(1), 1, Score::MIN, Score::MAX).is_some());
        assert!(table.lookup(&key(2), 0, Score::MIN, Score::MAX).is_none());

        assert_eq!(table.hits(), 2);
        assert_eq!(table.misses(), 2);
    }

    #[test]
    fn store_overwrites_unconditionally() {
        let mut table = TranspositionTable::default();
        table.store(key(1), Score::WIN, 5, Bound::Exact, Vec::new());
        table.store(key(1), Score::LOSS, 1, Bound::Upper, Vec::new());

        assert_eq!(table.len(), 1);
        assert!(table.lookup(&key(1), 2, Score::MIN, Score::MAX).is_none());
        assert_eq!(
            table.lookup(&key(1), 1, Score::MIN, Score::MAX).map(|e| e.score),
            Some(Score::LOSS)
        );
    }

    #[test]
    fn loose_policy_reuses_bounds_inside_the_window() {
        let mut table = TranspositionTable::new(TablePolicy::Loose);
        table.store(key(1), Score::DRAW, 2, Bound::Upper, Vec::new());
        table.store(key(2), Score::DRAW, 2, Bound::Lower, Vec::new());

        let (alpha, beta) = (Score::LOSS, Score::WIN);
        assert!(table.lookup(&key(1), 2, alpha, beta).is_some());
        assert!(table.lookup(&key(2), 2, alpha, beta).is_some());
    }

    #[test]
    fn bound_checked_policy_only_reuses_bounds_outside_the_window() {
        let mut table = TranspositionTable::new(TablePolicy::BoundChecked);
        table.store(key(1), Score::DRAW, 2, Bound::Upper, Vec::new());
        table.store(key(2), Score::DRAW, 2, Bound::Lower, Vec::new());
        table.store(key(3), Score::DRAW, 2, Bound::Exact, Vec::new());

        let (alpha, beta) = (Score::LOSS, Score::WIN);
        assert!(table.lookup(&key(1), 2, alpha, beta).is_none());
        assert!(table.lookup(&key(2), 2, alpha, beta).is_none());
        assert!(table.lookup(&key(3), 2, alpha, beta).is_some());

        // Upper bound at or below alpha, lower bound at or above beta
        assert!(table.lookup(&key(1), 2, Score::DRAW, beta).is_some());
        assert!(table.lookup(&key(2), 2, alpha, Score::DRAW).is_some());
    }

    #[test]
    fn clear_resets_entries_and_counters() {
        let mut table = TranspositionTable::default();
        table.store(key(1), Score::WIN, 1, Bound::Exact, Vec::new());
        table.lookup(&key(1), 1, Score::MIN, Score::MAX);
        table.lookup(&key(2), 1, Score::MIN, Score::MAX);

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.hits(), 0);
        assert_eq!(table.misses(), 0);
    }
}
