//! See [`Piece`] and [`PieceSet`]

use std::fmt;

/// Number of distinct pieces in a game
pub const PIECE_COUNT: usize = 16;

/// One of the 16 Quarto pieces
///
/// The value is a 4-bit attribute vector, most significant bit first:
/// color, shape, size, fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece(u8);

impl Piece {
    /// Every piece, in ascending value order
    pub const ALL: [Piece; PIECE_COUNT] = {
        let mut all = [Piece(0); PIECE_COUNT];
        let mut i = 0;
        while i < PIECE_COUNT {
            all[i] = Piece(i as u8);
            i += 1;
        }
        all
    };

    /// Creates a piece from its value, if it is in `0..16`
    pub fn new(value: u8) -> Option<Self> {
        (value < PIECE_COUNT as u8).then_some(Self(value))
    }

    /// Creates a piece from its four attributes
    pub fn from_attributes(color: bool, shape: bool, size: bool, fill: bool) -> Self {
        Self((color as u8) << 3 | (shape as u8) << 2 | (size as u8) << 1 | fill as u8)
    }

    /// The raw value, in `0..16`
    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn color(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    pub fn shape(self) -> u8 {
        (self.0 % 8) / 4
    }

    #[inline]
    pub fn size(self) -> u8 {
        (self.0 % 4) / 2
    }

    #[inline]
    pub fn fill(self) -> u8 {
        self.0 % 2
    }

    /// The attributes as `[color, shape, size, fill]`
    pub fn attributes(self) -> [u8; 4] {
        [self.color(), self.shape(), self.size(), self.fill()]
    }
}

impl fmt::Display for Piece {
    /// Writes the piece in its four-letter notation, see [`crate::notation`]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::notation::piece_to_notation(*self))
    }
}

/// A set of pieces, stored as a 16-bit mask
///
/// Iteration always yields pieces in ascending value order,
/// which fixes the order in which moves are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceSet(u16);

impl PieceSet {
    /// The set of no pieces
    pub const EMPTY: Self = Self(0);

    /// The set of all 16 pieces
    pub const FULL: Self = Self(u16::MAX);

    #[inline]
    pub fn contains(self, piece: Piece) -> bool {
        self.0 & (1 << piece.0) != 0
    }

    #[inline]
    pub fn insert(&mut self, piece: Piece) {
        self.0 |= 1 << piece.0;
    }

    #[inline]
    pub fn remove(&mut self, piece: Piece) {
        self.0 &= !(1 << piece.0);
    }

    /// Returns a copy of `self` without `piece`
    #[inline]
    pub fn without(mut self, piece: Piece) -> Self {
        self.remove(piece);
        self
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The lowest-valued piece in the set
    pub fn first(self) -> Option<Piece> {
        (!self.is_empty()).then(|| Piece(self.0.trailing_zeros() as u8))
    }

    pub fn iter(self) -> PieceSetIter {
        PieceSetIter(self.0)
    }
}

impl FromIterator<Piece> for PieceSet {
    fn from_iter<T: IntoIterator<Item = Piece>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        iter.into_iter().for_each(|piece| set.insert(piece));
        set
    }
}

impl IntoIterator for PieceSet {
    type Item = Piece;
    type IntoIter = PieceSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`PieceSet`], lowest value first
#[derive(Debug, Clone)]
pub struct PieceSetIter(u16);

impl Iterator for PieceSetIter {
    type Item = Piece;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }
        let value = self.0.trailing_zeros() as u8;
        // Clear the lowest set bit
        self.0 &= self.0 - 1;
        Some(Piece(value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for PieceSetIter {}
