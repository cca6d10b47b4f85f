//! Bitboard: a set of squares packed in a `u64`, bit `rank * 8 + file`.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not};

use super::Square;

pub const FILE_A: u64 = 0x0101_0101_0101_0101;
pub const RANK_1: u64 = 0xff;

#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    pub fn from_square(sq: Square) -> Self {
        Bitboard(sq.mask())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn any(self) -> bool {
        self.0 != 0
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn contains(self, sq: Square) -> bool {
        self.0 & sq.mask() != 0
    }

    /// Off-board squares are ignored.
    pub fn set(&mut self, sq: Square) {
        self.0 |= sq.mask();
    }

    pub fn unset(&mut self, sq: Square) {
        self.0 &= !sq.mask();
    }

    /// Lowest set square, or `None` for the empty set.
    pub fn first(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index(self.0.trailing_zeros() as usize))
        }
    }

    /// The set as seen from the other side of the board (180 degree turn).
    pub fn rotated(self) -> Self {
        Bitboard(self.0.reverse_bits())
    }

    pub fn squares(self) -> Squares {
        Squares(self.0)
    }

    pub fn mask_rank(sq: Square) -> Self {
        Bitboard(RANK_1 << (sq.rank as u32 * 8))
    }

    pub fn mask_file(sq: Square) -> Self {
        Bitboard(FILE_A << sq.file as u32)
    }

    /// The a1-h8 oriented diagonal through `sq`.
    pub fn mask_diag_ne(sq: Square) -> Self {
        let mut mask = Bitboard::EMPTY;
        let mut p = sq;
        while !p.out_ne() {
            mask.set(p);
            p = p.ne();
        }
        p = sq.sw();
        while !p.out_sw() {
            mask.set(p);
            p = p.sw();
        }
        mask
    }

    /// The a8-h1 oriented diagonal through `sq`.
    pub fn mask_diag_nw(sq: Square) -> Self {
        let mut mask = Bitboard::EMPTY;
        let mut p = sq;
        while !p.out_nw() {
            mask.set(p);
            p = p.nw();
        }
        p = sq.se();
        while !p.out_se() {
            mask.set(p);
            p = p.se();
        }
        mask
    }
}

/// Iterates the squares of a bitboard from a1 towards h8.
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(Square::from_index(idx))
    }
}

impl From<u64> for Bitboard {
    fn from(bits: u64) -> Self {
        Bitboard(bits)
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

// Rank 8 on top, files a..h left to right.
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let ch = if self.contains(Square::new(file, rank)) { '1' } else { '.' };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_set_and_contains() {
        let mut bb = Bitboard::EMPTY;
        bb.set(sq("a1"));
        bb.set(sq("h8"));
        bb.set(Square::INVALID);
        assert_eq!(bb.count(), 2);
        assert!(bb.contains(sq("a1")));
        assert!(!bb.contains(sq("a2")));
        bb.unset(sq("a1"));
        assert_eq!(bb.first(), Some(sq("h8")));
        assert_eq!(bb, Bitboard(1 << 63));
    }

    #[test]
    fn test_squares_iteration_order() {
        let bb = Bitboard::from_square(sq("c3")) | Bitboard::from_square(sq("a1")) | Bitboard::from_square(sq("h8"));
        let squares: Vec<_> = bb.squares().map(|s| s.as_algebraic()).collect();
        assert_eq!(squares, vec!["a1", "c3", "h8"]);
    }

    #[test]
    fn test_line_masks() {
        assert_eq!(Bitboard::mask_rank(sq("d3")), Bitboard(0xff << 16));
        assert_eq!(Bitboard::mask_file(sq("b5")), Bitboard(FILE_A << 1));
        assert_eq!(Bitboard::mask_diag_ne(sq("a1")), Bitboard(0x8040_2010_0804_0201));
        assert_eq!(Bitboard::mask_diag_nw(sq("h1")), Bitboard(0x0102_0408_1020_4080));
        let diag = Bitboard::mask_diag_ne(sq("b1"));
        assert_eq!(diag.count(), 7);
        assert!(diag.contains(sq("h7")));
        assert!(!diag.contains(sq("a1")));
        let anti = Bitboard::mask_diag_nw(sq("e4"));
        assert!(anti.contains(sq("a8")));
        assert!(anti.contains(sq("h1")));
        assert_eq!(anti.count(), 8);
    }

    #[test]
    fn test_rotation() {
        assert_eq!(Bitboard::from_square(sq("a1")).rotated(), Bitboard::from_square(sq("h8")));
        assert_eq!(Bitboard::from_square(sq("e2")).rotated(), Bitboard::from_square(sq("d7")));
    }
}
