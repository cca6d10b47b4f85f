use std::fmt;

use crate::error::{ChessError, ChessResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Rank (0 indexed) the pawns of this color start on.
    pub const fn pawn_rank(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank (0 indexed) of this color's back row.
    pub const fn home_rank(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank a double push of this color's pawns skips over.
    pub const fn en_passant_rank(self) -> i8 {
        match self {
            Color::White => 2,
            Color::Black => 5,
        }
    }

    /// Rank a pawn of this color promotes on.
    pub const fn promotion_rank(self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// The piece types a pawn may promote to, in generation order.
    pub const PROMOTIONS: [PieceType; 4] = [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceType::Pawn => 0,
            PieceType::Knight => 1,
            PieceType::Bishop => 2,
            PieceType::Rook => 3,
            PieceType::Queen => 4,
            PieceType::King => 5,
        }
    }

    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "P"),
            PieceType::Knight => write!(f, "N"),
            PieceType::Bishop => write!(f, "B"),
            PieceType::Rook => write!(f, "R"),
            PieceType::Queen => write!(f, "Q"),
            PieceType::King => write!(f, "K"),
        }
    }
}

/// A colored piece. Pieces are plain values; two pieces of the same color and
/// type are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Self { color, kind }
    }

    /// The piece a pawn turns into on promotion. Non-pawns are returned as is.
    pub fn promoted(self, kind: PieceType) -> Self {
        if self.kind == PieceType::Pawn {
            Piece { color: self.color, kind }
        } else {
            self
        }
    }

    pub fn to_char(&self) -> char {
        let c = match self.kind {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece { color, kind })
    }
}

/// One cell of the board, `file` and `rank` both 0 indexed. A square may lie
/// off the board; the directional steps never check bounds, use `is_valid` or
/// the `out_*` predicates before relying on one.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Square {
    pub file: i8,
    pub rank: i8,
}

impl Default for Square {
    fn default() -> Self {
        Square::INVALID
    }
}

impl Square {
    pub const INVALID: Square = Square { file: -1, rank: -1 };

    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    /// Square from its 0..64 index (rank * 8 + file).
    pub const fn from_index(index: usize) -> Self {
        Self {
            file: (index % 8) as i8,
            rank: (index / 8) as i8,
        }
    }

    pub fn from_algebraic(algebraic: &str) -> ChessResult<Self> {
        let mut chars = algebraic.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file @ 'a'..='h'), Some(rank @ '1'..='8'), None) => {
                Ok(Square::new((file as u8 - b'a') as i8, (rank as u8 - b'1') as i8))
            }
            _ => Err(ChessError::InvalidSquare(algebraic.to_string())),
        }
    }

    pub fn as_algebraic(&self) -> String {
        self.to_string()
    }

    pub const fn is_valid(&self) -> bool {
        self.file >= 0 && self.file < 8 && self.rank >= 0 && self.rank < 8
    }

    /// Index of the square, only meaningful for valid squares.
    #[inline]
    pub const fn index(&self) -> usize {
        (self.rank as usize) * 8 + self.file as usize
    }

    /// Single bit mask of the square; empty for an off-board square.
    #[inline]
    pub const fn mask(&self) -> u64 {
        if self.is_valid() {
            1u64 << self.index()
        } else {
            0
        }
    }

    /// The same square seen from the other side of the board.
    pub const fn rotated(&self) -> Self {
        Square::new(7 - self.file, 7 - self.rank)
    }

    pub const fn offset(&self, file_delta: i8, rank_delta: i8) -> Self {
        Square::new(self.file + file_delta, self.rank + rank_delta)
    }

    pub const fn n(&self) -> Self {
        self.offset(0, 1)
    }
    pub const fn ne(&self) -> Self {
        self.offset(1, 1)
    }
    pub const fn e(&self) -> Self {
        self.offset(1, 0)
    }
    pub const fn se(&self) -> Self {
        self.offset(1, -1)
    }
    pub const fn s(&self) -> Self {
        self.offset(0, -1)
    }
    pub const fn sw(&self) -> Self {
        self.offset(-1, -1)
    }
    pub const fn w(&self) -> Self {
        self.offset(-1, 0)
    }
    pub const fn nw(&self) -> Self {
        self.offset(-1, 1)
    }

    // True when this square itself is off the board on that side. Stepping
    // in a direction until `out_*` holds visits exactly the on-board squares.
    pub const fn out_n(&self) -> bool {
        self.rank > 7
    }
    pub const fn out_s(&self) -> bool {
        self.rank < 0
    }
    pub const fn out_e(&self) -> bool {
        self.file > 7
    }
    pub const fn out_w(&self) -> bool {
        self.file < 0
    }
    pub const fn out_ne(&self) -> bool {
        self.out_n() || self.out_e()
    }
    pub const fn out_se(&self) -> bool {
        self.out_s() || self.out_e()
    }
    pub const fn out_sw(&self) -> bool {
        self.out_s() || self.out_w()
    }
    pub const fn out_nw(&self) -> bool {
        self.out_n() || self.out_w()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}{}", (b'a' + self.file as u8) as char, self.rank + 1)
        } else {
            write!(f, "--")
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Square, to: Square, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, promotion: PieceType) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// Both squares are on the board.
    pub fn is_valid(&self) -> bool {
        self.from.is_valid() && self.to.is_valid()
    }

    pub fn rank_diff(&self) -> i8 {
        self.signed_rank_diff().abs()
    }

    pub fn file_diff(&self) -> i8 {
        self.signed_file_diff().abs()
    }

    pub fn signed_rank_diff(&self) -> i8 {
        self.to.rank - self.from.rank
    }

    pub fn signed_file_diff(&self) -> i8 {
        self.to.file - self.from.file
    }

    /// A pawn reaching its last rank without a promotion type chosen yet.
    pub fn needs_promotion(&self) -> bool {
        self.piece.kind == PieceType::Pawn
            && self.to.rank == self.piece.color.promotion_rank()
            && self.promotion.is_none()
            && self.is_shape_legal()
    }

    /// Whether the geometry of the move fits the moving piece, ignoring
    /// everything else on the board.
    pub fn is_shape_legal(&self) -> bool {
        match self.piece.kind {
            PieceType::Pawn => self.is_pawn_shape(),
            PieceType::Knight => self.is_knight_shape(),
            PieceType::Bishop => self.is_bishop_shape(),
            PieceType::Rook => self.is_rook_shape(),
            PieceType::Queen => self.is_rook_shape() || self.is_bishop_shape(),
            PieceType::King => self.is_king_shape(),
        }
    }

    fn is_pawn_shape(&self) -> bool {
        if self.rank_diff() > 2 || self.file_diff() > 1 {
            return false;
        }
        let forward = match self.piece.color {
            Color::White => self.signed_rank_diff(),
            Color::Black => -self.signed_rank_diff(),
        };
        match forward {
            1 => true,
            2 => self.file_diff() == 0 && self.from.rank == self.piece.color.pawn_rank(),
            _ => false,
        }
    }

    fn is_knight_shape(&self) -> bool {
        matches!((self.rank_diff(), self.file_diff()), (1, 2) | (2, 1))
    }

    fn is_bishop_shape(&self) -> bool {
        self.rank_diff() == self.file_diff() && self.rank_diff() != 0
    }

    fn is_rook_shape(&self) -> bool {
        (self.rank_diff() == 0) != (self.file_diff() == 0)
    }

    fn is_king_shape(&self) -> bool {
        match (self.rank_diff(), self.file_diff()) {
            (0, 0) => false,
            (r, f) if r <= 1 && f <= 1 => true,
            (0, 2) => true,
            _ => false,
        }
    }

    pub fn as_algebraic(&self) -> String {
        let base_move = format!("{}{}", self.from, self.to);
        if let Some(promo) = self.promotion {
            base_move + &promo.to_string().to_lowercase()
        } else {
            base_move
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE_PAWN: Piece = Piece::new(Color::White, PieceType::Pawn);
    const BLACK_PAWN: Piece = Piece::new(Color::Black, PieceType::Pawn);

    fn mv(from: &str, to: &str, piece: Piece) -> Move {
        Move::new(Square::from_algebraic(from).unwrap(), Square::from_algebraic(to).unwrap(), piece)
    }

    #[test]
    fn test_square_conversion() {
        assert_eq!(Square::from_algebraic("b2").unwrap(), Square::new(1, 1));
        assert_eq!(Square::from_algebraic("b2").unwrap().as_algebraic(), "b2");
        assert_eq!(Square::from_algebraic("h8").unwrap().index(), 63);
        assert!(Square::from_algebraic("i1").is_err());
        assert!(Square::from_algebraic("a9").is_err());
        assert!(Square::from_algebraic("a10").is_err());
        assert_eq!(Square::from_index(12), Square::from_algebraic("e2").unwrap());
    }

    #[test]
    fn test_directions_leave_the_board() {
        let a1 = Square::new(0, 0);
        assert!(a1.w().out_w());
        assert!(a1.s().out_s());
        assert!(a1.sw().out_sw());
        assert!(!a1.ne().out_ne());
        assert!(!a1.w().is_valid());
        assert_eq!(a1.w().mask(), 0);
        assert_eq!(a1.ne(), Square::new(1, 1));
        let h8 = Square::new(7, 7);
        assert!(h8.n().out_n());
        assert!(h8.ne().out_ne());
        assert!(h8.e().out_e());
        assert!(!h8.sw().out_sw());
        assert!(!Square::INVALID.is_valid());
    }

    #[test]
    fn test_pawn_shape() {
        assert!(mv("e2", "e4", WHITE_PAWN).is_shape_legal());
        assert!(mv("e2", "e3", WHITE_PAWN).is_shape_legal());
        assert!(mv("e2", "d3", WHITE_PAWN).is_shape_legal());
        assert!(!mv("e3", "e5", WHITE_PAWN).is_shape_legal());
        assert!(!mv("e2", "e1", WHITE_PAWN).is_shape_legal());
        assert!(!mv("e2", "d4", WHITE_PAWN).is_shape_legal());
        assert!(mv("e7", "e5", BLACK_PAWN).is_shape_legal());
        assert!(!mv("e7", "e8", BLACK_PAWN).is_shape_legal());
        assert!(!mv("e6", "e4", BLACK_PAWN).is_shape_legal());
    }

    #[test]
    fn test_piece_shapes() {
        let knight = Piece::new(Color::White, PieceType::Knight);
        let bishop = Piece::new(Color::White, PieceType::Bishop);
        let rook = Piece::new(Color::Black, PieceType::Rook);
        let queen = Piece::new(Color::Black, PieceType::Queen);
        let king = Piece::new(Color::White, PieceType::King);

        assert!(mv("g1", "f3", knight).is_shape_legal());
        assert!(mv("g1", "e2", knight).is_shape_legal());
        assert!(!mv("g1", "g3", knight).is_shape_legal());
        assert!(mv("c1", "h6", bishop).is_shape_legal());
        assert!(!mv("c1", "c4", bishop).is_shape_legal());
        assert!(mv("a8", "a1", rook).is_shape_legal());
        assert!(!mv("a8", "b7", rook).is_shape_legal());
        assert!(mv("d8", "h4", queen).is_shape_legal());
        assert!(mv("d8", "d1", queen).is_shape_legal());
        assert!(!mv("d8", "e6", queen).is_shape_legal());
        assert!(mv("e1", "f2", king).is_shape_legal());
        assert!(mv("e1", "g1", king).is_shape_legal());
        assert!(mv("e1", "c1", king).is_shape_legal());
        assert!(!mv("e1", "g2", king).is_shape_legal());
        assert!(!mv("e1", "e3", king).is_shape_legal());
        assert!(!mv("e1", "e1", king).is_shape_legal());
    }

    #[test]
    fn test_needs_promotion() {
        assert!(mv("c7", "c8", WHITE_PAWN).needs_promotion());
        assert!(!mv("c7", "c8", WHITE_PAWN).with_promotion(PieceType::Queen).needs_promotion());
        assert!(!mv("c6", "c7", WHITE_PAWN).needs_promotion());
        assert!(mv("b2", "a1", BLACK_PAWN).needs_promotion());
        assert_eq!(
            mv("c7", "c8", WHITE_PAWN).with_promotion(PieceType::Knight).as_algebraic(),
            "c7c8n"
        );
    }

    #[test]
    fn test_promoted_piece() {
        assert_eq!(WHITE_PAWN.promoted(PieceType::Queen), Piece::new(Color::White, PieceType::Queen));
        let rook = Piece::new(Color::Black, PieceType::Rook);
        assert_eq!(rook.promoted(PieceType::Queen), rook);
        assert_eq!(Piece::from_char('q'), Some(Piece::new(Color::Black, PieceType::Queen)));
        assert_eq!(Piece::from_char('N').map(|p| p.to_char()), Some('N'));
        assert_eq!(Piece::from_char('x'), None);
    }
}
