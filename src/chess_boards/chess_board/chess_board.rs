use std::fmt;

use super::attack_tables::{diagonal_state, file_state, rank_state, ATTACKS};
use super::bitboard::{Bitboard, RANK_1};
use super::serial_board::{
    SerialBoard, BLACK_KINGSIDE, BLACK_QUEENSIDE, WHITE_KINGSIDE, WHITE_QUEENSIDE, WHITE_TURN,
};
use super::{Color, Move, Piece, PieceType, Square};
use crate::error::{ChessError, ChessResult};

/// King and rook home squares: a1, e1, h1, a8, e8, h8.
pub const INITIAL_CASTLING: u64 = 0x9100_0000_0000_0091;

const RANK_3: u64 = RANK_1 << 16;
const RANK_6: u64 = RANK_1 << 40;

const BACK_ROW: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// A chess position without the side to move.
///
/// Every occupied square is in exactly one piece plane and one color plane.
/// `castling` holds a bit for every king or rook home square whose piece has
/// never moved (nor been captured); `en_passant` holds the square a pawn just
/// skipped over with a double push.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChessBoard {
    pieces: [Bitboard; 6],
    colors: [Bitboard; 2],
    castling: Bitboard,
    en_passant: Bitboard,
    king_squares: [Square; 2],
}

impl Default for ChessBoard {
    fn default() -> Self {
        ChessBoard::new()
    }
}

impl ChessBoard {
    /// Creates an empty chess board
    pub fn new() -> Self {
        ChessBoard {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            castling: Bitboard::EMPTY,
            en_passant: Bitboard::EMPTY,
            king_squares: [Square::INVALID; 2],
        }
    }

    /// The initial position with full castling rights.
    pub fn standard() -> Self {
        let mut board = ChessBoard::new();
        for color in [Color::White, Color::Black] {
            for (file, kind) in BACK_ROW.iter().enumerate() {
                board.set_piece(Square::new(file as i8, color.home_rank()), Piece::new(color, *kind));
                board.set_piece(
                    Square::new(file as i8, color.pawn_rank()),
                    Piece::new(color, PieceType::Pawn),
                );
            }
        }
        board.castling = Bitboard(INITIAL_CASTLING);
        board
    }

    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        super::fen::from_fen(fen).map(|position| position.board)
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        if !self.is_occupied(sq) {
            return None;
        }
        let color = if self.colors[Color::White.index()].contains(sq) {
            Color::White
        } else {
            Color::Black
        };
        PieceType::ALL
            .iter()
            .find(|kind| self.pieces[kind.index()].contains(sq))
            .map(|kind| Piece::new(color, *kind))
    }

    /// Puts `piece` on `sq`, replacing whatever stood there.
    pub fn set_piece(&mut self, sq: Square, piece: Piece) {
        if !sq.is_valid() {
            return;
        }
        self.remove_piece(sq);
        self.pieces[piece.kind.index()].set(sq);
        self.colors[piece.color.index()].set(sq);
        if piece.kind == PieceType::King {
            self.king_squares[piece.color.index()] = sq;
        }
    }

    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        self.pieces[piece.kind.index()].unset(sq);
        self.colors[piece.color.index()].unset(sq);
        if piece.kind == PieceType::King && self.king_squares[piece.color.index()] == sq {
            self.king_squares[piece.color.index()] = Square::INVALID;
        }
        Some(piece)
    }

    pub fn is_occupied(&self, sq: Square) -> bool {
        self.occupied().contains(sq)
    }

    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    pub fn pieces_of_color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    pub fn pieces_of_type(&self, kind: PieceType) -> Bitboard {
        self.pieces[kind.index()]
    }

    pub fn pieces_of(&self, color: Color, kind: PieceType) -> Bitboard {
        self.pieces[kind.index()] & self.colors[color.index()]
    }

    pub fn piece_count(&self, color: Color, kind: PieceType) -> u32 {
        self.pieces_of(color, kind).count()
    }

    pub fn total_pieces(&self) -> u32 {
        self.occupied().count()
    }

    /// Location of the king of `color`, `Square::INVALID` if it has none.
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    /// All pieces with their squares, from a1 towards h8.
    pub fn pieces_with_squares(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied()
            .squares()
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    pub fn castling_flags(&self) -> Bitboard {
        self.castling
    }

    pub fn en_passant_flags(&self) -> Bitboard {
        self.en_passant
    }

    pub fn is_en_passant_set(&self, sq: Square) -> bool {
        self.en_passant.contains(sq)
    }

    pub(crate) fn set_castling_flags(&mut self, flags: Bitboard) {
        self.castling = flags;
    }

    pub(crate) fn set_en_passant(&mut self, sq: Square) {
        self.en_passant.set(sq);
    }

    /// Castling rights packed as the `SerialBoard` K, Q, k, q bits.
    pub fn castling_rights(&self) -> u32 {
        let has = |king: Square, rook: Square| self.castling.contains(king) && self.castling.contains(rook);
        let mut rights = 0;
        for (color, kingside, queenside) in [
            (Color::White, WHITE_KINGSIDE, WHITE_QUEENSIDE),
            (Color::Black, BLACK_KINGSIDE, BLACK_QUEENSIDE),
        ] {
            let rank = color.home_rank();
            if has(Square::new(4, rank), Square::new(7, rank)) {
                rights |= kingside;
            }
            if has(Square::new(4, rank), Square::new(0, rank)) {
                rights |= queenside;
            }
        }
        rights
    }

    pub fn rank_state(&self, sq: Square) -> usize {
        rank_state(self.occupied().0, sq)
    }

    pub fn file_state(&self, sq: Square) -> usize {
        file_state(self.occupied().0, sq)
    }

    pub fn ne_diag_state(&self, sq: Square) -> usize {
        diagonal_state(self.occupied().0, ATTACKS.diag_ne_mask[sq.index()])
    }

    pub fn se_diag_state(&self, sq: Square) -> usize {
        diagonal_state(self.occupied().0, ATTACKS.diag_se_mask[sq.index()])
    }

    /// Squares a rook on `sq` attacks with the current occupancy.
    pub fn rook_attacks(&self, sq: Square) -> Bitboard {
        let i = sq.index();
        Bitboard(ATTACKS.rank[i][self.rank_state(sq)] | ATTACKS.file[i][self.file_state(sq)])
    }

    /// Squares a bishop on `sq` attacks with the current occupancy.
    pub fn bishop_attacks(&self, sq: Square) -> Bitboard {
        let i = sq.index();
        Bitboard(ATTACKS.diag_ne[i][self.ne_diag_state(sq)] | ATTACKS.diag_se[i][self.se_diag_state(sq)])
    }

    /// The squares holding pieces of `defender`'s opponent that attack `sq`.
    pub fn is_attacked(&self, sq: Square, defender: Color) -> Bitboard {
        if !sq.is_valid() {
            return Bitboard::EMPTY;
        }
        let enemy = self.colors[defender.opposite().index()];
        let i = sq.index();
        let piece = |kind: PieceType| self.pieces[kind.index()] & enemy;

        let queens = piece(PieceType::Queen);
        let mut attackers = Bitboard(ATTACKS.pawn[defender.index()][i]) & piece(PieceType::Pawn);
        attackers |= Bitboard(ATTACKS.knight[i]) & piece(PieceType::Knight);
        attackers |= Bitboard(ATTACKS.king[i]) & piece(PieceType::King);
        attackers |= self.rook_attacks(sq) & (piece(PieceType::Rook) | queens);
        attackers |= self.bishop_attacks(sq) & (piece(PieceType::Bishop) | queens);
        attackers
    }

    /// A side without a king is never in check.
    pub fn is_check(&self, color: Color) -> bool {
        let king = self.king_square(color);
        king.is_valid() && self.is_attacked(king, color).any()
    }

    /// Whether every square strictly between `from` and `to` is empty. Only
    /// meaningful for squares sharing a rank, file or diagonal.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        let step_file = (to.file - from.file).signum();
        let step_rank = (to.rank - from.rank).signum();
        let mut p = from.offset(step_file, step_rank);
        while p != to && p.is_valid() {
            if self.is_occupied(p) {
                return false;
            }
            p = p.offset(step_file, step_rank);
        }
        true
    }

    pub fn is_move_legal(&self, mv: &Move) -> bool {
        if !mv.is_valid() || mv.from == mv.to {
            return false;
        }
        if self.piece_at(mv.from) != Some(mv.piece) || !mv.is_shape_legal() {
            return false;
        }
        let color = mv.piece.color;
        if self.colors[color.index()].contains(mv.to) {
            return false;
        }
        if !self.is_promotion_consistent(mv) {
            return false;
        }
        if mv.piece.kind != PieceType::Knight && !self.is_path_clear(mv.from, mv.to) {
            return false;
        }

        match mv.piece.kind {
            PieceType::Pawn if mv.file_diff() == 1 => {
                if !self.colors[color.opposite().index()].contains(mv.to) && !self.is_en_passant_target(mv) {
                    return false;
                }
            }
            PieceType::Pawn => {
                if self.is_occupied(mv.to) {
                    return false;
                }
            }
            PieceType::King if mv.file_diff() == 2 => {
                if !self.can_castle(mv) {
                    return false;
                }
            }
            _ => {}
        }

        !self.is_result_check(mv)
    }

    // Only a target left by the opponent counts: rank 6 for white, rank 3 for black.
    fn is_en_passant_target(&self, mv: &Move) -> bool {
        mv.to.rank == mv.piece.color.opposite().en_passant_rank() && self.is_en_passant_set(mv.to)
    }

    // A pawn reaching its last rank has to name a promotion, nothing else may.
    fn is_promotion_consistent(&self, mv: &Move) -> bool {
        let reaches_last_rank =
            mv.piece.kind == PieceType::Pawn && mv.to.rank == mv.piece.color.promotion_rank();
        match mv.promotion {
            Some(kind) => reaches_last_rank && PieceType::PROMOTIONS.contains(&kind),
            None => !reaches_last_rank,
        }
    }

    /// Castling conditions for a king move two files sideways.
    pub fn can_castle(&self, mv: &Move) -> bool {
        let color = mv.piece.color;
        let rook_square = if mv.signed_file_diff() > 0 {
            Square::new(7, mv.from.rank)
        } else {
            Square::new(0, mv.from.rank)
        };
        if !self.castling.contains(mv.from) || !self.castling.contains(rook_square) {
            return false;
        }
        if self.piece_at(rook_square) != Some(Piece::new(color, PieceType::Rook)) {
            return false;
        }
        if self.is_attacked(mv.from, color).any() || self.is_attacked(mv.to, color).any() {
            return false;
        }
        if !self.is_path_clear(mv.from, rook_square) {
            return false;
        }
        let passed = mv.from.offset(mv.signed_file_diff().signum(), 0);
        self.is_attacked(passed, color).is_empty()
    }

    /// Whether playing `mv` would leave the mover's own king attacked.
    pub fn is_result_check(&self, mv: &Move) -> bool {
        let mut next = self.clone();
        match next.update(mv) {
            Ok(_) => next.is_check(mv.piece.color),
            Err(_) => true,
        }
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_check(color) && self.possible_moves(color, true).is_empty()
    }

    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_check(color) && self.possible_moves(color, true).is_empty()
    }

    /// Coarse insufficient material test: bare kings, or at most one minor
    /// piece besides them.
    pub fn is_material_draw(&self) -> bool {
        let total = self.total_pieces();
        if total >= 4 {
            return false;
        }
        if total <= 2 {
            return true;
        }
        let heavy = self.pieces_of_type(PieceType::Rook)
            | self.pieces_of_type(PieceType::Queen)
            | self.pieces_of_type(PieceType::Pawn);
        heavy.is_empty()
    }

    /// Applies a move already known to be legal and returns the captured
    /// piece, if any. A pawn reaching the last rank without a promotion type
    /// becomes a queen.
    pub fn update(&mut self, mv: &Move) -> ChessResult<Option<Piece>> {
        let piece = self.piece_at(mv.from).ok_or(ChessError::NoPieceAtSquare(mv.from))?;
        let mut captured = self.piece_at(mv.to);

        match piece.kind {
            PieceType::Pawn if mv.file_diff() == 1 && captured.is_none() && self.is_en_passant_target(mv) => {
                captured = self.remove_piece(Square::new(mv.to.file, mv.from.rank));
            }
            PieceType::King if mv.file_diff() == 2 => {
                let (rook_from, rook_to) = if mv.signed_file_diff() > 0 {
                    (Square::new(7, mv.from.rank), mv.from.e())
                } else {
                    (Square::new(0, mv.from.rank), mv.from.w())
                };
                if let Some(rook) = self.remove_piece(rook_from) {
                    self.set_piece(rook_to, rook);
                }
                self.castling.unset(rook_from);
            }
            _ => {}
        }

        self.remove_piece(mv.from);
        let placed = if piece.kind == PieceType::Pawn && mv.to.rank == piece.color.promotion_rank() {
            piece.promoted(mv.promotion.unwrap_or(PieceType::Queen))
        } else {
            piece
        };
        self.set_piece(mv.to, placed);
        self.set_special_flags(mv, piece);
        Ok(captured)
    }

    fn set_special_flags(&mut self, mv: &Move, piece: Piece) {
        // a side's en passant targets only live for the opponent's reply
        match piece.color {
            Color::White => self.en_passant &= Bitboard(!RANK_6),
            Color::Black => self.en_passant &= Bitboard(!RANK_3),
        }
        self.castling.unset(mv.to);
        match piece.kind {
            PieceType::Pawn if mv.rank_diff() == 2 => {
                let passed = match piece.color {
                    Color::White => mv.from.n(),
                    Color::Black => mv.from.s(),
                };
                self.en_passant.set(passed);
            }
            PieceType::King | PieceType::Rook => self.castling.unset(mv.from),
            _ => {}
        }
    }

    pub fn serialize(&self, side_to_move: Color) -> SerialBoard {
        let mut flags = ((self.en_passant.0 & RANK_3) >> 16) as u32 | ((self.en_passant.0 & RANK_6) >> 32) as u32;
        if side_to_move == Color::White {
            flags |= WHITE_TURN;
        }
        flags |= self.castling_rights();
        SerialBoard {
            pieces: self.pieces.map(|bb| bb.0),
            colors: self.colors.map(|bb| bb.0),
            flags,
        }
    }

    /// Parses long algebraic notation (`e2e4`, `e7e8q`) against this board.
    pub fn parse_move(&self, text: &str) -> ChessResult<Move> {
        let text = text.trim();
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(ChessError::InvalidMoveNotation(text.to_string()));
        }
        let from = Square::from_algebraic(&text[0..2])
            .map_err(|_| ChessError::InvalidMoveNotation(text.to_string()))?;
        let to = Square::from_algebraic(&text[2..4])
            .map_err(|_| ChessError::InvalidMoveNotation(text.to_string()))?;
        let piece = self.piece_at(from).ok_or(ChessError::NoPieceAtSquare(from))?;
        let mut mv = Move::new(from, to, piece);
        if let Some(c) = text.chars().nth(4) {
            match PieceType::from_char(c) {
                Some(kind) if PieceType::PROMOTIONS.contains(&kind) => mv = mv.with_promotion(kind),
                _ => return Err(ChessError::InvalidMoveNotation(text.to_string())),
            }
        }
        Ok(mv)
    }

    pub fn render_to_string(&self) -> String {
        let mut board_representation = String::new();
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");
        board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

        for rank in (0..8).rev() {
            board_representation.push_str(&format!("{} │", rank + 1));
            for file in 0..8 {
                let square = self.piece_at(Square::new(file, rank)).map_or(' ', |p| p.to_char());
                board_representation.push_str(&format!(" {} │", square));
            }
            board_representation.push_str(&format!(" {}\n", rank + 1));

            if rank > 0 {
                board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
            }
        }

        board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");

        board_representation
    }
}

impl fmt::Display for ChessBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_to_string())
    }
}
