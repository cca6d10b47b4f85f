//! Static evaluation used at the search horizon.
//!
//! Scores are centipawns from the point of view of `turn`: material, then
//! piece-square bonuses, rook mobility, isolated pawns and, in the endgame, a
//! queen's distance to the enemy king.

use crate::chess_boards::chess_board::{Bitboard, ChessBoard, Color, PieceType, Square};

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 310;
pub const BISHOP_VALUE: i32 = 325;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
pub const KING_VALUE: i32 = 100_000;

/// Non-king material (both sides) below which the endgame tables apply.
pub const ENDGAME_MATERIAL: i32 = 3500;

pub fn piece_value(kind: PieceType) -> i32 {
    match kind {
        PieceType::Pawn => PAWN_VALUE,
        PieceType::Knight => KNIGHT_VALUE,
        PieceType::Bishop => BISHOP_VALUE,
        PieceType::Rook => ROOK_VALUE,
        PieceType::Queen => QUEEN_VALUE,
        PieceType::King => 0,
    }
}

// Tables are indexed by square, a1 first.
#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -5, -5, -5, -5, -5, -5, -5, -5,
    -5, 10,  5, 10, 10,  5, 10, -5,
    -5,  5,  3, 12, 12,  3,  5, -5,
    -5,  3, 12,  3,  3, 12,  3, -5,
    -5,  3, 12,  3,  3, 12,  3, -5,
    -5,  5,  3, 12, 12,  3,  5, -5,
    -5, 10,  5, 10, 10,  5, 10, -5,
    -5, -5, -5, -5, -5, -5, -5, -5,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -10, -5, -5, -5, -5, -5, -5, -10,
     -5,  0,  0,  3,  3,  0,  0,  -5,
     -5,  0,  5,  5,  5,  5,  0,  -5,
     -5,  0,  5, 10, 10,  5,  0,  -5,
     -5,  0,  5, 10, 10,  5,  0,  -5,
     -5,  0,  5,  5,  5,  5,  0,  -5,
     -5,  0,  0,  3,  3,  0,  0,  -5,
    -10, -5, -5, -5, -5, -5, -5, -10,
];

#[rustfmt::skip]
const WHITE_PAWN_TABLE: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0, 0,
    0,  0,  0, -5, -5,  0,  0, 0,
    1,  2,  3,  4,  4,  3,  2, 1,
    2,  4,  6,  8,  8,  6,  4, 2,
    3,  6,  9, 12, 12,  9,  6, 3,
    4,  8, 12, 16, 16, 12,  8, 4,
    5, 10, 15, 20, 20, 15, 10, 5,
    0,  0,  0,  0,  0,  0,  0, 0,
];

#[rustfmt::skip]
const BLACK_PAWN_TABLE: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0, 0,
    5, 10, 15, 20, 20, 15, 10, 5,
    4,  8, 12, 16, 16, 12,  8, 4,
    3,  6,  9, 12, 12,  9,  6, 3,
    2,  4,  6,  8,  8,  6,  4, 2,
    1,  2,  3,  4,  4,  3,  2, 1,
    0,  0,  0, -5, -5,  0,  0, 0,
    0,  0,  0,  0,  0,  0,  0, 0,
];

#[rustfmt::skip]
const WHITE_KING_TABLE: [i32; 64] = [
      2,  10,   4,   0,   0,   7,  10,   2,
     -3,  -3,  -5,  -5,  -5,  -5,  -3,  -3,
     -5,  -5,  -8,  -8,  -8,  -8,  -5,  -5,
     -8,  -8, -13, -13, -13, -13,  -8,  -8,
    -13, -13, -21, -21, -21, -21, -13, -13,
    -21, -21, -34, -34, -34, -34, -21, -21,
    -34, -34, -55, -55, -55, -55, -34, -34,
    -55, -55, -89, -89, -89, -89, -55, -55,
];

#[rustfmt::skip]
const BLACK_KING_TABLE: [i32; 64] = [
    -55, -55, -89, -89, -89, -89, -55, -55,
    -34, -34, -55, -55, -55, -55, -34, -34,
    -21, -21, -34, -34, -34, -34, -21, -21,
    -13, -13, -21, -21, -21, -21, -13, -13,
     -8,  -8, -13, -13, -13, -13,  -8,  -8,
     -5,  -5,  -8,  -8,  -8,  -8,  -5,  -5,
     -3,  -3,  -5,  -5,  -5,  -5,  -3,  -3,
      2,  10,   4,   0,   0,   7,  10,   2,
];

#[rustfmt::skip]
const ENDGAME_KING_TABLE: [i32; 64] = [
    -5, -3, -1,  0,  0, -1, -3, -5,
    -3,  5,  5,  5,  5,  5,  5, -3,
    -1,  5, 10, 10, 10, 10,  5, -1,
     0,  5, 10, 15, 15, 10,  5,  0,
     0,  5, 10, 15, 15, 10,  5,  0,
    -1,  5, 10, 10, 10, 10,  5, -1,
    -3,  5,  5,  5,  5,  5,  5, -3,
    -5, -3, -1,  0,  0, -1, -3, -5,
];

/// Evaluates `board` for the side `turn`; positive means `turn` is better.
pub fn evaluate(board: &ChessBoard, turn: Color) -> i32 {
    let sign = |color: Color| if color == turn { 1 } else { -1 };

    let mut balance = 0;
    let mut material = 0;
    for (_, piece) in board.pieces_with_squares() {
        let value = piece_value(piece.kind);
        balance += sign(piece.color) * value;
        material += value;
    }
    let endgame = material < ENDGAME_MATERIAL;

    for (square, piece) in board.pieces_with_squares() {
        let i = square.index();
        let bonus = match piece.kind {
            PieceType::Queen => queen_bonus(board, square, piece.color, endgame),
            PieceType::Rook => rook_bonus(board, square),
            PieceType::Bishop => BISHOP_TABLE[i],
            PieceType::Knight => KNIGHT_TABLE[i],
            PieceType::Pawn => pawn_bonus(board, square, piece.color),
            PieceType::King => {
                let table = match (endgame, piece.color) {
                    (true, _) => &ENDGAME_KING_TABLE,
                    (false, Color::White) => &WHITE_KING_TABLE,
                    (false, Color::Black) => &BLACK_KING_TABLE,
                };
                // a mated king no longer protects its side's material
                let value = if board.is_checkmate(piece.color) { 0 } else { KING_VALUE };
                table[i] + value
            }
        };
        balance += sign(piece.color) * bonus;
    }

    balance
}

// Endgame only: the closer to the enemy king, the better.
fn queen_bonus(board: &ChessBoard, square: Square, color: Color, endgame: bool) -> i32 {
    let enemy_king = board.king_square(color.opposite());
    if !endgame || !enemy_king.is_valid() {
        return 0;
    }
    let file_diff = (enemy_king.file - square.file).abs() as i32;
    let rank_diff = (enemy_king.rank - square.rank).abs() as i32;
    -2 * (file_diff + rank_diff)
}

// Up to 20 points for a rook attacking 12 squares or more.
fn rook_bonus(board: &ChessBoard, square: Square) -> i32 {
    let attacked = board.rook_attacks(square).count() as i32;
    if attacked < 12 {
        2 * attacked - 4
    } else {
        20
    }
}

fn pawn_bonus(board: &ChessBoard, square: Square, color: Color) -> i32 {
    let table = match color {
        Color::White => &WHITE_PAWN_TABLE,
        Color::Black => &BLACK_PAWN_TABLE,
    };
    let mut bonus = table[square.index()];
    if is_isolated_pawn(board, square, color) {
        bonus -= match square.file {
            0 | 7 => 12,
            1 | 6 => 14,
            2 | 5 => 16,
            _ => 20,
        };
    }
    bonus
}

/// No friendly pawn on either neighbouring file.
pub fn is_isolated_pawn(board: &ChessBoard, square: Square, color: Color) -> bool {
    let pawns = board.pieces_of(color, PieceType::Pawn);
    [square.e(), square.w()]
        .iter()
        .filter(|neighbour| neighbour.is_valid())
        .all(|neighbour| (pawns & Bitboard::mask_file(*neighbour)).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(fen: &str) -> ChessBoard {
        ChessBoard::from_fen(fen).unwrap()
    }

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_initial_position_is_balanced() {
        let board = ChessBoard::standard();
        assert_eq!(evaluate(&board, Color::White), 0);
        assert_eq!(evaluate(&board, Color::Black), 0);
    }

    #[test]
    fn test_evaluation_is_antisymmetric() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "4k3/8/8/8/8/8/3Q4/4K3 w - - 0 1",
        ] {
            let board = position(fen);
            assert_eq!(evaluate(&board, Color::White), -evaluate(&board, Color::Black));
        }
    }

    #[test]
    fn test_material_advantage() {
        let board = position("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(evaluate(&board, Color::White) > 800);
        assert!(evaluate(&board, Color::Black) < -800);
    }

    #[test]
    fn test_lone_isolated_pawn() {
        // pawn 100, table 8, isolated on the d file -20, both kings on 0 squares of the endgame table
        let board = position("4k3/8/8/8/3P4/8/8/4K3 w - - 0 1");
        assert!(is_isolated_pawn(&board, sq("d4"), Color::White));
        assert_eq!(evaluate(&board, Color::White), 88);

        let supported = position("4k3/8/8/8/3P4/8/4P3/4K3 w - - 0 1");
        assert!(!is_isolated_pawn(&supported, sq("d4"), Color::White));
    }

    #[test]
    fn test_rook_mobility() {
        let open = position("4k3/8/8/8/3R4/8/8/4K3 w - - 0 1");
        assert_eq!(rook_bonus(&open, sq("d4")), 20);
        let cornered = ChessBoard::standard();
        assert_eq!(rook_bonus(&cornered, sq("a1")), 0);
    }

    #[test]
    fn test_endgame_queen_seeks_enemy_king() {
        let near = position("4k3/8/4Q3/8/8/8/8/4K3 w - - 0 1");
        let far = position("4k3/8/8/8/8/8/Q7/4K3 w - - 0 1");
        assert_eq!(queen_bonus(&near, sq("e6"), Color::White, true), -4);
        assert_eq!(queen_bonus(&far, sq("a2"), Color::White, true), -20);
        assert_eq!(queen_bonus(&far, sq("a2"), Color::White, false), 0);
    }

    #[test]
    fn test_mated_king_loses_its_value() {
        let mated = position("1k6/8/8/8/8/8/PPn5/KN6 w - - 0 1");
        assert!(mated.is_checkmate(Color::White));
        assert!(evaluate(&mated, Color::Black) > KING_VALUE / 2);
        assert!(evaluate(&mated, Color::White) < -KING_VALUE / 2);
    }
}
