use super::bitboard::Bitboard;
use super::serial_board::{BLACK_KINGSIDE, BLACK_QUEENSIDE, WHITE_KINGSIDE, WHITE_QUEENSIDE};
use super::ChessBoard;
use super::{Color, Piece, PieceType, Square};
use crate::error::{ChessError, ChessResult};

pub const INITIAL_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Everything a FEN string describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenPosition {
    pub board: ChessBoard,
    pub active_color: Color,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

fn invalid(message: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(message.into())
}

/// Parses a FEN string and sets up a ChessBoard.
pub fn from_fen(fen: &str) -> ChessResult<FenPosition> {
    let mut board = ChessBoard::new();
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 6 {
        return Err(invalid("must have 6 parts"));
    }

    // Parse board squares
    let rows: Vec<&str> = parts[0].split('/').collect();
    if rows.len() != 8 {
        return Err(invalid("expected 8 rows"));
    }

    for (row_index, row) in rows.iter().enumerate() {
        let rank = 7 - row_index as i8;
        let mut file = 0i8;

        for c in row.chars() {
            if file > 7 {
                return Err(invalid("too many columns"));
            }
            if let Some(skip) = c.to_digit(10) {
                file += skip as i8;
            } else {
                let piece = Piece::from_char(c).ok_or_else(|| invalid(format!("invalid piece character {}", c)))?;
                board.set_piece(Square::new(file, rank), piece);
                file += 1;
            }
        }
        if file != 8 {
            return Err(invalid(format!("row {} does not cover 8 squares", row_index + 1)));
        }
    }

    let active_color = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(invalid("invalid active color")),
    };

    // Castling flags are only kept where king and rook still stand at home
    let mut castling = Bitboard::EMPTY;
    for c in parts[2].chars() {
        let (color, rook_file) = match c {
            'K' => (Color::White, 7),
            'Q' => (Color::White, 0),
            'k' => (Color::Black, 7),
            'q' => (Color::Black, 0),
            '-' => continue,
            _ => return Err(invalid(format!("invalid castling right {}", c))),
        };
        let king = Square::new(4, color.home_rank());
        let rook = Square::new(rook_file, color.home_rank());
        if board.piece_at(king) == Some(Piece::new(color, PieceType::King))
            && board.piece_at(rook) == Some(Piece::new(color, PieceType::Rook))
        {
            castling.set(king);
            castling.set(rook);
        }
    }
    board.set_castling_flags(castling);

    if parts[3] != "-" {
        let target = Square::from_algebraic(parts[3]).map_err(|_| invalid(format!("invalid en passant square {}", parts[3])))?;
        // the target is left behind by the side that just moved
        if target.rank != active_color.opposite().en_passant_rank() {
            return Err(invalid(format!(
                "en passant square {} does not fit {} to move",
                target, active_color
            )));
        }
        board.set_en_passant(target);
    }

    let halfmove_clock = parts[4]
        .parse::<u32>()
        .map_err(|_| invalid(format!("halfmove clock is not a valid number: {}", parts[4])))?;

    let fullmove_number = parts[5]
        .parse::<u32>()
        .map_err(|_| invalid(format!("fullmove number is not a valid number: {}", parts[5])))?;

    Ok(FenPosition {
        board,
        active_color,
        halfmove_clock,
        fullmove_number,
    })
}

pub fn to_fen(board: &ChessBoard, active_color: Color, halfmove_clock: u32, fullmove_number: u32) -> String {
    let mut board_representation = String::new();

    for rank in (0..8).rev() {
        let mut empty_count = 0;

        for file in 0..8 {
            match board.piece_at(Square::new(file, rank)) {
                Some(piece) => {
                    if empty_count > 0 {
                        board_representation.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    board_representation.push(piece.to_char());
                }
                None => {
                    empty_count += 1;
                }
            }
        }

        if empty_count > 0 {
            board_representation.push_str(&empty_count.to_string());
        }

        if rank > 0 {
            board_representation.push('/');
        }
    }

    let active_color = if active_color == Color::White { "w" } else { "b" };

    let rights = board.castling_rights();
    let castling: String = [
        (WHITE_KINGSIDE, 'K'),
        (WHITE_QUEENSIDE, 'Q'),
        (BLACK_KINGSIDE, 'k'),
        (BLACK_QUEENSIDE, 'q'),
    ]
    .iter()
    .filter(|(flag, _)| rights & flag != 0)
    .map(|(_, c)| *c)
    .collect();
    let castling = if castling.is_empty() { "-".to_string() } else { castling };

    let en_passant_square = match board.en_passant_flags().first() {
        Some(square) => square.as_algebraic(),
        None => "-".to_string(),
    };

    format!(
        "{} {} {} {} {} {}",
        board_representation, active_color, castling, en_passant_square, halfmove_clock, fullmove_number
    )
}
