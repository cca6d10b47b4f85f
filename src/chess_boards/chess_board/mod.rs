pub mod attack_tables;
pub mod bitboard;
pub mod fen;
pub mod model;
pub mod serial_board;
pub use bitboard::Bitboard;
pub use fen::{FenPosition, INITIAL_POSITION};
pub use model::{Color, Move, Piece, PieceType, Square};
pub use serial_board::SerialBoard;

mod chess_board;
mod move_generation;
#[cfg(test)]
pub mod test_utils;
pub use chess_board::{ChessBoard, INITIAL_CASTLING};
