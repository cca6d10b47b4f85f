//! Error types for the rules engine and the players built on it.

use thiserror::Error;

use crate::chess_boards::chess_board::Square;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Text that does not name a square, like `i9`
    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    /// Text that is not a long algebraic move, like `e2e4` or `e7e8q`
    #[error("Invalid move notation: {0}")]
    InvalidMoveNotation(String),

    /// A move the rules do not allow in the current position
    #[error("Illegal move: {mv}")]
    IllegalMove { mv: String },

    #[error("Invalid FEN string: {0}")]
    InvalidFen(String),

    /// Board operation that needs a piece where there is none
    #[error("No piece at square {0}")]
    NoPieceAtSquare(Square),

    #[error("The game is already over")]
    GameOver,

    #[error("No move to undo")]
    NothingToUndo,

    #[error("No move to redo")]
    NothingToRedo,

    /// The background search thread died before reporting a move
    #[error("Search worker failed: {message}")]
    SearchWorker { message: String },
}

pub type ChessResult<T> = Result<T, ChessError>;
