pub mod chess_game;
pub mod game_state;

pub use chess_game::ChessGame;
pub use game_state::{DrawReason, GameState, GameStatus};
