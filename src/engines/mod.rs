use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::chess_boards::chess_board::Move;
use crate::game::GameState;

pub mod engine_alpha_beta;
pub mod engine_random;
pub mod evaluation;
pub mod worker;

pub use engine_alpha_beta::{AlphaBetaEngine, SearchResult};
pub use engine_random::RandomPlayer;
pub use worker::{SearchOutcome, SearchWorker};

/// Something that picks moves for one side of a game.
pub trait ChessPlayer: Send {
    fn name(&self) -> &str;
    /// The move to play in `state`, `None` when there is none or the abort
    /// flag is raised. The flag is left as it is.
    fn think(&mut self, state: &GameState) -> Option<Move>;
    /// Called with the opponent's reply once it has been played.
    fn opponent_move(&mut self, _mv: &Move, _state: &GameState) {}
    /// Called after a move was taken back; `state` is the restored position.
    fn undo_move(&mut self, _state: &GameState) {}
    /// Players whose moves come from the rules engine need no legality check.
    fn is_trustworthy(&self) -> bool;
    fn abort_handle(&self) -> Arc<AtomicBool>;
}
