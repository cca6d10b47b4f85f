use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use log::debug;

use super::ChessPlayer;
use crate::chess_boards::chess_board::Move;
use crate::error::{ChessError, ChessResult};
use crate::game::GameState;

/// What a finished search hands back: the player itself and its move.
pub struct SearchOutcome {
    pub player: Box<dyn ChessPlayer>,
    pub best_move: Option<Move>,
}

/// Runs one `think` call on a background thread over a snapshot of the game.
pub struct SearchWorker {
    receiver: Receiver<SearchOutcome>,
    aborted: Arc<AtomicBool>,
}

impl SearchWorker {
    pub fn spawn(mut player: Box<dyn ChessPlayer>, state: GameState) -> ChessResult<Self> {
        let aborted = player.abort_handle();
        aborted.store(false, Relaxed);
        let (sender, receiver) = mpsc::channel();

        thread::Builder::new()
            .name("search".to_string())
            .spawn(move || {
                debug!("{} thinking for {}", player.name(), state.turn());
                let best_move = player.think(&state);
                // the receiver may have been dropped, nobody wants the result then
                let _ = sender.send(SearchOutcome { player, best_move });
            })
            .map_err(|e| ChessError::SearchWorker { message: e.to_string() })?;

        Ok(SearchWorker { receiver, aborted })
    }

    /// The outcome if the search has finished.
    pub fn poll(&self) -> ChessResult<Option<SearchOutcome>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Ok(Some(outcome)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(disconnected()),
        }
    }

    /// Blocks until the search has finished.
    pub fn wait(self) -> ChessResult<SearchOutcome> {
        self.receiver.recv().map_err(|_| disconnected())
    }

    /// Asks the player to stop; it returns without a move at its next check.
    pub fn cancel(&self) {
        self.aborted.store(true, Relaxed);
    }
}

fn disconnected() -> ChessError {
    ChessError::SearchWorker {
        message: "search thread ended without a result".to_string(),
    }
}
