use log::debug;

use super::GameState;
use crate::chess_boards::chess_board::Move;
use crate::engines::ChessPlayer;
use crate::error::{ChessError, ChessResult};

/// A game with undo/redo: every accepted move pushes the state it was played
/// from onto the history.
#[derive(Debug, Clone, Default)]
pub struct ChessGame {
    state: GameState,
    history: Vec<GameState>,
    redo: Vec<GameState>,
}

impl ChessGame {
    pub fn new() -> Self {
        ChessGame::default()
    }

    pub fn from_state(state: GameState) -> Self {
        ChessGame {
            state,
            history: Vec::new(),
            redo: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn new_game(&mut self) {
        self.state.reset();
        self.history.clear();
        self.redo.clear();
    }

    /// Plays `mv` for the side to move; `trusted` skips the legality check
    /// for players whose moves come from the rules engine itself.
    pub fn try_move(&mut self, mv: &Move, trusted: bool) -> ChessResult<()> {
        let before = self.state.clone();
        self.state.try_move(mv, trusted)?;
        self.history.push(before);
        self.redo.clear();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_move(&mut self) -> ChessResult<()> {
        let previous = self.history.pop().ok_or(ChessError::NothingToUndo)?;
        debug!("undo {:?}", self.state.last_move().map(|m| m.as_algebraic()));
        self.redo.push(std::mem::replace(&mut self.state, previous));
        Ok(())
    }

    /// Takes back the last move and tells every player about it.
    pub fn undo_move_for(&mut self, players: &mut [&mut dyn ChessPlayer]) -> ChessResult<()> {
        self.undo_move()?;
        for player in players.iter_mut() {
            player.undo_move(&self.state);
        }
        Ok(())
    }

    pub fn redo_move(&mut self) -> ChessResult<()> {
        let next = self.redo.pop().ok_or(ChessError::NothingToRedo)?;
        self.history.push(std::mem::replace(&mut self.state, next));
        debug!("redo {:?}", self.state.last_move().map(|m| m.as_algebraic()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use crate::chess_boards::chess_board::{ChessBoard, Color};

    fn play(game: &mut ChessGame, text: &str) {
        let mv = game.state().board().parse_move(text).unwrap();
        game.try_move(&mv, false).unwrap();
    }

    #[test]
    fn test_undo_and_redo() {
        let mut game = ChessGame::new();
        assert_eq!(game.undo_move(), Err(ChessError::NothingToUndo));
        play(&mut game, "e2e4");
        play(&mut game, "c7c5");
        let after_two = game.state().to_fen();

        game.undo_move().unwrap();
        assert_eq!(game.state().turn(), Color::Black);
        game.undo_move().unwrap();
        assert_eq!(game.state().board(), &ChessBoard::standard());
        assert!(!game.can_undo());

        game.redo_move().unwrap();
        game.redo_move().unwrap();
        assert_eq!(game.state().to_fen(), after_two);
        assert_eq!(game.redo_move(), Err(ChessError::NothingToRedo));
    }

    #[test]
    fn test_new_move_clears_redo() {
        let mut game = ChessGame::new();
        play(&mut game, "e2e4");
        game.undo_move().unwrap();
        assert!(game.can_redo());
        play(&mut game, "d2d4");
        assert!(!game.can_redo());
        assert_eq!(game.state().last_move().map(|m| m.as_algebraic()), Some("d2d4".to_string()));
    }

    #[derive(Default)]
    struct UndoCounter {
        undos: u32,
        restored_turn: Option<Color>,
    }

    impl ChessPlayer for UndoCounter {
        fn name(&self) -> &str {
            "undo counter"
        }
        fn think(&mut self, _state: &GameState) -> Option<Move> {
            None
        }
        fn undo_move(&mut self, state: &GameState) {
            self.undos += 1;
            self.restored_turn = Some(state.turn());
        }
        fn is_trustworthy(&self) -> bool {
            false
        }
        fn abort_handle(&self) -> Arc<AtomicBool> {
            Arc::new(AtomicBool::new(false))
        }
    }

    #[test]
    fn test_undo_notifies_players() {
        let mut game = ChessGame::new();
        let mut white = UndoCounter::default();
        let mut black = UndoCounter::default();
        play(&mut game, "e2e4");

        game.undo_move_for(&mut [&mut white, &mut black]).unwrap();
        assert_eq!(white.undos, 1);
        assert_eq!(black.undos, 1);
        assert_eq!(black.restored_turn, Some(Color::White));

        assert_eq!(game.undo_move_for(&mut [&mut white, &mut black]), Err(ChessError::NothingToUndo));
        assert_eq!(white.undos, 1);
    }

    #[test]
    fn test_rejected_move_keeps_history() {
        let mut game = ChessGame::new();
        let mv = game.state().board().parse_move("e2e5").unwrap();
        assert!(game.try_move(&mv, false).is_err());
        assert!(!game.can_undo());
    }
}
