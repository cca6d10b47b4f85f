use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use super::ChessPlayer;
use crate::chess_boards::chess_board::Move;
use crate::game::GameState;

/// Plays a uniformly chosen legal move; the same seed replays the same game.
pub struct RandomPlayer {
    rng: Pcg64,
    aborted: Arc<AtomicBool>,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        RandomPlayer {
            rng: Pcg64::seed_from_u64(seed),
            aborted: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl ChessPlayer for RandomPlayer {
    fn name(&self) -> &str {
        "Random Player"
    }

    fn think(&mut self, state: &GameState) -> Option<Move> {
        if self.aborted.load(Relaxed) {
            return None;
        }
        state.legal_moves().choose(&mut self.rng).copied()
    }

    fn is_trustworthy(&self) -> bool {
        true
    }

    fn abort_handle(&self) -> Arc<AtomicBool> {
        self.aborted.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playout(seed: u64, plies: usize) -> Vec<String> {
        let mut player = RandomPlayer::new(seed);
        let mut state = GameState::new();
        let mut moves = Vec::new();
        for _ in 0..plies {
            let Some(mv) = player.think(&state) else {
                break;
            };
            if state.try_move(&mv, false).is_err() {
                break;
            }
            moves.push(mv.as_algebraic());
        }
        moves
    }

    #[test]
    fn test_same_seed_same_game() {
        let first = playout(42, 30);
        assert!(!first.is_empty());
        assert_eq!(first, playout(42, 30));
    }

    #[test]
    fn test_moves_are_legal() {
        let mut player = RandomPlayer::new(1);
        let state = GameState::new();
        for _ in 0..20 {
            let mv = player.think(&state).unwrap();
            assert!(state.legal_moves().contains(&mv));
        }
    }

    #[test]
    fn test_no_move_when_mated() {
        let mut player = RandomPlayer::new(0);
        let state = GameState::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(player.think(&state), None);
    }
}
