use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;

use log::{debug, trace};

use super::evaluation::evaluate;
use super::ChessPlayer;
use crate::chess_boards::chess_board::{ChessBoard, Color, Move};
use crate::config::EngineConfig;
use crate::game::GameState;

pub const INFINITY: i32 = i32::MAX;
/// Score of a side that is mated with no moves left; shallower mates score higher.
pub const MATE: i32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub nodes: u64,
    pub depth: u32,
}

/// Fixed-depth negamax with alpha-beta pruning. The board handed in is
/// cloned for every move tried, the caller's position is never touched.
pub struct AlphaBetaEngine {
    config: EngineConfig,
    aborted: Arc<AtomicBool>,
    nodes: u64,
}

impl AlphaBetaEngine {
    pub fn new(config: EngineConfig) -> Self {
        AlphaBetaEngine {
            config,
            aborted: Arc::new(AtomicBool::new(false)),
            nodes: 0,
        }
    }

    pub fn with_depth(depth: u32) -> Self {
        AlphaBetaEngine::new(EngineConfig::default().with_depth(depth))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Best move for `color`, `None` when it has no legal move or the search
    /// was aborted. Depth 0 scores each root move statically.
    pub fn search(&mut self, board: &ChessBoard, color: Color) -> Option<SearchResult> {
        let depth = self.config.depth;
        self.nodes = 0;

        let mut best: Option<(Move, i32)> = None;
        let mut alpha = -INFINITY;
        for mv in board.possible_moves(color, false) {
            if self.aborted.load(Relaxed) {
                return None;
            }
            let Some(child) = self.play(board, &mv) else {
                continue;
            };
            let score = if depth == 0 {
                evaluate(&child, color)
            } else {
                -self.negamax(&child, color.opposite(), depth - 1, -INFINITY, -alpha)
            };
            if self.aborted.load(Relaxed) {
                debug!("search aborted after {} nodes", self.nodes);
                return None;
            }
            trace!("{} scores {}", mv, score);

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((mv, score));
                alpha = alpha.max(score);
            }
        }

        let (best_move, score) = best?;
        debug!(
            "depth {} searched {} nodes, best move {} ({})",
            depth, self.nodes, best_move, score
        );
        Some(SearchResult {
            best_move,
            score,
            nodes: self.nodes,
            depth,
        })
    }

    fn negamax(&mut self, board: &ChessBoard, color: Color, depth: u32, mut alpha: i32, beta: i32) -> i32 {
        let mut any_move = false;
        for mv in board.possible_moves(color, false) {
            // the root throws the score away
            if self.aborted.load(Relaxed) {
                return 0;
            }
            let Some(child) = self.play(board, &mv) else {
                continue;
            };
            any_move = true;
            let score = if depth == 0 {
                evaluate(&child, color)
            } else {
                -self.negamax(&child, color.opposite(), depth - 1, -beta, -alpha)
            };
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                return beta;
            }
        }

        if any_move {
            alpha
        } else if board.is_check(color) {
            -(MATE + depth as i32)
        } else {
            0
        }
    }

    // The position after `mv`, skipping moves the board refuses.
    fn play(&mut self, board: &ChessBoard, mv: &Move) -> Option<ChessBoard> {
        if !board.is_move_legal(mv) {
            return None;
        }
        let mut child = board.clone();
        child.update(mv).ok()?;
        self.nodes += 1;
        Some(child)
    }
}

impl ChessPlayer for AlphaBetaEngine {
    fn name(&self) -> &str {
        "Brutal Alpha Beta Engine"
    }

    fn think(&mut self, state: &GameState) -> Option<Move> {
        self.search(state.board(), state.turn()).map(|result| result.best_move)
    }

    fn is_trustworthy(&self) -> bool {
        true
    }

    fn abort_handle(&self) -> Arc<AtomicBool> {
        self.aborted.clone()
    }
}
