use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info};

use crate::chess_boards::chess_board::fen::{from_fen, to_fen};
use crate::chess_boards::chess_board::{ChessBoard, Color, Move, Piece, PieceType, SerialBoard, Square};
use crate::error::{ChessError, ChessResult};

/// Half-moves without a pawn move or capture that end the game.
pub const FIFTY_MOVE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    Material,
    FiftyMoves,
    Threefold,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawReason::Stalemate => write!(f, "stalemate"),
            DrawReason::Material => write!(f, "insufficient material"),
            DrawReason::FiftyMoves => write!(f, "fifty move rule"),
            DrawReason::Threefold => write!(f, "threefold repetition"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Fresh,
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Fresh | GameStatus::InProgress)
    }
}

/// A board plus everything needed to run a game on it: side to move, move
/// counters and the positions seen so far.
#[derive(Debug, Clone)]
pub struct GameState {
    board: ChessBoard,
    turn: Color,
    turn_number: u32,
    last_move: Option<Move>,
    check: bool,
    halfmove_clock: u32,
    repetitions: BTreeMap<SerialBoard, u32>,
    threefold: bool,
    captured: Vec<Piece>,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        let mut state = GameState {
            board: ChessBoard::standard(),
            turn: Color::White,
            turn_number: 1,
            last_move: None,
            check: false,
            halfmove_clock: 0,
            repetitions: BTreeMap::new(),
            threefold: false,
            captured: Vec::new(),
        };
        state.reset();
        state
    }

    /// Back to the initial position with an empty history.
    pub fn reset(&mut self) {
        self.board = ChessBoard::standard();
        self.turn = Color::White;
        self.turn_number = 1;
        self.last_move = None;
        self.check = false;
        self.halfmove_clock = 0;
        self.threefold = false;
        self.captured.clear();
        self.repetitions.clear();
        self.repetitions.insert(self.board.serialize(self.turn), 1);
    }

    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let position = from_fen(fen)?;
        let mut repetitions = BTreeMap::new();
        repetitions.insert(position.board.serialize(position.active_color), 1);
        Ok(GameState {
            check: position.board.is_check(position.active_color),
            board: position.board,
            turn: position.active_color,
            turn_number: position.fullmove_number,
            last_move: None,
            halfmove_clock: position.halfmove_clock,
            repetitions,
            threefold: false,
            captured: Vec::new(),
        })
    }

    pub fn to_fen(&self) -> String {
        to_fen(&self.board, self.turn, self.halfmove_clock, self.turn_number)
    }

    pub fn board(&self) -> &ChessBoard {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Pieces taken so far, in the order they were captured.
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.piece_at(sq)
    }

    /// Whether the side to move may pick up the piece on `sq`.
    pub fn is_position_selectable(&self, sq: Square) -> bool {
        self.board.pieces_of_color(self.turn).contains(sq)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.possible_moves(self.turn, false)
    }

    /// How often the current position has occurred since the last pawn move or capture.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions
            .get(&self.board.serialize(self.turn))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_check(&self) -> bool {
        self.check
    }

    pub fn is_checkmate(&self) -> bool {
        self.check && self.board.is_checkmate(self.turn)
    }

    pub fn is_stalemate(&self) -> bool {
        self.board.is_stalemate(self.turn)
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_LIMIT
    }

    pub fn is_threefold(&self) -> bool {
        self.threefold
    }

    pub fn is_draw(&self) -> bool {
        self.draw_reason().is_some()
    }

    pub fn draw_reason(&self) -> Option<DrawReason> {
        if self.is_stalemate() {
            Some(DrawReason::Stalemate)
        } else if self.board.is_material_draw() {
            Some(DrawReason::Material)
        } else if self.is_fifty_move_draw() {
            Some(DrawReason::FiftyMoves)
        } else if self.threefold {
            Some(DrawReason::Threefold)
        } else {
            None
        }
    }

    pub fn status(&self) -> GameStatus {
        if self.is_checkmate() {
            return GameStatus::Checkmate {
                winner: self.turn.opposite(),
            };
        }
        match self.draw_reason() {
            Some(DrawReason::Stalemate) => GameStatus::Stalemate,
            Some(reason) => GameStatus::Draw(reason),
            None if self.last_move.is_none() => GameStatus::Fresh,
            None => GameStatus::InProgress,
        }
    }

    /// Plays `mv` after checking it, unless the source is trusted. A rejected
    /// move leaves the state untouched.
    pub fn try_move(&mut self, mv: &Move, trusted: bool) -> ChessResult<()> {
        if self.status().is_over() {
            return Err(ChessError::GameOver);
        }
        if !trusted && (mv.piece.color != self.turn || !self.board.is_move_legal(mv)) {
            debug!("rejected move {} for {}", mv, self.turn);
            return Err(ChessError::IllegalMove { mv: mv.to_string() });
        }
        self.update(mv)
    }

    /// Plays a move known to be legal.
    pub fn update(&mut self, mv: &Move) -> ChessResult<()> {
        let captured = self.board.update(mv)?;

        if mv.piece.kind == PieceType::Pawn || captured.is_some() {
            // nothing before an irreversible move can repeat
            self.halfmove_clock = 0;
            self.repetitions.clear();
        } else {
            self.halfmove_clock += 1;
        }
        if let Some(piece) = captured {
            self.captured.push(piece);
        }

        info!("{}. {} {}", self.turn_number, mv.from, mv.to);

        self.last_move = Some(*mv);
        if self.turn == Color::Black {
            self.turn_number += 1;
        }
        self.turn = self.turn.opposite();
        self.check = self.board.is_check(self.turn);

        let count = self.repetitions.entry(self.board.serialize(self.turn)).or_insert(0);
        *count += 1;
        if *count >= 3 {
            self.threefold = true;
        }
        Ok(())
    }
}
