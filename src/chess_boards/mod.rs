pub mod chess_board;
pub mod perft;
