pub mod chess_boards;
pub mod config;
pub mod engines;
pub mod error;
pub mod game;
