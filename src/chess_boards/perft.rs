use crate::chess_boards::chess_board::{ChessBoard, Color, Move};

/// Counts the leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(board: &ChessBoard, color: Color, depth: u8) -> u64 {
    let mut node_count = 0u64;

    if depth == 0 {
        return 1u64;
    }

    for mv in board.possible_moves(color, false) {
        let mut new_board = board.clone();
        if new_board.update(&mv).is_ok() {
            node_count += perft(&new_board, color.opposite(), depth - 1);
        }
    }
    node_count
}

/// Node counts below each root move.
pub fn perft_divide(board: &ChessBoard, color: Color, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    board
        .possible_moves(color, false)
        .into_iter()
        .filter_map(|mv| {
            let mut new_board = board.clone();
            new_board
                .update(&mv)
                .ok()
                .map(|_| (mv, perft(&new_board, color.opposite(), depth - 1)))
        })
        .collect()
}
