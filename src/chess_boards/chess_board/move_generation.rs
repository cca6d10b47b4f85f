use super::{ChessBoard, Color, Move, Piece, PieceType, Square};

type Step = fn(&Square) -> Square;

const DIAGONALS: [Step; 4] = [Square::ne, Square::nw, Square::se, Square::sw];
const STRAIGHTS: [Step; 4] = [Square::n, Square::w, Square::s, Square::e];

impl ChessBoard {
    /// Legal moves of `color`, in a fixed order: squares from a1 to h8, and
    /// per piece the order the candidates are generated in. With `find_one`
    /// the search stops at the first legal move.
    pub fn possible_moves(&self, color: Color, find_one: bool) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        let mut candidates = Vec::with_capacity(32);

        for from in self.pieces_of_color(color).squares() {
            candidates.clear();
            self.candidate_moves(from, &mut candidates);
            for mv in candidates.iter() {
                if self.is_move_legal(mv) {
                    moves.push(*mv);
                    if find_one {
                        return moves;
                    }
                }
            }
        }
        moves
    }

    /// Legal moves of the piece on `from`; empty for an empty square.
    pub fn legal_moves_from(&self, from: Square) -> Vec<Move> {
        let mut candidates = Vec::new();
        self.candidate_moves(from, &mut candidates);
        candidates.retain(|mv| self.is_move_legal(mv));
        candidates
    }

    // Shaped moves for the piece on `from`, legality unchecked.
    fn candidate_moves(&self, from: Square, out: &mut Vec<Move>) {
        let Some(piece) = self.piece_at(from) else {
            return;
        };
        match piece.kind {
            PieceType::Pawn => self.pawn_candidates(from, piece, out),
            PieceType::Knight => {
                let jumps = [
                    from.nw().n(),
                    from.nw().w(),
                    from.ne().n(),
                    from.ne().e(),
                    from.sw().s(),
                    from.sw().w(),
                    from.se().s(),
                    from.se().e(),
                ];
                push_steps(from, piece, &jumps, out);
            }
            PieceType::Bishop => self.ray_candidates(from, piece, &DIAGONALS, out),
            PieceType::Rook => self.ray_candidates(from, piece, &STRAIGHTS, out),
            PieceType::Queen => {
                self.ray_candidates(from, piece, &DIAGONALS, out);
                self.ray_candidates(from, piece, &STRAIGHTS, out);
            }
            PieceType::King => {
                let steps = [
                    from.n(),
                    from.ne(),
                    from.e(),
                    from.se(),
                    from.s(),
                    from.sw(),
                    from.w(),
                    from.nw(),
                    from.e().e(),
                    from.w().w(),
                ];
                push_steps(from, piece, &steps, out);
            }
        }
    }

    fn pawn_candidates(&self, from: Square, piece: Piece, out: &mut Vec<Move>) {
        let targets = match piece.color {
            Color::White => [from.n().n(), from.n(), from.ne(), from.nw()],
            Color::Black => [from.s().s(), from.s(), from.se(), from.sw()],
        };
        for to in targets.into_iter().filter(Square::is_valid) {
            let mv = Move::new(from, to, piece);
            if to.rank == piece.color.promotion_rank() {
                out.extend(PieceType::PROMOTIONS.iter().map(|kind| mv.with_promotion(*kind)));
            } else {
                out.push(mv);
            }
        }
    }

    // Every ray runs to the edge or to the first occupied square, inclusive.
    fn ray_candidates(&self, from: Square, piece: Piece, directions: &[Step], out: &mut Vec<Move>) {
        for step in directions {
            let mut to = step(&from);
            while to.is_valid() {
                out.push(Move::new(from, to, piece));
                if self.is_occupied(to) {
                    break;
                }
                to = step(&to);
            }
        }
    }
}

fn push_steps(from: Square, piece: Piece, targets: &[Square], out: &mut Vec<Move>) {
    out.extend(
        targets
            .iter()
            .filter(|to| to.is_valid())
            .map(|to| Move::new(from, *to, piece)),
    );
}

#[cfg(test)]
mod tests {
    use super::super::fen::INITIAL_POSITION;
    use super::super::test_utils::assert_moves;
    use super::*;

    fn moves_from(board: &ChessBoard, square: &str) -> Vec<Move> {
        board.legal_moves_from(Square::from_algebraic(square).unwrap())
    }

    fn play(board: &mut ChessBoard, text: &str) {
        let mv = board.parse_move(text).unwrap();
        board.update(&mv).unwrap();
    }

    #[test]
    fn test_initial_position_has_twenty_moves() {
        let board = ChessBoard::from_fen(INITIAL_POSITION).unwrap();
        let white = board.possible_moves(Color::White, false);
        assert_eq!(white.len(), 20);
        assert_eq!(white.iter().filter(|m| m.piece.kind == PieceType::Knight).count(), 4);
        assert_eq!(board.possible_moves(Color::Black, false).len(), 20);
        assert_eq!(board.possible_moves(Color::White, true).len(), 1);
    }

    #[test]
    fn test_generation_order_is_fixed() {
        let board = ChessBoard::standard();
        let moves: Vec<_> = board
            .possible_moves(Color::White, false)
            .iter()
            .map(|m| m.as_algebraic())
            .take(5)
            .collect();
        assert_eq!(moves, vec!["b1a3", "b1c3", "g1f3", "g1h3", "a2a4"]);
        assert_eq!(board.possible_moves(Color::White, false), board.clone().possible_moves(Color::White, false));
    }

    #[test]
    fn test_generate_pawn_moves() {
        let board = ChessBoard::from_fen("8/8/8/8/4P3/8/8/8 w - - 0 1").unwrap();
        assert_moves(moves_from(&board, "e4").into_iter(), vec!["e4e5"]);

        // Test blocked pawn a3 by a4
        let board = ChessBoard::from_fen("8/8/8/8/P7/P7/8/8 w - - 0 1").unwrap();
        assert_moves(moves_from(&board, "a3").into_iter(), vec![]);

        // blocked double push
        let board = ChessBoard::from_fen("8/8/8/8/8/n7/P7/8 w - - 0 1").unwrap();
        assert_moves(moves_from(&board, "a2").into_iter(), vec![]);

        let board = ChessBoard::from_fen("8/8/8/8/8/2p5/3P4/8 w - - 0 1").unwrap();
        assert_moves(moves_from(&board, "d2").into_iter(), vec!["d2d3", "d2d4", "d2c3"]);

        let board = ChessBoard::from_fen("8/3p4/2P1P3/8/8/8/8/8 b - - 0 1").unwrap();
        assert_moves(moves_from(&board, "d7").into_iter(), vec!["d7d6", "d7d5", "d7c6", "d7e6"]);
    }

    #[test]
    fn test_generate_promotions() {
        let board = ChessBoard::from_fen("1n6/P7/8/8/8/8/8/8 w - - 0 1").unwrap();
        assert_moves(
            moves_from(&board, "a7").into_iter(),
            vec!["a7a8q", "a7a8r", "a7a8b", "a7a8n", "a7b8q", "a7b8r", "a7b8b", "a7b8n"],
        );
        let board = ChessBoard::from_fen("8/8/8/8/8/8/6p1/8 b - - 0 1").unwrap();
        let kinds: Vec<_> = moves_from(&board, "g2").iter().filter_map(|m| m.promotion).collect();
        assert_eq!(kinds, PieceType::PROMOTIONS.to_vec());
    }

    #[test]
    fn test_generate_knight_moves() {
        // White knight at d4 can move to 8 possible squares
        let board = ChessBoard::from_fen("8/8/8/8/3N4/8/8/8 w - - 0 1").unwrap();
        let expected_moves = vec!["d4b3", "d4c2", "d4e2", "d4f3", "d4f5", "d4e6", "d4c6", "d4b5"];
        assert_moves(moves_from(&board, "d4").into_iter(), expected_moves);

        // Black knight at d4, one target taken by its own piece
        let board = ChessBoard::from_fen("8/8/8/5n2/3n4/8/8/8 b - - 0 1").unwrap();
        let expected_moves = vec!["d4b3", "d4c2", "d4e2", "d4f3", "d4e6", "d4c6", "d4b5"];
        assert_moves(moves_from(&board, "d4").into_iter(), expected_moves);

        let board = ChessBoard::from_fen("8/8/8/8/8/8/8/N7 w - - 0 1").unwrap();
        assert_moves(moves_from(&board, "a1").into_iter(), vec!["a1b3", "a1c2"]);
    }

    #[test]
    fn test_generate_bishop_moves() {
        let board = ChessBoard::from_fen("8/8/8/8/3B4/8/8/8 w - - 0 1").unwrap();
        let expected_moves = vec![
            "d4a7", "d4b6", "d4c5", "d4e3", "d4f2", "d4g1", //first diagonal
            "d4a1", "d4b2", "d4c3", "d4e5", "d4f6", "d4g7", "d4h8",
        ];
        assert_moves(moves_from(&board, "d4").into_iter(), expected_moves);

        // blocked by own piece on f6 and enemy on b2
        let board = ChessBoard::from_fen("8/8/5P2/8/3B4/8/1p6/8 w - - 0 1").unwrap();
        let expected_moves = vec!["d4a7", "d4b6", "d4c5", "d4e3", "d4f2", "d4g1", "d4b2", "d4c3", "d4e5"];
        assert_moves(moves_from(&board, "d4").into_iter(), expected_moves);
    }

    #[test]
    fn test_generate_rook_moves() {
        let board = ChessBoard::from_fen("8/8/8/8/3R4/8/8/8 w - - 0 1").unwrap();
        let expected_moves = vec![
            "d4d1", "d4d2", "d4d3", "d4d5", "d4d6", "d4d7", "d4d8", "d4a4", "d4b4", "d4c4", "d4e4", "d4f4", "d4g4",
            "d4h4",
        ];
        assert_moves(moves_from(&board, "d4").into_iter(), expected_moves);

        let board = ChessBoard::from_fen("8/8/3p4/8/1P1r4/8/8/8 b - - 0 1").unwrap();
        let expected_moves = vec!["d4d1", "d4d2", "d4d3", "d4d5", "d4b4", "d4c4", "d4e4", "d4f4", "d4g4", "d4h4"];
        assert_moves(moves_from(&board, "d4").into_iter(), expected_moves);
    }

    #[test]
    fn test_generate_queen_moves() {
        let board = ChessBoard::from_fen("8/8/8/8/3Q4/8/8/8 w - - 0 1").unwrap();
        let expected_moves = vec![
            "d4d1", "d4d2", "d4d3", "d4d5", "d4d6", "d4d7", "d4d8", "d4a4", "d4b4", "d4c4", "d4e4", "d4f4", "d4g4",
            "d4h4", "d4a7", "d4b6", "d4c5", "d4e3", "d4f2", "d4g1", //first diagonal
            "d4a1", "d4b2", "d4c3", "d4e5", "d4f6", "d4g7", "d4h8",
        ];
        assert_moves(moves_from(&board, "d4").into_iter(), expected_moves);
    }

    #[test]
    fn test_generate_king_moves() {
        let board = ChessBoard::from_fen("8/8/8/8/8/3K4/8/8 w - - 0 1").unwrap();
        let expected_moves = vec!["d3c2", "d3c3", "d3c4", "d3d2", "d3d4", "d3e2", "d3e3", "d3e4"];
        assert_moves(moves_from(&board, "d3").into_iter(), expected_moves);

        // the king may not step next to the other king
        let board = ChessBoard::from_fen("8/8/8/3k4/8/3K4/8/8 b - - 0 1").unwrap();
        let expected_moves = vec!["d5c5", "d5c6", "d5d6", "d5e5", "d5e6"];
        assert_moves(moves_from(&board, "d5").into_iter(), expected_moves);
    }

    #[test]
    fn test_generate_castling_moves() {
        let board = ChessBoard::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        assert_moves(moves_from(&board, "e1").into_iter(), vec!["e1d1", "e1f1", "e1g1", "e1c1"]);
        let board = ChessBoard::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w Kkq - 0 1").unwrap();
        assert_moves(moves_from(&board, "e1").into_iter(), vec!["e1d1", "e1f1", "e1g1"]);
    }

    #[test]
    fn test_pinned_piece() {
        let board = ChessBoard::from_fen("1k6/8/8/8/3q4/8/1R6/K7 w - - 0 1").unwrap();
        assert_moves(board.possible_moves(Color::White, false).into_iter(), vec!["a1a2", "a1b1"])
    }

    #[test]
    fn test_make_move_set_en_passant_legal() {
        let mut board = ChessBoard::from_fen("8/4p3/8/3P4/8/8/8/8 b - - 0 1").unwrap();
        play(&mut board, "e7e5");
        let expected_moves = vec!["d5d6", "d5e6"];
        assert_moves(moves_from(&board, "d5").into_iter(), expected_moves);

        let mut board = ChessBoard::from_fen("8/8/8/8/6p1/8/5P2/8 w - - 0 1").unwrap();
        play(&mut board, "f2f4");
        let expected_moves = vec!["g4g3", "g4f3"];
        assert_moves(moves_from(&board, "g4").into_iter(), expected_moves);
    }

    #[test]
    fn test_en_passant_discovered_check() {
        let mut board = ChessBoard::from_fen("8/2p5/3p4/KP5r/1R3pPk/8/4P3/8 b - g3 0 1").unwrap();
        play(&mut board, "h4g3");
        let expected_moves = vec!["g4g5", "g4h5"];
        assert_moves(moves_from(&board, "g4").into_iter(), expected_moves);

        // capturing en passant would expose the king on the fifth rank
        let board = ChessBoard::from_fen("8/8/8/KPp4r/8/8/8/7k w - c6 0 1").unwrap();
        assert_moves(moves_from(&board, "b5").into_iter(), vec!["b5b6"]);
    }
}
