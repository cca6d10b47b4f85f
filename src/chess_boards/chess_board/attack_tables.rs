//! Precomputed attack sets.
//!
//! Leapers (pawn captures, knight, king) get one set per square. Sliders get
//! one set per square and per occupancy state of the line through it: the
//! state is 8 bits of piece presence along that rank, file or diagonal, and the
//! set is what a rook/bishop standing on the square attacks given that
//! occupancy (each ray runs up to and including the first blocker).
//!
//! How the 8 state bits are read off the board:
//! - rank: bit `f` is the square on file `f`,
//! - file: bit `r` is the square on rank `r`,
//! - both diagonals: bit `f` is the diagonal's square on file `f` (a diagonal
//!   crosses every file at most once).

use lazy_static::lazy_static;

use super::bitboard::{Bitboard, FILE_A, RANK_1};
use super::{Color, Square};

pub const LINE_STATES: usize = 256;

pub struct AttackTables {
    pub pawn: [[u64; 64]; 2],
    pub knight: [u64; 64],
    pub king: [u64; 64],
    pub rank: Vec<[u64; LINE_STATES]>,
    pub file: Vec<[u64; LINE_STATES]>,
    /// a1-h8 oriented diagonals
    pub diag_ne: Vec<[u64; LINE_STATES]>,
    /// a8-h1 oriented diagonals
    pub diag_se: Vec<[u64; LINE_STATES]>,
    pub diag_ne_mask: [u64; 64],
    pub diag_se_mask: [u64; 64],
}

lazy_static! {
    pub static ref ATTACKS: AttackTables = AttackTables::new();
}

type Step = fn(&Square) -> Square;
type Out = fn(&Square) -> bool;

impl AttackTables {
    fn new() -> Self {
        let mut tables = AttackTables {
            pawn: [[0; 64]; 2],
            knight: [0; 64],
            king: [0; 64],
            rank: vec![[0; LINE_STATES]; 64],
            file: vec![[0; LINE_STATES]; 64],
            diag_ne: vec![[0; LINE_STATES]; 64],
            diag_se: vec![[0; LINE_STATES]; 64],
            diag_ne_mask: [0; 64],
            diag_se_mask: [0; 64],
        };

        for i in 0..64 {
            let sq = Square::from_index(i);
            tables.diag_ne_mask[i] = Bitboard::mask_diag_ne(sq).0;
            tables.diag_se_mask[i] = Bitboard::mask_diag_nw(sq).0;

            tables.pawn[Color::White.index()][i] = sq.nw().mask() | sq.ne().mask();
            tables.pawn[Color::Black.index()][i] = sq.sw().mask() | sq.se().mask();

            tables.knight[i] = [
                sq.nw().n(),
                sq.nw().w(),
                sq.ne().n(),
                sq.ne().e(),
                sq.sw().s(),
                sq.sw().w(),
                sq.se().s(),
                sq.se().e(),
            ]
            .iter()
            .fold(0, |acc, s| acc | s.mask());

            tables.king[i] = [sq.n(), sq.nw(), sq.w(), sq.sw(), sq.s(), sq.se(), sq.e(), sq.ne()]
                .iter()
                .fold(0, |acc, s| acc | s.mask());

            for state in 0..LINE_STATES {
                let by_file = |s: &Square| state & (1 << s.file) != 0;
                let by_rank = |s: &Square| state & (1 << s.rank) != 0;

                tables.rank[i][state] =
                    ray(sq, Square::e, Square::out_e, by_file) | ray(sq, Square::w, Square::out_w, by_file);
                tables.file[i][state] =
                    ray(sq, Square::n, Square::out_n, by_rank) | ray(sq, Square::s, Square::out_s, by_rank);
                tables.diag_ne[i][state] =
                    ray(sq, Square::ne, Square::out_ne, by_file) | ray(sq, Square::sw, Square::out_sw, by_file);
                tables.diag_se[i][state] =
                    ray(sq, Square::se, Square::out_se, by_file) | ray(sq, Square::nw, Square::out_nw, by_file);
            }
        }
        tables
    }
}

/// Walks from `from` (exclusive) in one direction, stopping on the first
/// square `blocked` reports as occupied (inclusive) or at the edge.
fn ray(from: Square, step: Step, out: Out, blocked: impl Fn(&Square) -> bool) -> u64 {
    let mut attacks = 0;
    let mut p = step(&from);
    while !out(&p) {
        attacks |= p.mask();
        if blocked(&p) {
            break;
        }
        p = step(&p);
    }
    attacks
}

/// Occupancy state of the rank through `sq`.
#[inline]
pub fn rank_state(occupied: u64, sq: Square) -> usize {
    ((occupied >> (sq.rank as u32 * 8)) & RANK_1) as usize
}

/// Occupancy state of the file through `sq`.
#[inline]
pub fn file_state(occupied: u64, sq: Square) -> usize {
    let column = (occupied >> sq.file as u32) & FILE_A;
    (0..8).fold(0, |acc, r| acc | (((column >> (r * 8)) & 1) << r)) as usize
}

/// Occupancy state of a diagonal given its mask: folding all eight ranks on
/// top of each other leaves one bit per file.
#[inline]
pub fn diagonal_state(occupied: u64, diagonal_mask: u64) -> usize {
    let mut x = occupied & diagonal_mask;
    x |= x >> 32;
    x |= x >> 16;
    x |= x >> 8;
    (x & RANK_1) as usize
}
