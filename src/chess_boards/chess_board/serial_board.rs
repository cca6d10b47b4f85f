/// Fixed width snapshot of a position, compared for repetition detection.
///
/// `flags` layout:
/// - bits 0..8: en passant targets on rank 3 (left by a white double push)
/// - bits 8..16: en passant targets on rank 6 (left by a black double push)
/// - bit 16: white to move
/// - bits 17..21: castling rights K, Q, k, q
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SerialBoard {
    pub pieces: [u64; 6],
    pub colors: [u64; 2],
    pub flags: u32,
}

pub const WHITE_TURN: u32 = 1 << 16;
pub const WHITE_KINGSIDE: u32 = 1 << 17;
pub const WHITE_QUEENSIDE: u32 = 1 << 18;
pub const BLACK_KINGSIDE: u32 = 1 << 19;
pub const BLACK_QUEENSIDE: u32 = 1 << 20;

impl SerialBoard {
    pub fn white_to_move(&self) -> bool {
        self.flags & WHITE_TURN != 0
    }

    pub fn castling_rights(&self) -> u32 {
        self.flags & (WHITE_KINGSIDE | WHITE_QUEENSIDE | BLACK_KINGSIDE | BLACK_QUEENSIDE)
    }
}
