//! Zobrist keys.
//!
//! A position's hash is the XOR of one random key per occupied
//! (piece, square), one for black to move, one per castling-rights
//! combination and one per live en-passant square.

use super::board::{Board, CastlingRights, Color, Piece, Square};

#[derive(Clone)]
pub struct ZobristKeys {
    pieces: [[u64; 64]; 12],
    side: u64,
    castling: [u64; 16],
    en_passant: [u64; 64],
}

impl ZobristKeys {
    /// Fresh keys from the thread RNG; hashes differ between sessions.
    pub fn new() -> Self {
        Self::generate(rand::random::<u64>)
    }

    /// Reproducible keys for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = XorShift64::new(seed);
        Self::generate(|| rng.next())
    }

    fn generate(mut next: impl FnMut() -> u64) -> Self {
        let mut pieces = [[0u64; 64]; 12];
        for key in pieces.iter_mut().flatten() {
            *key = next();
        }
        let side = next();
        let mut castling = [0u64; 16];
        // no rights hashes to nothing
        for key in castling.iter_mut().skip(1) {
            *key = next();
        }
        let mut en_passant = [0u64; 64];
        for key in en_passant.iter_mut() {
            *key = next();
        }
        ZobristKeys {
            pieces,
            side,
            castling,
            en_passant,
        }
    }

    /// Key for `piece` standing on `sq`.
    #[inline]
    pub fn piece(&self, piece: Piece, sq: Square) -> u64 {
        self.pieces[piece.index()][sq.index()]
    }

    /// Key folded in when black is to move.
    #[inline]
    pub fn side_to_move(&self) -> u64 {
        self.side
    }

    /// Key for one combination of castling rights.
    #[inline]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.raw() as usize]
    }

    /// Key for a live en-passant target on `sq`.
    #[inline]
    pub fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant[sq.index()]
    }

    /// Full hash of `board`.
    pub fn hash(&self, board: &Board) -> u64 {
        let mut hash = 0u64;
        for (index, bb) in board.pieces.iter().enumerate() {
            let piece = Piece::from_index(index);
            for sq in bb.iter() {
                hash ^= self.piece(piece, Square(sq));
            }
        }
        if board.side_to_move() == Color::Black {
            hash ^= self.side;
        }
        hash ^= self.castling(board.castling());
        for sq in (board.en_passant[0] | board.en_passant[1]).iter() {
            hash ^= self.en_passant(Square(sq));
        }
        hash
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        // zero is a fixed point
        XorShift64 { state: seed.max(1) }
    }

    fn next(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}
