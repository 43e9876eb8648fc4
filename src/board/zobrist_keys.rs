//! Zobrist key material for position identity and repetition tracking.
//!
//! The keys are generated from a fixed seed so hashes are deterministic across
//! runs, which is useful for testing and debugging. They are owned by
//! [`EngineTables`](crate::engine_tables::EngineTables) and passed by
//! reference wherever hashing happens; there is no global state.

use crate::board::chess_types::*;
use crate::board::position::Position;

/// Key material for every hashable position feature.
///
/// Piece keys are indexed by [`Piece::index`] (`0..=11`) then square.
/// En-passant keys are per square; only actually-present targets are hashed.
#[derive(Debug)]
pub struct ZobristKeys {
    pub pieces: [[u64; 64]; 12],
    pub side_to_move: u64,
    pub castling: [u64; 16],
    pub en_passant: [u64; 64],
}

impl ZobristKeys {
    pub fn new() -> Self {
        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;

        let mut pieces = [[0u64; 64]; 12];
        for piece in &mut pieces {
            for square in piece.iter_mut() {
                *square = next_random_u64(&mut seed);
            }
        }

        let side_to_move = next_random_u64(&mut seed);

        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = next_random_u64(&mut seed);
        }

        let mut en_passant = [0u64; 64];
        for key in &mut en_passant {
            *key = next_random_u64(&mut seed);
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant,
        }
    }

    /// Key for a `(piece, square)` occupancy term.
    #[inline]
    pub fn piece_key(&self, piece: Piece, square: Square) -> u64 {
        self.pieces[piece.index()][square as usize]
    }

    /// Key contribution for a castling rights mask (`0..=15`).
    #[inline]
    pub fn castling_key(&self, castling_rights: CastlingRights) -> u64 {
        self.castling[(castling_rights & 0x0F) as usize]
    }

    /// Key contribution for an en-passant target square.
    #[inline]
    pub fn en_passant_key(&self, square: Square) -> u64 {
        self.en_passant[square as usize]
    }

    /// Side-to-move toggle key (xor in when Dark is to move).
    #[inline]
    pub fn side_key(&self) -> u64 {
        self.side_to_move
    }

    /// Compute the full position key from scratch.
    ///
    /// The incrementally maintained `Position::hash_key` must always equal
    /// this; the do/undo paths are tested against it.
    pub fn full_hash(&self, position: &Position) -> u64 {
        let mut key = 0u64;

        for square in 0..64u8 {
            if let Some(piece) = position.board[square as usize] {
                key ^= self.piece_key(piece, square);
            }
        }

        if position.side_to_move == Color::Dark {
            key ^= self.side_key();
        }

        key ^= self.castling_key(position.castling_rights);

        if let Some(ep_square) = position.en_passant_square {
            key ^= self.en_passant_key(ep_square);
        }

        key
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
