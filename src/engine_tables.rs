//! The immutable lookup context shared by every board and search consumer.
//!
//! All precomputed state that is too large or too dynamic for `const`
//! tables lives here: the magic sliding-attack tables and the Zobrist key
//! material. Build one `EngineTables` at startup and pass it by reference;
//! nothing in the crate reaches for global state.

use std::time::Instant;

use log::debug;

use crate::board::chess_types::{Bitboard, Color, PieceKind, Square};
use crate::board::zobrist_keys::ZobristKeys;
use crate::tables::leaper_attacks::{king_attacks, knight_attacks, pawn_attacks};
use crate::tables::sliding_attacks::SlidingAttacks;

pub struct EngineTables {
    pub sliding: SlidingAttacks,
    pub zobrist: ZobristKeys,
}

impl EngineTables {
    pub fn new() -> Self {
        let started_at = Instant::now();
        let tables = EngineTables {
            sliding: SlidingAttacks::new(),
            zobrist: ZobristKeys::new(),
        };
        debug!(
            "engine tables built in {} ms",
            started_at.elapsed().as_millis()
        );
        tables
    }

    #[inline]
    pub fn knight_attacks(&self, square: Square) -> Bitboard {
        knight_attacks(square)
    }

    #[inline]
    pub fn king_attacks(&self, square: Square) -> Bitboard {
        king_attacks(square)
    }

    #[inline]
    pub fn pawn_attacks(&self, color: Color, square: Square) -> Bitboard {
        pawn_attacks(color, square)
    }

    #[inline]
    pub fn rook_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.sliding.rook_attacks(square, occupied)
    }

    #[inline]
    pub fn bishop_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.sliding.bishop_attacks(square, occupied)
    }

    #[inline]
    pub fn queen_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.sliding.queen_attacks(square, occupied)
    }

    /// Attack set for any piece kind from `square`. `color` only matters for
    /// pawns (capture direction); `occupied` only for the sliders.
    #[inline]
    pub fn attacks_for(
        &self,
        kind: PieceKind,
        color: Color,
        square: Square,
        occupied: Bitboard,
    ) -> Bitboard {
        match kind {
            PieceKind::Pawn => pawn_attacks(color, square),
            PieceKind::Knight => knight_attacks(square),
            PieceKind::Bishop => self.sliding.bishop_attacks(square, occupied),
            PieceKind::Rook => self.sliding.rook_attacks(square, occupied),
            PieceKind::Queen => self.sliding.queen_attacks(square, occupied),
            PieceKind::King => king_attacks(square),
        }
    }
}

impl Default for EngineTables {
    fn default() -> Self {
        Self::new()
    }
}
