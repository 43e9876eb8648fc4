//! Magic-bitboard attack tables for the sliding pieces.
//!
//! Rook and bishop attack sets are precomputed per square over every subset
//! of the square's relevant occupancy mask and stored at the slot the magic
//! hash selects, so a lookup is mask, multiply, shift, index. Board edges are
//! excluded from the masks: an edge square is always the last reachable
//! square in its direction whether occupied or not, so it never changes the
//! attack set.

use crate::board::chess_types::{pop_lsb, square_bb, Bitboard, Square};
use crate::tables::magic_numbers::{
    BISHOP_MAGICS, BISHOP_SHIFT, BISHOP_TABLE_SIZE, ROOK_MAGICS, ROOK_SHIFT, ROOK_TABLE_SIZE,
};

const ROOK_DELTAS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DELTAS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Precomputed rook and bishop attacks, square-major flat tables.
pub struct SlidingAttacks {
    rook_table: Vec<Bitboard>,
    bishop_table: Vec<Bitboard>,
    rook_masks: [Bitboard; 64],
    bishop_masks: [Bitboard; 64],
}

impl SlidingAttacks {
    pub fn new() -> Self {
        let mut rook_masks = [0u64; 64];
        let mut bishop_masks = [0u64; 64];
        for square in 0..64u8 {
            rook_masks[square as usize] = rook_mask(square);
            bishop_masks[square as usize] = bishop_mask(square);
        }

        let mut rook_table = vec![0u64; 64 * ROOK_TABLE_SIZE];
        for square in 0..64u8 {
            let mask = rook_masks[square as usize];
            let subsets = 1u64 << mask.count_ones();
            for index in 0..subsets {
                let occupied = occupancy_subset(index, mask);
                let slot =
                    (occupied.wrapping_mul(ROOK_MAGICS[square as usize]) >> ROOK_SHIFT) as usize;
                rook_table[square as usize * ROOK_TABLE_SIZE + slot] =
                    ray_attacks(square, occupied, &ROOK_DELTAS);
            }
        }

        let mut bishop_table = vec![0u64; 64 * BISHOP_TABLE_SIZE];
        for square in 0..64u8 {
            let mask = bishop_masks[square as usize];
            let subsets = 1u64 << mask.count_ones();
            for index in 0..subsets {
                let occupied = occupancy_subset(index, mask);
                let slot = (occupied.wrapping_mul(BISHOP_MAGICS[square as usize])
                    >> BISHOP_SHIFT) as usize;
                bishop_table[square as usize * BISHOP_TABLE_SIZE + slot] =
                    ray_attacks(square, occupied, &BISHOP_DELTAS);
            }
        }

        SlidingAttacks {
            rook_table,
            bishop_table,
            rook_masks,
            bishop_masks,
        }
    }

    #[inline]
    pub fn rook_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        let sq = square as usize;
        let index =
            ((occupied & self.rook_masks[sq]).wrapping_mul(ROOK_MAGICS[sq]) >> ROOK_SHIFT) as usize;
        self.rook_table[sq * ROOK_TABLE_SIZE + index]
    }

    #[inline]
    pub fn bishop_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        let sq = square as usize;
        let index = ((occupied & self.bishop_masks[sq]).wrapping_mul(BISHOP_MAGICS[sq])
            >> BISHOP_SHIFT) as usize;
        self.bishop_table[sq * BISHOP_TABLE_SIZE + index]
    }

    #[inline]
    pub fn queen_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.rook_attacks(square, occupied) | self.bishop_attacks(square, occupied)
    }
}

impl Default for SlidingAttacks {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk outward from `square` in each delta direction, stopping at (and
/// including) the first occupied square. The construction oracle, and the
/// reference the magic lookups are tested against.
fn ray_attacks(square: Square, occupied: Bitboard, deltas: &[(i32, i32); 4]) -> Bitboard {
    let mut attacks = 0u64;
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;

    for &(rank_step, file_step) in deltas {
        for step in 1..8 {
            let new_rank = rank + step * rank_step;
            let new_file = file + step * file_step;
            if !(0..8).contains(&new_rank) || !(0..8).contains(&new_file) {
                break;
            }

            let target = (new_rank * 8 + new_file) as Square;
            attacks |= square_bb(target);

            if occupied & square_bb(target) != 0 {
                break;
            }
        }
    }

    attacks
}

/// Relevant rook occupancy: own rank and file, edges excluded.
fn rook_mask(square: Square) -> Bitboard {
    let mut mask = 0u64;
    let rank = square / 8;
    let file = square % 8;

    for f in 1..7u8 {
        if f != file {
            mask |= square_bb(rank * 8 + f);
        }
    }
    for r in 1..7u8 {
        if r != rank {
            mask |= square_bb(r * 8 + file);
        }
    }

    mask
}

/// Relevant bishop occupancy: both diagonals, edges excluded.
fn bishop_mask(square: Square) -> Bitboard {
    let mut mask = 0u64;
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;

    for (rank_step, file_step) in BISHOP_DELTAS {
        for step in 1..7 {
            let new_rank = rank + step * rank_step;
            let new_file = file + step * file_step;
            if !(1..7).contains(&new_rank) || !(1..7).contains(&new_file) {
                break;
            }
            mask |= square_bb((new_rank * 8 + new_file) as Square);
        }
    }

    mask
}

/// Expand subset number `index` onto the set bits of `mask`, low bit first.
fn occupancy_subset(index: u64, mask: Bitboard) -> Bitboard {
    let mut result = 0u64;
    let mut remaining = mask;
    let bit_count = mask.count_ones();

    for i in 0..bit_count {
        let square = pop_lsb(&mut remaining);
        if index & (1u64 << i) != 0 {
            result |= square_bb(square);
        }
    }

    result
}
