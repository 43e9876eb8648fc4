//! Packed move encoding.
//!
//! A move is a `u32` with this layout:
//!
//! | bits  | field                                        |
//! |-------|----------------------------------------------|
//! | 0-5   | from square                                  |
//! | 6-11  | to square                                    |
//! | 12-14 | promotion piece kind index (0 = no promotion)|
//! | 15    | castling flag                                |
//! | 16    | en-passant flag                              |
//! | 17    | capture flag                                 |
//!
//! The promotion field can use 0 for "none" because pawns never promote to
//! pawns (index 0). The all-zero value is the null move sentinel.

use crate::board::chess_types::{Move, PieceKind, Square};

const TO_SHIFT: u32 = 6;
const PROMOTION_SHIFT: u32 = 12;
const SQUARE_MASK: u32 = 0x3F;
const PROMOTION_MASK: u32 = 0x7;

pub const FLAG_CASTLING: Move = 1 << 15;
pub const FLAG_EN_PASSANT: Move = 1 << 16;
pub const FLAG_CAPTURE: Move = 1 << 17;

/// The null move: no squares, no flags. Used as a "no move" sentinel by the
/// transposition table, the text parser, and the search.
pub const NULL_MOVE: Move = 0;

#[inline]
pub const fn encode_move(from: Square, to: Square) -> Move {
    (from as Move) | ((to as Move) << TO_SHIFT)
}

#[inline]
pub const fn encode_capture(from: Square, to: Square) -> Move {
    encode_move(from, to) | FLAG_CAPTURE
}

/// Promotion move; `kind` must be knight, bishop, rook, or queen.
#[inline]
pub const fn encode_promotion(from: Square, to: Square, kind: PieceKind, capture: bool) -> Move {
    let mut m = encode_move(from, to) | ((kind.index() as Move) << PROMOTION_SHIFT);
    if capture {
        m |= FLAG_CAPTURE;
    }
    m
}

/// En-passant capture; sets both the en-passant and capture flags.
#[inline]
pub const fn encode_en_passant(from: Square, to: Square) -> Move {
    encode_move(from, to) | FLAG_EN_PASSANT | FLAG_CAPTURE
}

#[inline]
pub const fn encode_castling(from: Square, to: Square) -> Move {
    encode_move(from, to) | FLAG_CASTLING
}

#[inline]
pub const fn move_from(m: Move) -> Square {
    (m & SQUARE_MASK) as Square
}

#[inline]
pub const fn move_to(m: Move) -> Square {
    ((m >> TO_SHIFT) & SQUARE_MASK) as Square
}

#[inline]
pub const fn move_promotion(m: Move) -> Option<PieceKind> {
    match (m >> PROMOTION_SHIFT) & PROMOTION_MASK {
        0 => None,
        code => PieceKind::from_index(code as usize),
    }
}

#[inline]
pub const fn is_promotion(m: Move) -> bool {
    (m >> PROMOTION_SHIFT) & PROMOTION_MASK != 0
}

#[inline]
pub const fn is_castling(m: Move) -> bool {
    m & FLAG_CASTLING != 0
}

#[inline]
pub const fn is_en_passant(m: Move) -> bool {
    m & FLAG_EN_PASSANT != 0
}

#[inline]
pub const fn is_capture(m: Move) -> bool {
    m & FLAG_CAPTURE != 0
}

#[inline]
pub const fn is_null(m: Move) -> bool {
    m == NULL_MOVE
}

/// Captures and promotions; the subset quiescence search looks at.
#[inline]
pub const fn is_tactical(m: Move) -> bool {
    is_capture(m) || is_promotion(m)
}

/// Anything that is not tactical: pushes, piece shuffles, castling.
#[inline]
pub const fn is_quiet(m: Move) -> bool {
    !is_tactical(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROMOTION_CHOICES: [Option<PieceKind>; 5] = [
        None,
        Some(PieceKind::Knight),
        Some(PieceKind::Bishop),
        Some(PieceKind::Rook),
        Some(PieceKind::Queen),
    ];

    #[test]
    fn encode_decode_round_trips_every_square_pair_and_promotion() {
        for from in 0..64u8 {
            for to in 0..64u8 {
                if from == to {
                    continue;
                }
                for promotion in PROMOTION_CHOICES {
                    let m = match promotion {
                        None => encode_move(from, to),
                        Some(kind) => encode_promotion(from, to, kind, false),
                    };
                    assert_eq!(move_from(m), from);
                    assert_eq!(move_to(m), to);
                    assert_eq!(move_promotion(m), promotion);
                }
            }
        }
    }

    #[test]
    fn null_move_has_no_squares_and_no_flags() {
        assert!(is_null(NULL_MOVE));
        assert_eq!(move_from(NULL_MOVE), 0);
        assert_eq!(move_to(NULL_MOVE), 0);
        assert_eq!(move_promotion(NULL_MOVE), None);
        assert!(!is_capture(NULL_MOVE));
        assert!(!is_castling(NULL_MOVE));
        assert!(!is_en_passant(NULL_MOVE));
    }

    #[test]
    fn en_passant_implies_capture() {
        let m = encode_en_passant(28, 21);
        assert!(is_en_passant(m));
        assert!(is_capture(m));
        assert!(is_tactical(m));
    }

    #[test]
    fn castling_is_quiet() {
        let m = encode_castling(4, 6);
        assert!(is_castling(m));
        assert!(!is_capture(m));
        assert!(is_quiet(m));
    }

    #[test]
    fn capture_promotions_carry_both_markers() {
        let m = encode_promotion(52, 61, PieceKind::Queen, true);
        assert!(is_capture(m));
        assert!(is_promotion(m));
        assert_eq!(move_promotion(m), Some(PieceKind::Queen));
    }
}
