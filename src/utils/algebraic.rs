//! Square and bitboard conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and the internal
//! square/bitboard representations, shared by the FEN and move-text layers.

use crate::board::chess_types::{Bitboard, Square};

/// Convert an algebraic coordinate (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, String> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("Invalid algebraic square: {square}"));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(format!("Invalid algebraic file: {}", file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(format!("Invalid algebraic rank: {}", rank as char));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Convert an algebraic coordinate (for example: "e4") to a one-hot bitboard.
#[inline]
pub fn algebraic_to_bitboard(square: &str) -> Result<Bitboard, String> {
    let index = algebraic_to_square(square)?;
    Ok(1u64 << index)
}

/// Convert a square index (`0..=63`) to an algebraic coordinate.
#[inline]
pub fn square_to_algebraic(square: Square) -> Result<String, String> {
    if square > 63 {
        return Err(format!("Square index out of bounds: {square}"));
    }

    let file_char = char::from(b'a' + square % 8);
    let rank_char = char::from(b'1' + square / 8);

    Ok(format!("{file_char}{rank_char}"))
}

/// Convert a one-hot bitboard to an algebraic coordinate.
#[inline]
pub fn bitboard_to_algebraic(bitboard: Bitboard) -> Result<String, String> {
    if bitboard.count_ones() != 1 {
        return Err(format!(
            "Bitboard must contain exactly one set bit, got {}",
            bitboard.count_ones()
        ));
    }

    square_to_algebraic(bitboard.trailing_zeros() as Square)
}
