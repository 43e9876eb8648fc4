//! Core board-domain types shared across the crate.

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }
}

/// Piece kind (color is represented separately for cache-friendly layouts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<PieceKind> {
        match index {
            0 => Some(PieceKind::Pawn),
            1 => Some(PieceKind::Knight),
            2 => Some(PieceKind::Bishop),
            3 => Some(PieceKind::Rook),
            4 => Some(PieceKind::Queen),
            5 => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A colored piece; an empty square is `Option<Piece>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    /// Dense `0..=11` encoding (Light pieces first) used for Zobrist lookups.
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * 6 + self.kind.index()
    }
}

/// Packed move. Bit layout is defined in `moves::move_encoding`; the
/// all-zero value is the null move.
pub type Move = u32;

/// Board square index (`0..=63`, `a1 == 0`, `h8 == 63`).
pub type Square = u8;

/// One bit per square, same indexing as [`Square`].
pub type Bitboard = u64;

/// Centipawn evaluation relative to the side to move.
pub type Score = i32;

/// Compact castling rights bitmask.
pub type CastlingRights = u8;

pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;

/// Deepest line the search machinery will ever walk; undo storage is
/// preallocated to this depth so the hot path never grows a Vec.
pub const MAX_PLY: usize = 128;

pub const STARTING_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[inline]
pub const fn square_bb(square: Square) -> Bitboard {
    1u64 << square
}

/// Clear and return the lowest set square. Callers must pass a non-empty
/// bitboard; on an empty one this returns 64 and leaves it empty.
#[inline]
pub fn pop_lsb(bitboard: &mut Bitboard) -> Square {
    let square = bitboard.trailing_zeros() as Square;
    *bitboard &= bitboard.wrapping_sub(1);
    square
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_index_is_dense_and_color_major() {
        assert_eq!(Piece::new(Color::Light, PieceKind::Pawn).index(), 0);
        assert_eq!(Piece::new(Color::Light, PieceKind::King).index(), 5);
        assert_eq!(Piece::new(Color::Dark, PieceKind::Pawn).index(), 6);
        assert_eq!(Piece::new(Color::Dark, PieceKind::King).index(), 11);
    }

    #[test]
    fn pop_lsb_walks_low_to_high() {
        let mut bb: Bitboard = square_bb(3) | square_bb(17) | square_bb(63);
        assert_eq!(pop_lsb(&mut bb), 3);
        assert_eq!(pop_lsb(&mut bb), 17);
        assert_eq!(pop_lsb(&mut bb), 63);
        assert_eq!(bb, 0);
    }

    #[test]
    fn piece_kind_index_round_trips() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_index(kind.index()), Some(kind));
        }
        assert_eq!(PieceKind::from_index(6), None);
    }
}
