//! Move ordering scores for the alpha-beta search.
//!
//! Captures are ranked MVV-LVA (most valuable victim, least valuable
//! attacker); promotions and castling get fixed bonuses; everything else
//! scores zero and keeps generation order.

use crate::board::chess_types::{Move, PieceKind, Score};
use crate::board::position::Position;
use crate::moves::move_encoding::{
    is_capture, is_castling, is_en_passant, move_from, move_promotion, move_to,
};

/// Centipawn piece values, indexed by [`PieceKind::index`].
pub const PIECE_VALUES: [Score; 6] = [100, 320, 330, 500, 900, 20000];

#[inline]
pub const fn piece_value(kind: PieceKind) -> Score {
    PIECE_VALUES[kind.index()]
}

/// Ordering score for `m` in `position`. Higher is searched earlier.
///
/// The en-passant victim square is empty, so those captures score a flat
/// pawn value instead of the MVV-LVA product.
pub fn move_order_score(m: Move, position: &Position) -> Score {
    let mut score = 0;

    if is_capture(m) {
        if let (Some(victim), Some(attacker)) = (
            position.board[move_to(m) as usize],
            position.board[move_from(m) as usize],
        ) {
            score += piece_value(victim.kind) * 100 - piece_value(attacker.kind);
        }
        if is_en_passant(m) {
            score += 100;
        }
    }

    if let Some(kind) = move_promotion(m) {
        score += piece_value(kind) - piece_value(PieceKind::Pawn);
        if kind == PieceKind::Queen {
            score += 50;
        }
    }

    if is_castling(m) {
        score += 25;
    }

    score
}
