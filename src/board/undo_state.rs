use crate::board::chess_types::*;

/// Single undo record for `do_move` / `undo_move`.
///
/// Everything here is the value *before* the move was applied; the move
/// itself is passed back to `undo_move`, so it is not stored.
#[derive(Debug, Clone, Copy)]
pub struct UndoState {
    pub captured_piece: Option<Piece>,
    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_hash_key: u64,
}
