//! Board state with reversible move application.
//!
//! `Position` keeps the authoritative piece placement in a 64-entry board
//! array plus redundant by-color/by-kind bitboards for fast attack and
//! generation queries. The bitboards are derived state: they are rebuilt
//! from the array after every change, never edited on their own. The
//! Zobrist hash is maintained incrementally through `do_move`/`undo_move`
//! and must always equal a from-scratch recomputation.

use crate::board::chess_types::*;
use crate::board::undo_state::UndoState;
use crate::engine_tables::EngineTables;
use crate::moves::move_encoding::{
    is_castling, is_en_passant, is_promotion, move_from, move_promotion, move_to,
};

#[derive(Debug, Clone)]
pub struct Position {
    pub board: [Option<Piece>; 64],
    pub by_color: [Bitboard; 2],
    pub by_kind: [Bitboard; 6],
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    pub hash_key: u64,
    /// Hash of every position seen since construction, this one included.
    pub repetition_history: Vec<u64>,
    pub undo_stack: Vec<UndoState>,
}

impl Position {
    /// The standard starting position.
    pub fn new_game(tables: &EngineTables) -> Self {
        Self::from_fen(STARTING_POSITION_FEN, tables)
    }

    /// Parse a FEN-like description. Lenient and infallible: unrecognized
    /// input is skipped or defaulted (see `utils::fen_parser`).
    pub fn from_fen(fen: &str, tables: &EngineTables) -> Self {
        crate::utils::fen_parser::parse_fen(fen, tables)
    }

    /// Serialize to canonical six-field FEN.
    pub fn get_fen(&self) -> String {
        crate::utils::fen_generator::generate_fen(self)
    }

    /// Blank position for the FEN parser to fill in.
    pub(crate) fn empty() -> Self {
        Position {
            board: [None; 64],
            by_color: [0; 2],
            by_kind: [0; 6],
            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash_key: 0,
            repetition_history: Vec::with_capacity(MAX_PLY),
            undo_stack: Vec::with_capacity(MAX_PLY),
        }
    }

    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.board[square as usize]
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.by_color[color.index()] & self.by_kind[kind.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces_of(color, PieceKind::King);
        if kings == 0 {
            None
        } else {
            Some(kings.trailing_zeros() as Square)
        }
    }

    /// Rebuild both bitboard indices from the board array.
    pub fn rebuild_bitboards(&mut self) {
        self.by_color = [0; 2];
        self.by_kind = [0; 6];

        for square in 0..64 {
            if let Some(piece) = self.board[square] {
                let bb = square_bb(square as Square);
                self.by_color[piece.color.index()] |= bb;
                self.by_kind[piece.kind.index()] |= bb;
            }
        }
    }

    /// Apply `m`, which must be pseudo-legal for the side to move.
    ///
    /// Pushes an undo record, updates the hash incrementally, handles
    /// promotion, castling rook relocation, en-passant removal, castling
    /// rights, the en-passant target, both clocks, and the side to move,
    /// then rebuilds the bitboards and extends the repetition history.
    pub fn do_move(&mut self, m: Move, tables: &EngineTables) {
        let from = move_from(m);
        let to = move_to(m);
        let moving = self.board[from as usize]
            .expect("No piece at the source square while making a move.");
        let captured = self.board[to as usize];
        let zobrist = &tables.zobrist;

        self.undo_stack.push(UndoState {
            captured_piece: captured,
            prev_castling_rights: self.castling_rights,
            prev_en_passant_square: self.en_passant_square,
            prev_halfmove_clock: self.halfmove_clock,
            prev_hash_key: self.hash_key,
        });

        self.hash_key ^= zobrist.piece_key(moving, from);
        self.hash_key ^= zobrist.piece_key(moving, to);
        if let Some(captured) = captured {
            self.hash_key ^= zobrist.piece_key(captured, to);
        }

        self.board[from as usize] = None;
        self.board[to as usize] = Some(moving);

        if let Some(promotion) = move_promotion(m) {
            let promoted = Piece::new(moving.color, promotion);
            self.board[to as usize] = Some(promoted);
            // Replace the pawn term that was just hashed in at `to`.
            self.hash_key ^= zobrist.piece_key(moving, to);
            self.hash_key ^= zobrist.piece_key(promoted, to);
        }

        if is_castling(m) {
            if let Some((rook_from, rook_to)) = castling_rook_hop(to) {
                let rook = Piece::new(moving.color, PieceKind::Rook);
                self.board[rook_from as usize] = None;
                self.board[rook_to as usize] = Some(rook);
                self.hash_key ^= zobrist.piece_key(rook, rook_from);
                self.hash_key ^= zobrist.piece_key(rook, rook_to);
            }
        }

        if is_en_passant(m) {
            let captured_square = match moving.color {
                Color::Light => to - 8,
                Color::Dark => to + 8,
            };
            if let Some(pawn) = self.board[captured_square as usize].take() {
                self.hash_key ^= zobrist.piece_key(pawn, captured_square);
            }
        }

        self.hash_key ^= zobrist.castling_key(self.castling_rights);
        if moving.kind == PieceKind::King {
            match moving.color {
                Color::Light => {
                    self.castling_rights &= !(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE)
                }
                Color::Dark => {
                    self.castling_rights &= !(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE)
                }
            }
        }
        // Any move touching a rook home square kills that right, whether the
        // rook moved away or was captured there.
        if from == 0 || to == 0 {
            self.castling_rights &= !CASTLE_LIGHT_QUEENSIDE; // a1
        }
        if from == 7 || to == 7 {
            self.castling_rights &= !CASTLE_LIGHT_KINGSIDE; // h1
        }
        if from == 56 || to == 56 {
            self.castling_rights &= !CASTLE_DARK_QUEENSIDE; // a8
        }
        if from == 63 || to == 63 {
            self.castling_rights &= !CASTLE_DARK_KINGSIDE; // h8
        }
        self.hash_key ^= zobrist.castling_key(self.castling_rights);

        if let Some(old_target) = self.en_passant_square.take() {
            self.hash_key ^= zobrist.en_passant_key(old_target);
        }
        if moving.kind == PieceKind::Pawn && from.abs_diff(to) == 16 {
            let target = (from + to) / 2;
            self.en_passant_square = Some(target);
            self.hash_key ^= zobrist.en_passant_key(target);
        }

        if captured.is_some() || moving.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if self.side_to_move == Color::Dark {
            self.fullmove_number += 1;
        }

        self.hash_key ^= zobrist.side_key();
        self.side_to_move = self.side_to_move.opposite();

        self.rebuild_bitboards();
        self.repetition_history.push(self.hash_key);
    }

    /// Revert the most recent `do_move(m)`. A no-op when nothing has been
    /// applied.
    pub fn undo_move(&mut self, m: Move) {
        let Some(undo) = self.undo_stack.pop() else {
            return;
        };

        self.side_to_move = self.side_to_move.opposite();

        let from = move_from(m);
        let to = move_to(m);
        let mut moving = self.board[to as usize]
            .expect("No piece at the destination square while unmaking a move.");
        if is_promotion(m) {
            moving = Piece::new(self.side_to_move, PieceKind::Pawn);
        }

        self.board[from as usize] = Some(moving);
        self.board[to as usize] = undo.captured_piece;

        if is_castling(m) {
            if let Some((rook_from, rook_to)) = castling_rook_hop(to) {
                self.board[rook_from as usize] =
                    Some(Piece::new(self.side_to_move, PieceKind::Rook));
                self.board[rook_to as usize] = None;
            }
        }

        if is_en_passant(m) {
            let captured_square = match self.side_to_move {
                Color::Light => to - 8,
                Color::Dark => to + 8,
            };
            self.board[captured_square as usize] =
                Some(Piece::new(self.side_to_move.opposite(), PieceKind::Pawn));
        }

        self.en_passant_square = undo.prev_en_passant_square;
        self.castling_rights = undo.prev_castling_rights;
        self.halfmove_clock = undo.prev_halfmove_clock;
        self.hash_key = undo.prev_hash_key;

        if self.side_to_move == Color::Dark {
            self.fullmove_number -= 1;
        }

        self.repetition_history.pop();
        self.rebuild_bitboards();
    }

    /// Is `square` attacked by any piece of `attacker`?
    pub fn is_attacked_by(&self, square: Square, attacker: Color, tables: &EngineTables) -> bool {
        // A pawn of the attacking color sits on a square our own pawn would
        // capture toward, so probe with the defender's capture pattern.
        if tables.pawn_attacks(attacker.opposite(), square)
            & self.pieces_of(attacker, PieceKind::Pawn)
            != 0
        {
            return true;
        }
        if tables.knight_attacks(square) & self.pieces_of(attacker, PieceKind::Knight) != 0 {
            return true;
        }
        if tables.king_attacks(square) & self.pieces_of(attacker, PieceKind::King) != 0 {
            return true;
        }

        let occupied = self.occupied();
        let rook_like =
            self.pieces_of(attacker, PieceKind::Rook) | self.pieces_of(attacker, PieceKind::Queen);
        if tables.rook_attacks(square, occupied) & rook_like != 0 {
            return true;
        }
        let bishop_like = self.pieces_of(attacker, PieceKind::Bishop)
            | self.pieces_of(attacker, PieceKind::Queen);
        if tables.bishop_attacks(square, occupied) & bishop_like != 0 {
            return true;
        }

        false
    }

    /// Is the side to move in check? False when that king is absent, which
    /// lenient FEN input can produce.
    pub fn in_check(&self, tables: &EngineTables) -> bool {
        match self.king_square(self.side_to_move) {
            Some(king) => self.is_attacked_by(king, self.side_to_move.opposite(), tables),
            None => false,
        }
    }

    /// King-safety filter for pseudo-legal moves.
    ///
    /// Rejects moves with no piece at the origin, a piece the mover does not
    /// own, or `from == to`; otherwise applies the move on this position,
    /// checks the mover's king, and reverts. Movement geometry is the move
    /// generator's responsibility, not this function's.
    pub fn is_legal(&mut self, m: Move, tables: &EngineTables) -> bool {
        let from = move_from(m);
        let to = move_to(m);
        if from == to {
            return false;
        }
        let Some(moving) = self.board[from as usize] else {
            return false;
        };
        if moving.color != self.side_to_move {
            return false;
        }

        let mover = self.side_to_move;
        self.do_move(m, tables);
        let safe = match self.king_square(mover) {
            Some(king) => !self.is_attacked_by(king, mover.opposite(), tables),
            None => true,
        };
        self.undo_move(m);
        safe
    }
}

/// Rook relocation for a castling king landing on `to`, as
/// `(rook_from, rook_to)`. `None` when `to` is not a castling destination.
#[inline]
const fn castling_rook_hop(to: Square) -> Option<(Square, Square)> {
    match to {
        6 => Some((7, 5)),    // g1: h1 rook to f1
        2 => Some((0, 3)),    // c1: a1 rook to d1
        62 => Some((63, 61)), // g8: h8 rook to f8
        58 => Some((56, 59)), // c8: a8 rook to d8
        _ => None,
    }
}
