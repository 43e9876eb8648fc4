//! Pseudo-legal move generation over bitboards.
//!
//! Every generator yields moves that respect piece movement, occupancy, and
//! castling prerequisites but may still leave the mover's king in check.
//! King safety is the caller's concern through `Position::is_legal`; the
//! search and perft both filter with it.

use crate::board::chess_types::*;
use crate::board::position::Position;
use crate::engine_tables::EngineTables;
use crate::moves::move_encoding::{
    encode_capture, encode_castling, encode_en_passant, encode_move, encode_promotion,
};

/// Which part of the move set a pawn pass should emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GenScope {
    All,
    Tactical,
    Quiet,
}

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

const STEPPER_KINDS: [PieceKind; 5] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

/// Every pseudo-legal move for the side to move.
pub fn generate_moves(position: &Position, tables: &EngineTables) -> Vec<Move> {
    let mut moves = Vec::with_capacity(128);
    let own = position.by_color[position.side_to_move.index()];

    generate_pawn_moves(position, tables, GenScope::All, &mut moves);
    for kind in STEPPER_KINDS {
        generate_piece_moves(position, tables, kind, !own, &mut moves);
    }
    generate_castling_moves(position, tables, &mut moves);

    moves
}

/// The tactical subset: captures, en passant, and every promotion. This is
/// the quiescence search's move source.
pub fn generate_captures(position: &Position, tables: &EngineTables) -> Vec<Move> {
    let mut moves = Vec::with_capacity(32);
    let enemy = position.by_color[position.side_to_move.opposite().index()];

    generate_pawn_moves(position, tables, GenScope::Tactical, &mut moves);
    for kind in STEPPER_KINDS {
        generate_piece_moves(position, tables, kind, enemy, &mut moves);
    }

    moves
}

/// The complement of `generate_captures`: non-capture pushes and piece
/// moves plus castling, with promotions excluded.
pub fn generate_quiet_moves(position: &Position, tables: &EngineTables) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    let empty = !position.occupied();

    generate_pawn_moves(position, tables, GenScope::Quiet, &mut moves);
    for kind in STEPPER_KINDS {
        generate_piece_moves(position, tables, kind, empty, &mut moves);
    }
    generate_castling_moves(position, tables, &mut moves);

    moves
}

fn generate_pawn_moves(
    position: &Position,
    tables: &EngineTables,
    scope: GenScope,
    out: &mut Vec<Move>,
) {
    let side = position.side_to_move;
    let enemy_occ = position.by_color[side.opposite().index()];
    let empty = !position.occupied();
    let want_tactical = scope != GenScope::Quiet;
    let want_quiet = scope != GenScope::Tactical;

    let (push_delta, start_rank, promotion_rank) = match side {
        Color::Light => (8i16, 1, 7),
        Color::Dark => (-8i16, 6, 0),
    };

    let mut pawns = position.pieces_of(side, PieceKind::Pawn);
    while pawns != 0 {
        let from = pop_lsb(&mut pawns);

        // Pushes. Lenient FEN can park a pawn on its own back rank, so the
        // step is range-checked rather than assumed on the board.
        let one_step = from as i16 + push_delta;
        if (0..64).contains(&one_step) {
            let to = one_step as Square;
            if square_bb(to) & empty != 0 {
                if to / 8 == promotion_rank {
                    if want_tactical {
                        for kind in PROMOTION_KINDS {
                            out.push(encode_promotion(from, to, kind, false));
                        }
                    }
                } else if want_quiet {
                    out.push(encode_move(from, to));

                    if from / 8 == start_rank {
                        let two_step = (one_step + push_delta) as Square;
                        if square_bb(two_step) & empty != 0 {
                            out.push(encode_move(from, two_step));
                        }
                    }
                }
            }
        }

        if !want_tactical {
            continue;
        }

        let mut attacks = tables.pawn_attacks(side, from) & enemy_occ;
        while attacks != 0 {
            let to = pop_lsb(&mut attacks);
            if to / 8 == promotion_rank {
                for kind in PROMOTION_KINDS {
                    out.push(encode_promotion(from, to, kind, true));
                }
            } else {
                out.push(encode_capture(from, to));
            }
        }

        if let Some(target) = position.en_passant_square {
            if tables.pawn_attacks(side, from) & square_bb(target) != 0 {
                out.push(encode_en_passant(from, target));
            }
        }
    }
}

/// Attack-table generation for every non-pawn kind, restricted to `targets`.
fn generate_piece_moves(
    position: &Position,
    tables: &EngineTables,
    kind: PieceKind,
    targets: Bitboard,
    out: &mut Vec<Move>,
) {
    let side = position.side_to_move;
    let occupied = position.occupied();

    let mut pieces = position.pieces_of(side, kind);
    while pieces != 0 {
        let from = pop_lsb(&mut pieces);
        let mut attacks = tables.attacks_for(kind, side, from, occupied) & targets;
        while attacks != 0 {
            let to = pop_lsb(&mut attacks);
            if position.piece_on(to).is_some() {
                out.push(encode_capture(from, to));
            } else {
                out.push(encode_move(from, to));
            }
        }
    }
}

/// Castling candidates: the rights bit must survive, the squares between
/// king and rook must be empty, and the king's start, transit, and landing
/// squares must not be attacked. Whether the move leaves the king safe
/// afterwards is `is_legal`'s job like every other move.
fn generate_castling_moves(position: &Position, tables: &EngineTables, out: &mut Vec<Move>) {
    let occupied = position.occupied();
    let rights = position.castling_rights;
    let enemy = position.side_to_move.opposite();

    let safe = |square: Square| !position.is_attacked_by(square, enemy, tables);

    match position.side_to_move {
        Color::Light => {
            if rights & CASTLE_LIGHT_KINGSIDE != 0
                && occupied & (square_bb(5) | square_bb(6)) == 0
                && safe(4)
                && safe(5)
                && safe(6)
            {
                out.push(encode_castling(4, 6)); // e1g1
            }
            if rights & CASTLE_LIGHT_QUEENSIDE != 0
                && occupied & (square_bb(1) | square_bb(2) | square_bb(3)) == 0
                && safe(4)
                && safe(3)
                && safe(2)
            {
                out.push(encode_castling(4, 2)); // e1c1
            }
        }
        Color::Dark => {
            if rights & CASTLE_DARK_KINGSIDE != 0
                && occupied & (square_bb(61) | square_bb(62)) == 0
                && safe(60)
                && safe(61)
                && safe(62)
            {
                out.push(encode_castling(60, 62)); // e8g8
            }
            if rights & CASTLE_DARK_QUEENSIDE != 0
                && occupied & (square_bb(57) | square_bb(58) | square_bb(59)) == 0
                && safe(60)
                && safe(59)
                && safe(58)
            {
                out.push(encode_castling(60, 58)); // e8c8
            }
        }
    }
}
