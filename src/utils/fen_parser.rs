//! Lenient FEN parsing.
//!
//! Accepts anything resembling Forsyth-Edwards Notation and never fails:
//! missing fields fall back to defaults, unrecognized board characters are
//! skipped without consuming a square, and unparsable clocks read as zero
//! and one. Garbage in yields a structurally sound position, not
//! necessarily a reachable game.

use crate::board::chess_types::*;
use crate::board::position::Position;
use crate::engine_tables::EngineTables;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str, tables: &EngineTables) -> Position {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().unwrap_or("");
    let side_part = parts.next().unwrap_or("");
    let castling_part = parts.next().unwrap_or("");
    let en_passant_part = parts.next().unwrap_or("");
    let halfmove_part = parts.next().unwrap_or("");
    let fullmove_part = parts.next().unwrap_or("");

    let mut position = Position::empty();

    parse_board(board_part, &mut position);
    position.side_to_move = parse_side_to_move(side_part);
    position.castling_rights = parse_castling_rights(castling_part);
    position.en_passant_square = parse_en_passant_square(en_passant_part);
    position.halfmove_clock = halfmove_part.parse().unwrap_or(0);
    position.fullmove_number = fullmove_part.parse().unwrap_or(1);

    position.rebuild_bitboards();
    position.hash_key = tables.zobrist.full_hash(&position);
    position.repetition_history.push(position.hash_key);

    position
}

fn parse_board(board_part: &str, position: &mut Position) {
    let mut rank: i32 = 7;
    let mut file: i32 = 0;

    for ch in board_part.chars() {
        if ch == '/' {
            rank -= 1;
            file = 0;
            continue;
        }

        if let Some(step) = ch.to_digit(10) {
            file += step as i32;
            continue;
        }

        if let Some(piece) = piece_from_fen_char(ch) {
            // Placements that run off the board are dropped, but the file
            // still advances so later pieces keep their columns.
            if (0..8).contains(&rank) && (0..8).contains(&file) {
                position.board[(rank * 8 + file) as usize] = Some(piece);
            }
            file += 1;
        }
    }
}

fn parse_side_to_move(side_part: &str) -> Color {
    if side_part == "w" {
        Color::Light
    } else {
        Color::Dark
    }
}

fn parse_castling_rights(castling_part: &str) -> CastlingRights {
    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => {}
        }
    }

    rights
}

fn parse_en_passant_square(en_passant_part: &str) -> Option<Square> {
    if en_passant_part == "-" {
        return None;
    }

    algebraic_to_square(en_passant_part).ok()
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some(Piece::new(color, kind))
}
