//! Move text conversions.
//!
//! Long-algebraic coordinates both ways (`e2e4`, `e7e8q`), plus a SAN-like
//! presentation renderer. Parsing never fails: malformed text yields the
//! null move.

use crate::board::chess_types::{Move, PieceKind, Square};
use crate::board::position::Position;
use crate::moves::move_encoding::{
    encode_capture, encode_castling, encode_en_passant, encode_move, encode_promotion, is_capture,
    is_castling, is_null, move_from, move_promotion, move_to, NULL_MOVE,
};

/// Render `m` as long-algebraic coordinates; the null move is `"0000"`.
pub fn move_to_long_algebraic(m: Move) -> String {
    if is_null(m) {
        return "0000".to_owned();
    }

    let from = move_from(m);
    let to = move_to(m);

    let mut out = String::with_capacity(5);
    out.push(char::from(b'a' + from % 8));
    out.push(char::from(b'1' + from / 8));
    out.push(char::from(b'a' + to % 8));
    out.push(char::from(b'1' + to / 8));

    if let Some(kind) = move_promotion(m) {
        if let Some(letter) = promotion_letter(kind) {
            out.push(letter);
        }
    }

    out
}

/// Parse long-algebraic coordinates into a bare move (squares and promotion
/// only; no capture/castling/en-passant flags).
///
/// Lenient: anything shorter than four characters, with out-of-range
/// coordinates, or with an unknown promotion letter in position five yields
/// the null move. Characters past the recognized prefix are ignored.
pub fn long_algebraic_to_move(text: &str) -> Move {
    let bytes = text.as_bytes();
    if bytes.len() < 4 {
        return NULL_MOVE;
    }

    let Some(from) = square_from_bytes(bytes[0], bytes[1]) else {
        return NULL_MOVE;
    };
    let Some(to) = square_from_bytes(bytes[2], bytes[3]) else {
        return NULL_MOVE;
    };

    if bytes.len() == 5 {
        return match bytes[4] {
            b'n' => encode_promotion(from, to, PieceKind::Knight, false),
            b'b' => encode_promotion(from, to, PieceKind::Bishop, false),
            b'r' => encode_promotion(from, to, PieceKind::Rook, false),
            b'q' => encode_promotion(from, to, PieceKind::Queen, false),
            _ => NULL_MOVE,
        };
    }

    encode_move(from, to)
}

/// Parse long-algebraic text and infer the flags `do_move` relies on from
/// the position: capture from the target square, en passant from the
/// position's target, castling from a two-file king move.
pub fn long_algebraic_to_move_in(text: &str, position: &Position) -> Move {
    let parsed = long_algebraic_to_move(text);
    if is_null(parsed) {
        return NULL_MOVE;
    }

    let from = move_from(parsed);
    let to = move_to(parsed);
    let Some(moving) = position.board[from as usize] else {
        // Nothing to infer from; legality checks will reject it downstream.
        return parsed;
    };

    if moving.kind == PieceKind::Pawn && position.en_passant_square == Some(to) {
        return encode_en_passant(from, to);
    }

    if moving.kind == PieceKind::King && (from % 8).abs_diff(to % 8) == 2 {
        return encode_castling(from, to);
    }

    let captures = position.board[to as usize].is_some();
    match move_promotion(parsed) {
        Some(kind) => encode_promotion(from, to, kind, captures),
        None if captures => encode_capture(from, to),
        None => parsed,
    }
}

/// Render `m` in a SAN-like style: `O-O`/`O-O-O` for castling, piece letter,
/// pawn-capture file, `x`, destination, `=Q`-style promotions.
///
/// Presentation only: no disambiguation (`Nbd2`) and no check/mate suffixes,
/// so two same-kind pieces reaching one square render identically.
pub fn move_to_san(m: Move, position: &Position) -> String {
    if is_null(m) {
        return "null".to_owned();
    }

    let from = move_from(m);
    let to = move_to(m);

    if is_castling(m) {
        return if to % 8 == 6 { "O-O" } else { "O-O-O" }.to_owned();
    }

    let kind = position.board[from as usize]
        .map(|piece| piece.kind)
        .unwrap_or(PieceKind::Pawn);

    let mut out = String::new();
    if let Some(letter) = piece_letter(kind) {
        out.push(letter);
    }

    if is_capture(m) {
        if kind == PieceKind::Pawn {
            out.push(char::from(b'a' + from % 8));
        }
        out.push('x');
    }

    out.push(char::from(b'a' + to % 8));
    out.push(char::from(b'1' + to / 8));

    if let Some(promotion) = move_promotion(m) {
        if let Some(letter) = promotion_letter(promotion) {
            out.push('=');
            out.push(letter.to_ascii_uppercase());
        }
    }

    out
}

#[inline]
fn square_from_bytes(file: u8, rank: u8) -> Option<Square> {
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some((rank - b'1') * 8 + (file - b'a'))
}

#[inline]
const fn promotion_letter(kind: PieceKind) -> Option<char> {
    match kind {
        PieceKind::Knight => Some('n'),
        PieceKind::Bishop => Some('b'),
        PieceKind::Rook => Some('r'),
        PieceKind::Queen => Some('q'),
        _ => None,
    }
}

#[inline]
const fn piece_letter(kind: PieceKind) -> Option<char> {
    match kind {
        PieceKind::Pawn => None,
        PieceKind::Knight => Some('N'),
        PieceKind::Bishop => Some('B'),
        PieceKind::Rook => Some('R'),
        PieceKind::Queen => Some('Q'),
        PieceKind::King => Some('K'),
    }
}
