use crate::board::chess_types::*;
use crate::board::position::Position;
use crate::utils::algebraic::square_to_algebraic;

/// Serialize a position into canonical six-field FEN with single spaces.
pub fn generate_fen(position: &Position) -> String {
    let board = generate_board_field(position);
    let side_to_move = match position.side_to_move {
        Color::Light => "w",
        Color::Dark => "b",
    };
    let castling = generate_castling_field(position.castling_rights);
    let en_passant = generate_en_passant_field(position.en_passant_square);

    format!(
        "{} {} {} {} {} {}",
        board,
        side_to_move,
        castling,
        en_passant,
        position.halfmove_clock,
        position.fullmove_number
    )
}

fn generate_board_field(position: &Position) -> String {
    let mut out = String::new();

    for rank in (0..8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8 {
            let square = (rank * 8 + file) as Square;
            if let Some(piece) = position.piece_on(square) {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece_to_fen_char(piece));
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn piece_to_fen_char(piece: Piece) -> char {
    let base = match piece.kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };

    match piece.color {
        Color::Light => base.to_ascii_uppercase(),
        Color::Dark => base,
    }
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let mut out = String::new();

    if (rights & CASTLE_LIGHT_KINGSIDE) != 0 {
        out.push('K');
    }
    if (rights & CASTLE_LIGHT_QUEENSIDE) != 0 {
        out.push('Q');
    }
    if (rights & CASTLE_DARK_KINGSIDE) != 0 {
        out.push('k');
    }
    if (rights & CASTLE_DARK_QUEENSIDE) != 0 {
        out.push('q');
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}

fn generate_en_passant_field(square: Option<Square>) -> String {
    let Some(square) = square else {
        return "-".to_owned();
    };

    square_to_algebraic(square).unwrap_or_else(|_| "-".to_owned())
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::board::chess_types::*;
    use crate::board::position::Position;
    use crate::engine_tables::EngineTables;
    use crate::moves::move_text::long_algebraic_to_move_in;

    #[test]
    fn round_trip_starting_position_fen() {
        let tables = EngineTables::new();
        let parsed = Position::from_fen(STARTING_POSITION_FEN, &tables);
        let generated = generate_fen(&parsed);

        assert_eq!(generated, STARTING_POSITION_FEN);

        let reparsed = Position::from_fen(&generated, &tables);
        assert_eq!(reparsed.board, parsed.board);
        assert_eq!(reparsed.side_to_move, parsed.side_to_move);
        assert_eq!(reparsed.castling_rights, parsed.castling_rights);
        assert_eq!(reparsed.en_passant_square, parsed.en_passant_square);
        assert_eq!(reparsed.halfmove_clock, parsed.halfmove_clock);
        assert_eq!(reparsed.fullmove_number, parsed.fullmove_number);
        assert_eq!(reparsed.hash_key, parsed.hash_key);
    }

    #[test]
    fn round_trip_custom_position_fen() {
        let tables = EngineTables::new();
        let fen = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 4 6";
        let parsed = Position::from_fen(fen, &tables);
        let generated = generate_fen(&parsed);

        assert_eq!(generated, fen);

        let reparsed = Position::from_fen(&generated, &tables);
        assert_eq!(reparsed.board, parsed.board);
        assert_eq!(reparsed.side_to_move, Color::Dark);
        assert_eq!(
            reparsed.castling_rights,
            CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE
        );
        assert_eq!(reparsed.en_passant_square, None);
        assert_eq!(reparsed.halfmove_clock, 4);
        assert_eq!(reparsed.fullmove_number, 6);
    }

    #[test]
    fn generated_fen_reports_a_live_en_passant_target() {
        let tables = EngineTables::new();
        let mut position = Position::new_game(&tables);
        position.do_move(long_algebraic_to_move_in("e2e4", &position), &tables);

        let fen = generate_fen(&position);
        assert_eq!(
            fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn lenient_input_serializes_to_its_normal_form() {
        let tables = EngineTables::new();
        // Board field only: defaults fill in the rest.
        let position = Position::from_fen("8/8/8/8/8/8/8/8", &tables);

        assert_eq!(generate_fen(&position), "8/8/8/8/8/8/8/8 b - - 0 1");
    }
}
