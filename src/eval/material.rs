use crate::board::chess_types::*;
use crate::board::position::Position;
use crate::eval::evaluator::Evaluator;
use crate::moves::move_ordering::piece_value;

/// Pure material count. The baseline the search tests run against;
/// anything positional belongs in a richer `Evaluator`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    fn balance_light_minus_dark(position: &Position) -> Score {
        let mut score: Score = 0;

        // Kings carry no material term.
        for kind in [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ] {
            let value = piece_value(kind);
            let light = position.pieces_of(Color::Light, kind).count_ones() as Score;
            let dark = position.pieces_of(Color::Dark, kind).count_ones() as Score;
            score += (light - dark) * value;
        }

        score
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, position: &Position) -> Score {
        let light_minus_dark = Self::balance_light_minus_dark(position);
        match position.side_to_move {
            Color::Light => light_minus_dark,
            Color::Dark => -light_minus_dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MaterialEvaluator;
    use crate::board::chess_types::STARTING_POSITION_FEN;
    use crate::board::position::Position;
    use crate::engine_tables::EngineTables;
    use crate::eval::evaluator::Evaluator;

    #[test]
    fn material_reflects_the_side_to_move_perspective() {
        let tables = EngineTables::new();
        let light_to_move = Position::from_fen("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1", &tables);
        let dark_to_move = Position::from_fen("4k3/8/8/8/8/8/8/4KQ2 b - - 0 1", &tables);

        let evaluator = MaterialEvaluator;
        assert_eq!(evaluator.evaluate(&light_to_move), 900);
        assert_eq!(evaluator.evaluate(&dark_to_move), -900);
    }

    #[test]
    fn balanced_positions_score_zero() {
        let tables = EngineTables::new();
        let start = Position::from_fen(STARTING_POSITION_FEN, &tables);
        assert_eq!(MaterialEvaluator.evaluate(&start), 0);
    }

    #[test]
    fn mixed_material_sums_the_standard_values() {
        let tables = EngineTables::new();
        // Light: queen + bishop. Dark: rook + knight.
        let position = Position::from_fen("4k3/8/8/8/8/8/6rn/4KBQ1 w - - 0 1", &tables);
        assert_eq!(MaterialEvaluator.evaluate(&position), 900 + 330 - 500 - 320);
    }
}
