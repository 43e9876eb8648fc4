//! Perft: exhaustive legal move counting to a fixed depth.
//!
//! The standard cross-check for generation and make/unmake correctness.
//! Leaf totals are broken out by move class so a miscount points at the
//! responsible generator pass.

use crate::board::chess_types::Move;
use crate::board::position::Position;
use crate::engine_tables::EngineTables;
use crate::movegen::move_generator::generate_moves;
use crate::moves::move_encoding::{is_capture, is_castling, is_en_passant, is_promotion};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
    }

    fn leaf(m: Move) -> PerftCounts {
        PerftCounts {
            nodes: 1,
            captures: usize::from(is_capture(m)),
            en_passant: usize::from(is_en_passant(m)),
            castles: usize::from(is_castling(m)),
            promotions: usize::from(is_promotion(m)),
        }
    }
}

/// Count legal move paths of length `depth` from `position`, classifying
/// the moves that reach the final ply. The position is walked with
/// `do_move`/`undo_move` and left exactly as it was handed in.
pub fn perft(position: &mut Position, tables: &EngineTables, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();

    for m in generate_moves(position, tables) {
        if !position.is_legal(m, tables) {
            continue;
        }

        if depth == 1 {
            total.merge(PerftCounts::leaf(m));
        } else {
            position.do_move(m, tables);
            total.merge(perft(position, tables, depth - 1));
            position.undo_move(m);
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::chess_types::STARTING_POSITION_FEN;

    const KIWIPETE_FEN: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const ENDGAME_FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const PROMOTION_FEN: &str =
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";

    fn counts(fen: &str, depth: u8) -> PerftCounts {
        let tables = EngineTables::new();
        let mut position = Position::from_fen(fen, &tables);
        let before = position.clone();
        let result = perft(&mut position, &tables, depth);
        // Walking the tree must not disturb the root.
        assert_eq!(position.board, before.board);
        assert_eq!(position.hash_key, before.hash_key);
        result
    }

    #[test]
    fn perft_depth_zero_counts_the_root_itself() {
        assert_eq!(counts(STARTING_POSITION_FEN, 0).nodes, 1);
    }

    #[test]
    fn starting_position_shallow_depths() {
        assert_eq!(
            counts(STARTING_POSITION_FEN, 1),
            PerftCounts {
                nodes: 20,
                ..PerftCounts::default()
            }
        );
        assert_eq!(
            counts(STARTING_POSITION_FEN, 2),
            PerftCounts {
                nodes: 400,
                ..PerftCounts::default()
            }
        );
        assert_eq!(
            counts(STARTING_POSITION_FEN, 3),
            PerftCounts {
                nodes: 8902,
                captures: 34,
                en_passant: 0,
                castles: 0,
                promotions: 0,
            }
        );
    }

    #[test]
    fn starting_position_depth_four() {
        assert_eq!(
            counts(STARTING_POSITION_FEN, 4),
            PerftCounts {
                nodes: 197_281,
                captures: 1576,
                en_passant: 0,
                castles: 0,
                promotions: 0,
            }
        );
    }

    #[test]
    fn kiwipete_exercises_castling_and_en_passant() {
        assert_eq!(
            counts(KIWIPETE_FEN, 1),
            PerftCounts {
                nodes: 48,
                captures: 8,
                en_passant: 0,
                castles: 2,
                promotions: 0,
            }
        );
        assert_eq!(
            counts(KIWIPETE_FEN, 2),
            PerftCounts {
                nodes: 2039,
                captures: 351,
                en_passant: 1,
                castles: 91,
                promotions: 0,
            }
        );
    }

    #[test]
    fn rook_endgame_exercises_en_passant_discoveries() {
        assert_eq!(
            counts(ENDGAME_FEN, 2),
            PerftCounts {
                nodes: 191,
                captures: 14,
                en_passant: 0,
                castles: 0,
                promotions: 0,
            }
        );
        assert_eq!(
            counts(ENDGAME_FEN, 3),
            PerftCounts {
                nodes: 2812,
                captures: 209,
                en_passant: 2,
                castles: 0,
                promotions: 0,
            }
        );
    }

    #[test]
    fn promotion_heavy_position_counts_all_four_kinds() {
        assert_eq!(
            counts(PROMOTION_FEN, 3),
            PerftCounts {
                nodes: 9467,
                captures: 1021,
                en_passant: 4,
                castles: 0,
                promotions: 120,
            }
        );
    }
}
