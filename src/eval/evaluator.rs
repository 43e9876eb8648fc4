//! Pluggable position evaluation.
//!
//! The search delegates static scoring to this trait so heuristics can be
//! swapped without touching search code.

use crate::board::chess_types::Score;
use crate::board::position::Position;

pub trait Evaluator: Send + Sync {
    /// Centipawn score from the perspective of the side to move.
    fn evaluate(&self, position: &Position) -> Score;
}
