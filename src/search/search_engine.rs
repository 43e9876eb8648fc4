//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Depth-progressive search over a working copy of the position. Each
//! iteration runs a full-window root negamax; an iteration that aborts on
//! a budget never replaces the previous iteration's answer, so the engine
//! always reports a move from a completed depth. Cutoffs are fail-hard:
//! scores stay inside the alpha-beta window.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use crate::board::chess_types::{Move, Score, MAX_PLY};
use crate::board::position::Position;
use crate::engine_tables::EngineTables;
use crate::eval::evaluator::Evaluator;
use crate::movegen::move_generator::{generate_captures, generate_moves};
use crate::moves::move_encoding::NULL_MOVE;
use crate::moves::move_ordering::move_order_score;
use crate::moves::move_text::move_to_long_algebraic;
use crate::search::transposition_table::{Bound, TranspositionTable};

pub const MATE_SCORE: Score = 30000;

/// Ordering weight that puts the hash move ahead of every capture.
const TT_MOVE_ORDER_SCORE: Score = 1_000_000;
/// The wall clock is only sampled once per this many nodes.
const TIME_CHECK_INTERVAL: u64 = 1024;

#[derive(Debug, Clone)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub max_time_ms: Option<u64>,
    pub max_nodes: Option<u64>,
    /// Ignore the three numeric budgets; the stop flag is still honored.
    pub infinite: bool,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_time_ms: Some(5000),
            max_nodes: Some(1_000_000),
            infinite: false,
            stop_flag: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResult {
    /// Null when the position has no legal moves or depth 0 was requested.
    pub best_move: Move,
    pub score: Score,
    pub depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
}

pub struct SearchEngine<'a> {
    tables: &'a EngineTables,
    tt: TranspositionTable,
    /// How many times the current hash must occur in the history scan
    /// before the position counts as a repetition draw.
    pub repetition_threshold: usize,
}

impl<'a> SearchEngine<'a> {
    pub fn new(tables: &'a EngineTables) -> Self {
        Self::with_hash_mb(tables, 16)
    }

    pub fn with_hash_mb(tables: &'a EngineTables, hash_mb: usize) -> Self {
        Self {
            tables,
            tt: TranspositionTable::new_with_mb(hash_mb),
            repetition_threshold: 3,
        }
    }

    /// Forget everything learned by earlier searches. Call between
    /// unrelated positions; within one game the entries stay useful.
    pub fn clear_hash(&mut self) {
        self.tt.clear();
    }

    pub fn search<E: Evaluator>(
        &mut self,
        position: &Position,
        evaluator: &E,
        limits: &SearchLimits,
    ) -> SearchResult {
        let started_at = Instant::now();
        let effective_depth = if limits.infinite {
            MAX_PLY as u8
        } else {
            limits.max_depth
        };
        let deadline = if limits.infinite {
            None
        } else {
            limits
                .max_time_ms
                .map(|ms| started_at + Duration::from_millis(ms.max(1)))
        };
        let max_nodes = if limits.infinite {
            None
        } else {
            limits.max_nodes.filter(|n| *n > 0)
        };

        let mut working = position.clone();
        let mut result = SearchResult::default();

        if effective_depth == 0 {
            result.score = evaluator.evaluate(&working);
            result.nodes = 1;
            result.elapsed_ms = started_at.elapsed().as_millis() as u64;
            return result;
        }

        // A drawn root is settled before any deepening: score 0 and the
        // first legal move, so the caller still has something to play.
        if is_draw(&working, self.repetition_threshold) {
            result.best_move = generate_moves(&working, self.tables)
                .into_iter()
                .find(|&m| working.is_legal(m, self.tables))
                .unwrap_or(NULL_MOVE);
            result.elapsed_ms = started_at.elapsed().as_millis() as u64;
            return result;
        }

        let mut ctx = ActiveSearch {
            tables: self.tables,
            tt: &mut self.tt,
            evaluator,
            repetition_threshold: self.repetition_threshold,
            deadline,
            max_nodes,
            stop_flag: limits.stop_flag.clone(),
            nodes: 0,
        };

        for depth in 1..=effective_depth {
            if ctx.budget_spent() {
                break;
            }
            let Some((best_move, score)) = ctx.search_root(&mut working, depth) else {
                break;
            };

            result.best_move = best_move;
            result.score = score;
            result.depth = depth;
            result.nodes = ctx.nodes;
            debug!(
                "depth {depth} score {score} best {} nodes {} in {} ms",
                move_to_long_algebraic(best_move),
                ctx.nodes,
                started_at.elapsed().as_millis()
            );
        }

        result.nodes = ctx.nodes;
        result.elapsed_ms = started_at.elapsed().as_millis() as u64;
        result
    }
}

/// One search invocation: budgets, counters, and the borrowed table state.
struct ActiveSearch<'c, E> {
    tables: &'c EngineTables,
    tt: &'c mut TranspositionTable,
    evaluator: &'c E,
    repetition_threshold: usize,
    deadline: Option<Instant>,
    max_nodes: Option<u64>,
    stop_flag: Option<Arc<AtomicBool>>,
    nodes: u64,
}

impl<E: Evaluator> ActiveSearch<'_, E> {
    /// Per-node abort check. The stop flag and node budget are consulted
    /// every node; the clock only every `TIME_CHECK_INTERVAL` nodes.
    #[inline]
    fn should_abort(&self) -> bool {
        if let Some(flag) = &self.stop_flag {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }
        if let Some(cap) = self.max_nodes {
            if self.nodes >= cap {
                return true;
            }
        }
        if self.nodes % TIME_CHECK_INTERVAL == 0 {
            if let Some(limit) = self.deadline {
                if Instant::now() >= limit {
                    return true;
                }
            }
        }
        false
    }

    /// Unconditional budget check between iterations.
    fn budget_spent(&self) -> bool {
        if let Some(flag) = &self.stop_flag {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }
        if let Some(cap) = self.max_nodes {
            if self.nodes >= cap {
                return true;
            }
        }
        if let Some(limit) = self.deadline {
            if Instant::now() >= limit {
                return true;
            }
        }
        false
    }

    /// Full-window root search. `None` means the iteration was aborted
    /// and its partial answer must be discarded.
    fn search_root(&mut self, position: &mut Position, depth: u8) -> Option<(Move, Score)> {
        let mut alpha = -MATE_SCORE;
        let beta = MATE_SCORE;

        let tt_move = self
            .tt
            .probe(position.hash_key)
            .map_or(NULL_MOVE, |entry| entry.best_move);
        let mut moves = generate_moves(position, self.tables);
        order_moves(&mut moves, position, tt_move);

        let mut best_move = NULL_MOVE;
        let mut best_score = -MATE_SCORE;
        let mut any_legal = false;

        for m in moves {
            if !position.is_legal(m, self.tables) {
                continue;
            }
            any_legal = true;
            if self.should_abort() {
                return None;
            }

            position.do_move(m, self.tables);
            let reply = self.negamax(position, depth - 1, -beta, -alpha, 1);
            position.undo_move(m);

            let score = -reply?;
            if score > best_score {
                best_score = score;
                best_move = m;
            }
            if score > alpha {
                alpha = score;
            }
        }

        if !any_legal {
            return Some((NULL_MOVE, self.terminal_score(position, 0)));
        }

        Some((best_move, best_score))
    }

    fn negamax(
        &mut self,
        position: &mut Position,
        depth: u8,
        mut alpha: Score,
        beta: Score,
        ply: u8,
    ) -> Option<Score> {
        if self.should_abort() {
            return None;
        }
        if is_draw(position, self.repetition_threshold) {
            return Some(0);
        }

        let alpha_orig = alpha;
        let key = position.hash_key;
        let mut tt_move = NULL_MOVE;

        if let Some(entry) = self.tt.probe(key) {
            tt_move = entry.best_move;
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return Some(entry.score),
                    Bound::Lower if entry.score >= beta => return Some(entry.score),
                    Bound::Upper if entry.score <= alpha => return Some(entry.score),
                    _ => {}
                }
            }
        }

        if depth == 0 {
            return self.quiescence(position, alpha, beta, ply);
        }

        self.nodes += 1;

        let mut moves = generate_moves(position, self.tables);
        order_moves(&mut moves, position, tt_move);

        let mut best_move = NULL_MOVE;
        let mut any_legal = false;

        for m in moves {
            if !position.is_legal(m, self.tables) {
                continue;
            }
            any_legal = true;

            position.do_move(m, self.tables);
            let reply = self.negamax(position, depth - 1, -beta, -alpha, ply + 1);
            position.undo_move(m);

            let score = -reply?;
            if score >= beta {
                self.tt.store(key, beta, m, depth, Bound::Lower);
                return Some(beta);
            }
            if score > alpha {
                alpha = score;
                best_move = m;
            }
        }

        if !any_legal {
            return Some(self.terminal_score(position, ply));
        }

        let bound = if alpha > alpha_orig {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.tt.store(key, alpha, best_move, depth, bound);

        Some(alpha)
    }

    fn quiescence(
        &mut self,
        position: &mut Position,
        mut alpha: Score,
        beta: Score,
        ply: u8,
    ) -> Option<Score> {
        if self.should_abort() {
            return None;
        }
        if is_draw(position, self.repetition_threshold) {
            return Some(0);
        }

        self.nodes += 1;

        let stand_pat = self.evaluator.evaluate(position);
        if stand_pat >= beta {
            return Some(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
        if usize::from(ply) >= MAX_PLY {
            return Some(alpha);
        }

        let mut moves = generate_captures(position, self.tables);
        order_moves(&mut moves, position, NULL_MOVE);

        for m in moves {
            if !position.is_legal(m, self.tables) {
                continue;
            }

            position.do_move(m, self.tables);
            let reply = self.quiescence(position, -beta, -alpha, ply + 1);
            position.undo_move(m);

            let score = -reply?;
            if score >= beta {
                return Some(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }

        Some(alpha)
    }

    /// Score for a position with no legal moves: mated or stalemated.
    /// Mates closer to the root are worth more.
    fn terminal_score(&self, position: &Position, ply: u8) -> Score {
        if position.in_check(self.tables) {
            -MATE_SCORE + Score::from(ply)
        } else {
            0
        }
    }
}

/// Hash move first, then captures and promotions by their static score.
fn order_moves(moves: &mut [Move], position: &Position, tt_move: Move) {
    moves.sort_unstable_by_key(|&m| {
        let score = if m == tt_move {
            TT_MOVE_ORDER_SCORE
        } else {
            move_order_score(m, position)
        };
        -score
    });
}

/// Fifty-move rule, or the current hash repeating often enough inside the
/// reversible tail of the history. Repetitions need the same side to move,
/// hence the parity step, and cannot predate the last irreversible move,
/// hence the halfmove-clock bound.
fn is_draw(position: &Position, repetition_threshold: usize) -> bool {
    if position.halfmove_clock >= 100 {
        return true;
    }

    let current = position.hash_key;
    let max_scan = usize::from(position.halfmove_clock)
        .saturating_add(1)
        .min(position.repetition_history.len());

    let mut count = 0usize;
    for hash in position
        .repetition_history
        .iter()
        .rev()
        .take(max_scan)
        .step_by(2)
    {
        if *hash == current {
            count += 1;
            if count >= repetition_threshold {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::chess_types::STARTING_POSITION_FEN;
    use crate::eval::material::MaterialEvaluator;
    use crate::moves::move_encoding::is_null;
    use crate::moves::move_text::long_algebraic_to_move_in;

    fn limits_with_depth(depth: u8) -> SearchLimits {
        SearchLimits {
            max_depth: depth,
            max_time_ms: None,
            max_nodes: None,
            ..SearchLimits::default()
        }
    }

    #[test]
    fn depth_zero_returns_the_static_evaluation_and_no_move() {
        let tables = EngineTables::new();
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1", &tables);
        let mut engine = SearchEngine::with_hash_mb(&tables, 1);

        let result = engine.search(&position, &MaterialEvaluator, &limits_with_depth(0));
        assert!(is_null(result.best_move));
        assert_eq!(result.score, 900);
        assert_eq!(result.depth, 0);
    }

    #[test]
    fn search_prefers_the_winning_capture_in_a_simple_position() {
        let tables = EngineTables::new();
        let position = Position::from_fen("4k3/8/8/8/8/8/4q3/4KQ2 w - - 0 1", &tables);
        let mut engine = SearchEngine::with_hash_mb(&tables, 1);

        let result = engine.search(&position, &MaterialEvaluator, &limits_with_depth(1));
        assert_eq!(move_to_long_algebraic(result.best_move), "f1e2");
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn search_proves_a_mate_in_one() {
        let tables = EngineTables::new();
        let position = Position::from_fen("6k1/5Q2/6K1/8/8/8/8/8 w - - 0 1", &tables);
        let mut engine = SearchEngine::with_hash_mb(&tables, 1);

        let result = engine.search(&position, &MaterialEvaluator, &limits_with_depth(2));
        assert_eq!(result.score, MATE_SCORE - 1);

        // The chosen move really ends the game.
        let mut after = position.clone();
        after.do_move(result.best_move, &tables);
        let replies: Vec<_> = generate_moves(&after, &tables)
            .into_iter()
            .filter(|&m| after.is_legal(m, &tables))
            .collect();
        assert!(replies.is_empty());
        assert!(after.in_check(&tables));
    }

    #[test]
    fn stalemate_at_the_root_reports_a_null_move_and_zero() {
        let tables = EngineTables::new();
        let position = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", &tables);
        let mut engine = SearchEngine::with_hash_mb(&tables, 1);

        let result = engine.search(&position, &MaterialEvaluator, &limits_with_depth(3));
        assert!(is_null(result.best_move));
        assert_eq!(result.score, 0);
    }

    #[test]
    fn hundred_halfmove_root_scores_zero_regardless_of_material() {
        let tables = EngineTables::new();
        // Dark is a full queen up, but the clock has run out of patience.
        let position = Position::from_fen("4k3/8/8/8/8/8/4q3/4K3 w - - 100 1", &tables);
        let mut engine = SearchEngine::with_hash_mb(&tables, 1);

        let result = engine.search(&position, &MaterialEvaluator, &limits_with_depth(4));
        assert_eq!(result.score, 0);
        assert_eq!(result.depth, 0);
        assert!(!is_null(result.best_move));
    }

    #[test]
    fn repetition_threshold_is_tunable() {
        let tables = EngineTables::new();
        let mut position = Position::new_game(&tables);
        for text in ["b1c3", "b8c6", "c3b1", "c6b8"] {
            let m = long_algebraic_to_move_in(text, &position);
            position.do_move(m, &tables);
        }
        // The start hash has now occurred twice on Light's move.

        let mut engine = SearchEngine::with_hash_mb(&tables, 1);
        let normal = engine.search(&position, &MaterialEvaluator, &limits_with_depth(2));
        assert!(normal.depth >= 1);

        engine.repetition_threshold = 2;
        let drawn = engine.search(&position, &MaterialEvaluator, &limits_with_depth(2));
        assert_eq!(drawn.depth, 0);
        assert_eq!(drawn.score, 0);
        assert!(!is_null(drawn.best_move));
    }

    #[test]
    fn a_raised_stop_flag_prevents_any_iteration() {
        let tables = EngineTables::new();
        let position = Position::from_fen(STARTING_POSITION_FEN, &tables);
        let mut engine = SearchEngine::with_hash_mb(&tables, 1);

        let flag = Arc::new(AtomicBool::new(true));
        let limits = SearchLimits {
            max_depth: 5,
            infinite: true,
            stop_flag: Some(Arc::clone(&flag)),
            ..SearchLimits::default()
        };

        let result = engine.search(&position, &MaterialEvaluator, &limits);
        assert_eq!(result.depth, 0);
        assert!(is_null(result.best_move));
    }

    #[test]
    fn the_node_budget_is_respected() {
        let tables = EngineTables::new();
        let position = Position::from_fen(STARTING_POSITION_FEN, &tables);
        let mut engine = SearchEngine::with_hash_mb(&tables, 1);

        let limits = SearchLimits {
            max_depth: 8,
            max_time_ms: None,
            max_nodes: Some(200),
            ..SearchLimits::default()
        };

        let result = engine.search(&position, &MaterialEvaluator, &limits);
        assert!(result.nodes <= 200, "nodes exceeded cap: {}", result.nodes);
    }

    #[test]
    fn deeper_iterations_keep_a_sane_mate_answer() {
        let tables = EngineTables::new();
        // Back-rank mate in one for Light, with distractions available.
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1", &tables);
        let mut engine = SearchEngine::with_hash_mb(&tables, 1);

        let result = engine.search(&position, &MaterialEvaluator, &limits_with_depth(4));
        assert_eq!(move_to_long_algebraic(result.best_move), "a1a8");
        assert_eq!(result.score, MATE_SCORE - 1);
        assert_eq!(result.depth, 4);
    }
}
