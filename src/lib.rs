//! Crate root module declarations for the Damson Chess engine project.
//!
//! This file exposes all top-level subsystems (board state, precomputed
//! attack tables, move generation, evaluation, search, and utility helpers)
//! so binaries, tests, and external tooling can import stable module paths.

pub mod board {
    pub mod chess_types;
    pub mod position;
    pub mod undo_state;
    pub mod zobrist_keys;
}

pub mod tables {
    pub mod leaper_attacks;
    pub mod magic_numbers;
    pub mod sliding_attacks;
}

pub mod engine_tables;

pub mod moves {
    pub mod move_encoding;
    pub mod move_ordering;
    pub mod move_text;
}

pub mod movegen {
    pub mod move_generator;
    pub mod perft;
}

pub mod eval {
    pub mod evaluator;
    pub mod material;
}

pub mod search {
    pub mod search_engine;
    pub mod transposition_table;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod render_board;
}
