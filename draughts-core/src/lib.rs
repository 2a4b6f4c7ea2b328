//! Draughts Core - rules engine and adversarial search
//!
//! This crate provides the core logic for configurable-variant draughts:
//! - Board geometry and Manoury notation
//! - Variant rules (flying kings, mandatory maximum capture, multi-jump
//!   chains, promotion)
//! - Game state, legal-move generation, and pure state transitions
//! - Position evaluation with material, positional, and mobility terms
//! - Zobrist hashing and a bounded transposition table
//! - Weighted opening book with opening-name recognition
//! - Random, minimax, and alpha-beta move selection
//! - Post-game move-quality analysis
//!
//! Monte Carlo Tree Search lives in the companion `draughts-mcts` crate.

pub mod ai;
pub mod analyzer;
pub mod board;
pub mod book;
pub mod engine;
pub mod eval;
pub mod game;
pub mod pieces;
pub mod table;
pub mod variant;

// Re-exports for convenient access
pub use ai::{AiPlayer, Difficulty, Strategy};
pub use analyzer::{Analyzer, GameAnalysis, MoveClass};
pub use board::{Diagonal, Square, DIAGONALS};
pub use book::{BookReply, OpeningBook};
pub use engine::{Engine, RulesEngine};
pub use eval::{evaluate, EvalWeights, WIN_VALUE};
pub use game::{GameState, GameStatus, Move};
pub use pieces::{Color, Piece, PieceKind};
pub use table::{Bound, TableStats, TranspositionTable, ZobristKeys};
pub use variant::Variant;
