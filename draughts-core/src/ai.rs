//! Random, minimax, and alpha-beta move selection

use crate::board::Square;
use crate::book::OpeningBook;
use crate::engine::Engine;
use crate::game::{GameState, GameStatus, Move};
use crate::pieces::Color;
use crate::table::{Bound, TableStats, TranspositionTable, ZobristKeys};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Default transposition table capacity
const TABLE_CAPACITY: usize = 1 << 16;

/// Search strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Uniform random over legal moves (captures are already mandatory)
    Random,
    /// Plain fixed-depth minimax, no pruning
    Minimax { depth: u32 },
    /// Alpha-beta with transposition table and move ordering
    AlphaBeta { depth: u32 },
}

/// Difficulty presets. The strongest tier is the MCTS player in the
/// companion crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn strategy(self) -> Strategy {
        match self {
            Difficulty::Easy => Strategy::Random,
            Difficulty::Medium => Strategy::Minimax { depth: 3 },
            Difficulty::Hard => Strategy::AlphaBeta { depth: 6 },
        }
    }
}

/// Computer player over an injected [`Engine`]
pub struct AiPlayer<E: Engine> {
    engine: E,
    strategy: Strategy,
    keys: ZobristKeys,
    table: TranspositionTable,
    book: OpeningBook,
    rng: ChaCha8Rng,
}

impl<E: Engine> AiPlayer<E> {
    pub fn new(engine: E, strategy: Strategy, board_size: i8) -> Self {
        Self::with_seed(engine, strategy, board_size, 42)
    }

    pub fn with_seed(engine: E, strategy: Strategy, board_size: i8, seed: u64) -> Self {
        Self {
            engine,
            strategy,
            keys: ZobristKeys::new(board_size),
            table: TranspositionTable::new(TABLE_CAPACITY),
            book: OpeningBook::empty(0),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = book;
        self
    }

    pub fn difficulty(engine: E, difficulty: Difficulty, board_size: i8) -> Self {
        Self::new(engine, difficulty.strategy(), board_size)
    }

    /// Transposition table diagnostics
    pub fn table_stats(&self) -> TableStats {
        self.table.stats()
    }

    /// Clear per-game caches before a new game
    pub fn reset(&mut self) {
        self.table.clear();
        self.book.reset();
    }

    /// Pick a move for the side to move, or None when the game is over or
    /// the side has no legal move.
    pub fn best_move(&mut self, state: &GameState) -> Option<Move> {
        if state.status() != GameStatus::Ongoing {
            return None;
        }
        let mover = state.current_player();
        let moves = self.engine.all_moves(state, mover);
        if moves.is_empty() {
            return None;
        }
        if moves.len() == 1 {
            return Some(moves[0].clone());
        }

        // Book moves short-circuit search for the thinking strategies
        if self.strategy != Strategy::Random {
            if let Some(mv) = self.book.lookup(state) {
                return Some(mv);
            }
        }

        match self.strategy {
            Strategy::Random => moves.choose(&mut self.rng).cloned(),
            Strategy::Minimax { depth } => self.pick_minimax(state, moves, depth),
            Strategy::AlphaBeta { depth } => self.pick_alphabeta(state, moves, depth),
        }
    }

    /// Play a full game against itself, for benchmarks and tests
    pub fn play_game(&mut self, initial: GameState, max_plies: usize) -> (GameState, Vec<Move>) {
        let mut state = initial;
        let mut history = Vec::new();

        while state.status() == GameStatus::Ongoing && history.len() < max_plies {
            match self.best_move(&state) {
                Some(mv) => {
                    state = self.engine.apply(&state, &mv);
                    history.push(mv);
                }
                None => break,
            }
        }

        (state, history)
    }

    // ========================================================================
    // MINIMAX
    // ========================================================================

    fn pick_minimax(&mut self, state: &GameState, moves: Vec<Move>, depth: u32) -> Option<Move> {
        let root = state.current_player();
        let mut best: Option<(i32, Move)> = None;

        for mv in moves {
            let child = self.engine.apply(state, &mv);
            let score = self.minimax(&child, depth.saturating_sub(1), root);
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((score, mv));
            }
        }

        best.map(|(_, mv)| mv)
    }

    /// Fixed-depth minimax, maximizing on the root color's plies and
    /// minimizing on the opponent's. A side with no legal moves is a lost
    /// (terminal) position and scores through the evaluator, never a panic.
    fn minimax(&self, state: &GameState, depth: u32, root: Color) -> i32 {
        if depth == 0 || state.status() != GameStatus::Ongoing {
            return self.engine.evaluate(state, root);
        }

        let mover = state.current_player();
        let moves = self.engine.all_moves(state, mover);
        if moves.is_empty() {
            return self.engine.evaluate(state, root);
        }

        let maximizing = mover == root;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves {
            let child = self.engine.apply(state, &mv);
            let score = self.minimax(&child, depth - 1, root);
            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }

        best
    }

    // ========================================================================
    // ALPHA-BETA WITH TRANSPOSITION TABLE
    // ========================================================================

    fn pick_alphabeta(&mut self, state: &GameState, mut moves: Vec<Move>, depth: u32) -> Option<Move> {
        let root = state.current_player();
        let hash = self.keys.hash(state);
        self.order_moves(&mut moves, hash);

        let mut alpha = i32::MIN + 1;
        let beta = i32::MAX;
        let mut best: Option<Move> = None;

        for mv in moves {
            let child = self.engine.apply(state, &mv);
            let score = self.alphabeta(&child, depth.saturating_sub(1), alpha, beta, root);
            if score > alpha || best.is_none() {
                alpha = alpha.max(score);
                best = Some(mv);
            }
        }

        if let Some(ref mv) = best {
            self.table
                .store(hash, depth, alpha, Bound::Exact, Some((mv.from, mv.to)));
        }
        best
    }

    fn alphabeta(
        &mut self,
        state: &GameState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        root: Color,
    ) -> i32 {
        if depth == 0 || state.status() != GameStatus::Ongoing {
            return self.engine.evaluate(state, root);
        }

        let mover = state.current_player();
        let maximizing = mover == root;
        let hash = self.keys.hash(state);

        // Table entries are scored relative to the side to move at the
        // hashed position, so one warm table serves searches rooted at
        // either color. Translate the window in and the score back out.
        let (probe_alpha, probe_beta) = if maximizing {
            (alpha, beta)
        } else {
            (-beta, -alpha)
        };
        if let Some(score) = self.table.probe(hash, depth, probe_alpha, probe_beta) {
            return if maximizing { score } else { -score };
        }

        let mut moves = self.engine.all_moves(state, mover);
        if moves.is_empty() {
            return self.engine.evaluate(state, root);
        }
        self.order_moves(&mut moves, hash);

        let (alpha_in, beta_in) = (alpha, beta);
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_key: Option<(Square, Square)> = None;

        for mv in moves {
            let child = self.engine.apply(state, &mv);
            let score = self.alphabeta(&child, depth - 1, alpha, beta, root);

            if maximizing {
                if score > best {
                    best = score;
                    best_key = Some((mv.from, mv.to));
                }
                alpha = alpha.max(best);
            } else {
                if score < best {
                    best = score;
                    best_key = Some((mv.from, mv.to));
                }
                beta = beta.min(best);
            }
            if alpha >= beta {
                break;
            }
        }

        let bound = if best <= alpha_in {
            Bound::Upper
        } else if best >= beta_in {
            Bound::Lower
        } else {
            Bound::Exact
        };
        let (stored_score, stored_bound) = if maximizing {
            (best, bound)
        } else {
            (-best, bound.flipped())
        };
        self.table.store(hash, depth, stored_score, stored_bound, best_key);

        best
    }

    /// Order for search: remembered best move first, then by descending
    /// capture count, then promotions.
    fn order_moves(&self, moves: &mut [Move], hash: u64) {
        let hint = self.table.best_move_hint(hash);
        moves.sort_by_key(|mv| {
            let is_hint = hint == Some((mv.from, mv.to));
            (
                !is_hint,
                std::cmp::Reverse(mv.captured.len()),
                !mv.is_promotion,
            )
        });
    }
}

// ============================================================================
// TESTS
// ============================================================================
