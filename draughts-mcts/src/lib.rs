//! Draughts MCTS - Monte Carlo Tree Search player
//!
//! Builds on `draughts-core` for rules and evaluation:
//! - Tree policy (UCB1) over an arena-allocated tree
//! - Capture-preferring random rollouts
//! - Iteration- and time-budgeted search loop

pub mod rollout;
pub mod search;
pub mod tree;

pub use rollout::{rollout, RolloutOutcome};
pub use search::{run_search, MoveStatistics, SearchResult};
pub use tree::{MctsNode, MctsTree, NodeId, NodeStats};

use draughts_core::{Engine, GameState, GameStatus, Move, OpeningBook, RulesEngine};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// MCTS configuration
#[derive(Clone, Debug)]
pub struct MctsConfig {
    /// Iteration cap
    pub iterations: usize,
    /// UCB1 exploration constant
    pub exploration: f32,
    /// Rollout depth cap before the evaluation fallback kicks in
    pub max_rollout_depth: u32,
    /// Optional wall-clock deadline, checked every iteration
    pub time_budget: Option<Duration>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            exploration: 1.41, // sqrt(2)
            max_rollout_depth: 60,
            time_budget: None,
        }
    }
}

/// MCTS move picker, the strongest tier above the alpha-beta player
pub struct MctsPlayer<E: Engine> {
    engine: E,
    config: MctsConfig,
    book: OpeningBook,
    rng: ChaCha8Rng,
}

impl MctsPlayer<RulesEngine> {
    pub fn new(config: MctsConfig) -> Self {
        Self::with_engine(RulesEngine::new(), config)
    }
}

impl<E: Engine> MctsPlayer<E> {
    pub fn with_engine(engine: E, config: MctsConfig) -> Self {
        Self {
            engine,
            config,
            book: OpeningBook::empty(0),
            rng: ChaCha8Rng::seed_from_u64(42),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = book;
        self
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Clear per-game state before starting a new game
    pub fn reset(&mut self) {
        self.book.reset();
    }

    /// Pick a move for the side to play
    pub fn best_move(&mut self, state: &GameState) -> Option<Move> {
        if state.status() != GameStatus::Ongoing {
            return None;
        }

        if let Some(mv) = self.book.lookup(state) {
            return Some(mv);
        }

        self.search(state).best_move()
    }

    /// Run a full search and keep the statistics
    pub fn search(&mut self, state: &GameState) -> SearchResult {
        run_search(&self.engine, state.clone(), &self.config, &mut self.rng)
    }

    /// Play a game to completion (or the round cap), returning the final
    /// state and the moves made.
    pub fn play_game(&mut self, initial: GameState, max_rounds: u32) -> (GameState, Vec<Move>) {
        let mut state = initial;
        let mut moves = Vec::new();

        for _ in 0..max_rounds {
            let Some(mv) = self.best_move(&state) else {
                break;
            };
            state = self.engine.apply(&state, &mv);
            moves.push(mv);

            if state.status() != GameStatus::Ongoing {
                break;
            }
        }

        (state, moves)
    }
}

// ============================================================================
// TESTS
// ============================================================================
