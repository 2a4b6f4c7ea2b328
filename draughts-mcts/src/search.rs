//! MCTS search loop
//!
//! Implements the four phases of each iteration:
//! 1. Selection - descend existing nodes via UCB1
//! 2. Expansion - add one child for an untried move
//! 3. Simulation - rollout to a terminal state or depth cap
//! 4. Backpropagation - update statistics along the path

use crate::rollout::rollout;
use crate::tree::MctsTree;
use crate::MctsConfig;
use draughts_core::{Engine, GameState, Move};
use rand::Rng;
use std::time::Instant;

// ============================================================================
// SEARCH RESULT
// ============================================================================

/// Result of an MCTS search
#[derive(Debug)]
pub struct SearchResult {
    /// The final tree after search
    pub tree: MctsTree,
    /// Total simulations performed
    pub total_simulations: u32,
    /// Statistics for each root move
    pub move_stats: Vec<MoveStatistics>,
}

/// Statistics for a single move at the root
#[derive(Clone, Debug)]
pub struct MoveStatistics {
    pub mv: Move,
    pub visits: u32,
    pub win_rate: f32,
}

impl SearchResult {
    /// The best move (most visited root child)
    pub fn best_move(&self) -> Option<Move> {
        self.tree.best_move()
    }

    /// All root moves sorted by visit count, descending
    pub fn moves_by_visits(&self) -> Vec<(Move, u32)> {
        let mut moves: Vec<_> = self
            .move_stats
            .iter()
            .map(|s| (s.mv.clone(), s.visits))
            .collect();
        moves.sort_by(|a, b| b.1.cmp(&a.1));
        moves
    }
}

// ============================================================================
// SEARCH LOOP
// ============================================================================

/// Run MCTS from the given root state.
///
/// Stops at the iteration cap or, if a time budget is configured, at the
/// deadline (checked every iteration). A root with exactly one legal move
/// returns it immediately without simulating.
pub fn run_search<E: Engine, R: Rng>(
    engine: &E,
    root_state: GameState,
    config: &MctsConfig,
    rng: &mut R,
) -> SearchResult {
    let mut tree = MctsTree::new(engine, root_state);

    // A forced move needs no search
    if tree.get(tree.root()).untried_moves.len() == 1 {
        tree.expand(engine, tree.root());
        let move_stats = collect_move_statistics(&tree);
        return SearchResult {
            tree,
            total_simulations: 0,
            move_stats,
        };
    }

    let start = Instant::now();
    for _ in 0..config.iterations {
        if let Some(budget) = config.time_budget {
            if start.elapsed() >= budget {
                break;
            }
        }
        run_single_iteration(engine, &mut tree, config, rng);
    }

    let total_simulations = tree.total_simulations();
    let move_stats = collect_move_statistics(&tree);

    SearchResult {
        tree,
        total_simulations,
        move_stats,
    }
}

/// One complete MCTS cycle
fn run_single_iteration<E: Engine, R: Rng>(
    engine: &E,
    tree: &mut MctsTree,
    config: &MctsConfig,
    rng: &mut R,
) {
    // Phase 1: selection
    let leaf_id = tree.select_leaf(config.exploration);

    // Phase 2: expansion (unless terminal)
    let simulation_node = if !tree.get(leaf_id).is_terminal() {
        tree.expand(engine, leaf_id).unwrap_or(leaf_id)
    } else {
        leaf_id
    };

    // Phase 3: simulation
    let node = tree.get(simulation_node);
    let winner = match node.terminal_status {
        Some(status) => status.winner(),
        None => rollout(engine, &node.state, config.max_rollout_depth, rng).winner,
    };

    // Phase 4: backpropagation
    tree.backpropagate(simulation_node, winner);
}

/// Collect visit/win statistics for the root's children
fn collect_move_statistics(tree: &MctsTree) -> Vec<MoveStatistics> {
    let root = tree.get(tree.root());

    root.children
        .iter()
        .map(|(mv, child_id)| {
            let child = tree.get(*child_id);
            MoveStatistics {
                mv: mv.clone(),
                visits: child.stats.visits,
                win_rate: child.stats.win_rate(),
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
