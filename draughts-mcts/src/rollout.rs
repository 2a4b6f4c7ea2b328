//! Rollout (simulation) policy for MCTS
//!
//! Plays out a position with random moves, preferring captures, and
//! scores the result as a winner (or None when undecided).

use draughts_core::{Color, Engine, GameState, GameStatus, Move};
use rand::prelude::*;

/// Result of a rollout simulation
#[derive(Clone, Debug)]
pub struct RolloutOutcome {
    /// Winning side, or None if the playout was cut off level
    pub winner: Option<Color>,
    /// Number of moves played
    pub moves_played: u32,
}

/// Play random moves until the game ends or `max_depth` is reached.
///
/// Captures are preferred over quiet moves when both are on offer. A
/// playout cut off at the depth limit falls back to the sign of the
/// static evaluation from white's perspective.
pub fn rollout<E: Engine, R: Rng>(
    engine: &E,
    state: &GameState,
    max_depth: u32,
    rng: &mut R,
) -> RolloutOutcome {
    let mut current = state.clone();
    let mut moves_played = 0;

    while current.status() == GameStatus::Ongoing && moves_played < max_depth {
        let moves = engine.all_moves(&current, current.current_player());
        if moves.is_empty() {
            break;
        }

        let mv = select_move(&moves, rng);
        current = engine.apply(&current, &mv);
        moves_played += 1;
    }

    let winner = match current.status() {
        GameStatus::Ongoing => winner_by_eval(engine, &current),
        finished => finished.winner(),
    };

    RolloutOutcome {
        winner,
        moves_played,
    }
}

/// Pick a random capture if any exists, otherwise a random move
fn select_move<R: Rng>(moves: &[Move], rng: &mut R) -> Move {
    let captures: Vec<&Move> = moves.iter().filter(|m| m.is_capture()).collect();
    if captures.is_empty() {
        moves[rng.gen_range(0..moves.len())].clone()
    } else {
        captures[rng.gen_range(0..captures.len())].clone()
    }
}

/// Score an undecided position by the sign of the evaluation
fn winner_by_eval<E: Engine>(engine: &E, state: &GameState) -> Option<Color> {
    let score = engine.evaluate(state, Color::White);
    if score > 0 {
        Some(Color::White)
    } else if score < 0 {
        Some(Color::Black)
    } else {
        None
    }
}

// ============================================================================
// TESTS
// ============================================================================
