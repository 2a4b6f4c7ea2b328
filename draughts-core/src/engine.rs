//! The seam between search and rules
//!
//! Search and analysis never touch the rules directly; they go through
//! [`Engine`], so the same search code serves any board variant, and tests
//! can substitute stub rules.

use crate::eval::{evaluate, EvalWeights};
use crate::game::{GameState, Move};
use crate::pieces::Color;

/// Move generation, state transition, and evaluation as one injectable
/// surface.
pub trait Engine {
    /// All legal moves for `color` in `state`
    fn all_moves(&self, state: &GameState, color: Color) -> Vec<Move>;

    /// Pure state transition
    fn apply(&self, state: &GameState, mv: &Move) -> GameState;

    /// Signed score, positive favoring `color`
    fn evaluate(&self, state: &GameState, color: Color) -> i32;
}

/// The standard implementation: the crate's own move generator and
/// evaluator with a configurable weight set.
#[derive(Clone, Debug, Default)]
pub struct RulesEngine {
    pub weights: EvalWeights,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: EvalWeights) -> Self {
        Self { weights }
    }
}

impl Engine for RulesEngine {
    fn all_moves(&self, state: &GameState, color: Color) -> Vec<Move> {
        state.all_moves(color)
    }

    fn apply(&self, state: &GameState, mv: &Move) -> GameState {
        state.apply_move(mv)
    }

    fn evaluate(&self, state: &GameState, color: Color) -> i32 {
        evaluate(state, color, &self.weights)
    }
}
