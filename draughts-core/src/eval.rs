//! Position evaluation

use crate::game::{GameState, GameStatus};
use crate::pieces::{Color, PieceKind};
use serde::{Deserialize, Serialize};

/// Score for a won position (effectively infinite)
pub const WIN_VALUE: i32 = 100_000;

/// Evaluation weights in centipawn-like units
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EvalWeights {
    pub pawn: i32,
    pub king: i32,
    /// Bonus per step of closeness to the board center
    pub center: i32,
    /// Bonus per row a pawn has advanced toward promotion
    pub advance: i32,
    /// Bonus for a pawn still guarding its home row
    pub back_row: i32,
    /// Weight on the legal-move-count difference
    pub mobility: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            pawn: 100,
            king: 300,
            center: 4,
            advance: 3,
            back_row: 10,
            mobility: 2,
        }
    }
}

/// Evaluate a position from `color`'s point of view. Positive favors
/// `color`; the material and positional terms are color-symmetric, so
/// `evaluate(s, White) == -evaluate(s, Black)`.
pub fn evaluate(state: &GameState, color: Color, weights: &EvalWeights) -> i32 {
    match state.status() {
        GameStatus::Ongoing => {}
        status => {
            return if status.winner() == Some(color) {
                WIN_VALUE
            } else {
                -WIN_VALUE
            };
        }
    }

    let size = state.variant().board_size;
    let max_closeness = size / 2 - 1;
    let mut score = 0i32;

    for piece in state.pieces() {
        let mut value = match piece.kind {
            PieceKind::Pawn => weights.pawn,
            PieceKind::King => weights.king,
        };

        let closeness = max_closeness - piece.square.distance_to_center(size);
        value += weights.center * closeness as i32;

        if piece.kind == PieceKind::Pawn {
            let advanced = match piece.color {
                Color::White => (size - 1 - piece.square.row) as i32,
                Color::Black => piece.square.row as i32,
            };
            value += weights.advance * advanced;

            if piece.square.row == piece.color.back_row(size) {
                value += weights.back_row;
            }
        }

        if piece.color == color {
            score += value;
        } else {
            score -= value;
        }
    }

    if weights.mobility != 0 {
        let own = state.mobility(color) as i32;
        let opp = state.mobility(color.opponent()) as i32;
        score += weights.mobility * (own - opp);
    }

    score
}
