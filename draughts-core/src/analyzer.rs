//! Post-game move-quality analysis

use crate::engine::Engine;
use crate::game::{GameState, Move};
use crate::pieces::Color;
use serde::{Deserialize, Serialize};

/// Classification thresholds on the accuracy score
const BRILLIANT_AT: i32 = 200;
const GREAT_AT: i32 = 100;
const GOOD_AT: i32 = 0;
const INACCURACY_AT: i32 = -25;
const MISTAKE_AT: i32 = -100;

/// Plies considered "opening" for the book override and suggestions
const BOOK_PLIES: usize = 8;

/// Evaluation swing between consecutive plies that marks a critical moment
const CRITICAL_SWING: i32 = 150;

/// Quality label for a played move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveClass {
    Brilliant,
    Great,
    Good,
    /// Reasonable opening-phase move
    Book,
    /// Only legal move in the position
    Forced,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl MoveClass {
    pub fn is_good_or_better(self) -> bool {
        !matches!(
            self,
            MoveClass::Inaccuracy | MoveClass::Mistake | MoveClass::Blunder
        )
    }
}

/// Analysis of one played move
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlyReport {
    /// 0-based ply index
    pub ply: usize,
    pub mover: Color,
    pub notation: String,
    pub class: MoveClass,
    /// Played-move eval change minus best-move eval change, from the
    /// mover's perspective
    pub accuracy: i32,
    pub eval_before: i32,
    pub eval_after: i32,
}

/// Per-game aggregate
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Percentage of plies classified good-or-better
    pub white_accuracy: f32,
    pub black_accuracy: f32,
    pub white_mistakes: u32,
    pub white_blunders: u32,
    pub black_mistakes: u32,
    pub black_blunders: u32,
    pub suggestions: Vec<String>,
}

/// Full analysis result
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameAnalysis {
    pub plies: Vec<PlyReport>,
    /// Ply indices where the evaluation swung sharply
    pub critical_moments: Vec<usize>,
    pub summary: AnalysisSummary,
}

/// Replays a finished game through the injected engine and grades every
/// move against the one-ply greedy best.
pub struct Analyzer<E: Engine> {
    engine: E,
}

impl<E: Engine> Analyzer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn analyze(&self, initial: &GameState, moves: &[Move]) -> GameAnalysis {
        let mut plies = Vec::with_capacity(moves.len());
        let mut critical_moments = Vec::new();
        let mut state = initial.clone();
        let mut white_eval = self.engine.evaluate(&state, Color::White);

        for (ply, mv) in moves.iter().enumerate() {
            let mover = state.current_player();
            let eval_before = self.engine.evaluate(&state, mover);
            let legal = self.engine.all_moves(&state, mover);
            // A played move implies at least one legal move; an empty list
            // means the caller's move list ran past the end of the game
            debug_assert!(
                !legal.is_empty(),
                "move at ply {} analyzed in a position with no legal moves",
                ply
            );

            let next = self.engine.apply(&state, mv);
            let eval_after = self.engine.evaluate(&next, mover);

            // One-ply greedy benchmark over the same legal moves
            let best_after = legal
                .iter()
                .map(|m| self.engine.evaluate(&self.engine.apply(&state, m), mover))
                .max()
                .unwrap_or(eval_after);

            let accuracy = eval_after - best_after;
            let class = classify(accuracy, legal.len(), ply);

            let board_size = state.variant().board_size;
            plies.push(PlyReport {
                ply,
                mover,
                notation: mv.notation(board_size),
                class,
                accuracy,
                eval_before,
                eval_after,
            });

            let next_white_eval = self.engine.evaluate(&next, Color::White);
            if (next_white_eval - white_eval).abs() > CRITICAL_SWING {
                critical_moments.push(ply);
            }
            white_eval = next_white_eval;
            state = next;
        }

        let summary = summarize(&plies);
        GameAnalysis {
            plies,
            critical_moments,
            summary,
        }
    }
}

/// Threshold classification with the forced/book overrides
fn classify(accuracy: i32, legal_count: usize, ply: usize) -> MoveClass {
    if legal_count == 1 {
        return MoveClass::Forced;
    }
    if ply < BOOK_PLIES && accuracy > MISTAKE_AT {
        return MoveClass::Book;
    }
    match accuracy {
        a if a >= BRILLIANT_AT => MoveClass::Brilliant,
        a if a >= GREAT_AT => MoveClass::Great,
        a if a >= GOOD_AT => MoveClass::Good,
        a if a >= INACCURACY_AT => MoveClass::Inaccuracy,
        a if a >= MISTAKE_AT => MoveClass::Mistake,
        _ => MoveClass::Blunder,
    }
}

fn summarize(plies: &[PlyReport]) -> AnalysisSummary {
    let mut summary = AnalysisSummary::default();

    let side = |color: Color| plies.iter().filter(move |p| p.mover == color);
    let accuracy = |color: Color| {
        let total = side(color).count();
        if total == 0 {
            return 100.0;
        }
        let good = side(color).filter(|p| p.class.is_good_or_better()).count();
        good as f32 * 100.0 / total as f32
    };

    summary.white_accuracy = accuracy(Color::White);
    summary.black_accuracy = accuracy(Color::Black);
    for ply in plies {
        match (ply.mover, ply.class) {
            (Color::White, MoveClass::Mistake) => summary.white_mistakes += 1,
            (Color::White, MoveClass::Blunder) => summary.white_blunders += 1,
            (Color::Black, MoveClass::Mistake) => summary.black_mistakes += 1,
            (Color::Black, MoveClass::Blunder) => summary.black_blunders += 1,
            _ => {}
        }
    }

    summary.suggestions = suggestions(plies, &summary);
    summary
}

/// Canned improvement advice driven by simple rule thresholds
fn suggestions(plies: &[PlyReport], summary: &AnalysisSummary) -> Vec<String> {
    let mut out = Vec::new();
    let total_blunders = summary.white_blunders + summary.black_blunders;
    let min_accuracy = summary.white_accuracy.min(summary.black_accuracy);

    if total_blunders >= 2 {
        out.push(
            "Several moves gave away material outright; scan for the opponent's \
             capture replies before committing a piece."
                .to_string(),
        );
    }
    if min_accuracy < 60.0 {
        out.push(
            "Overall accuracy was low; slow down and compare at least two \
             candidate moves each turn."
                .to_string(),
        );
    }

    let late_start = plies.len().saturating_sub(plies.len() / 3);
    let opening_slips = plies
        .iter()
        .filter(|p| p.ply < BOOK_PLIES + 2 && !p.class.is_good_or_better())
        .count();
    let endgame_slips = plies
        .iter()
        .filter(|p| p.ply >= late_start && !p.class.is_good_or_better())
        .count();

    if opening_slips >= 2 {
        out.push("The opening phase went astray early; study a few mainline openings.".to_string());
    }
    if endgame_slips >= 2 {
        out.push(
            "Most of the damage came in the endgame; practice king-and-pawn endings.".to_string(),
        );
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;
    use crate::engine::RulesEngine;
    use crate::pieces::PieceKind;
    use crate::variant::Variant;

    fn analyzer() -> Analyzer<RulesEngine> {
        Analyzer::new(RulesEngine::new())
    }

    fn state(placements: &[(Color, PieceKind, Square)], current: Color) -> GameState {
        GameState::with_pieces(Variant::international(), placements, current)
    }

    #[test]
    fn test_forced_move_classification() {
        // White's only legal move is the mandatory capture
        let game = state(
            &[
                (Color::White, PieceKind::Pawn, Square::new(5, 4)),
                (Color::Black, PieceKind::Pawn, Square::new(4, 3)),
                (Color::Black, PieceKind::Pawn, Square::new(0, 1)),
            ],
            Color::White,
        );
        let mv = game.all_moves(Color::White)[0].clone();
        let report = analyzer().analyze(&game, &[mv]);
        assert_eq!(report.plies[0].class, MoveClass::Forced);
    }

    #[test]
    fn test_opening_moves_classified_as_book() {
        let game = GameState::new(Variant::international());
        let mv = game.all_moves(Color::White)[0].clone();
        let report = analyzer().analyze(&game, &[mv]);
        assert_eq!(report.plies[0].class, MoveClass::Book);
        assert!(report.plies[0].class.is_good_or_better());
    }

    #[test]
    fn test_greedy_best_move_has_zero_accuracy() {
        let game = GameState::new(Variant::international());
        let engine = RulesEngine::new();

        // Replicate the analyzer's one-ply benchmark and play its pick
        let best = game
            .all_moves(Color::White)
            .into_iter()
            .max_by_key(|m| engine.evaluate(&engine.apply(&game, m), Color::White))
            .unwrap();

        let report = analyzer().analyze(&game, &[best]);
        assert_eq!(report.plies[0].accuracy, 0);
        assert!(report.plies[0].class.is_good_or_better());
    }

    #[test]
    #[should_panic(expected = "no legal moves")]
    fn test_move_list_running_past_the_end_is_rejected() {
        // Capturing black's last piece ends the game; replaying anything
        // after that is a caller error
        let game = state(
            &[
                (Color::White, PieceKind::Pawn, Square::new(5, 4)),
                (Color::Black, PieceKind::Pawn, Square::new(4, 3)),
            ],
            Color::White,
        );
        let winning = game.all_moves(Color::White)[0].clone();
        analyzer().analyze(&game, &[winning.clone(), winning]);
    }

    #[test]
    fn test_critical_moment_detection() {
        // A mandatory double capture swings the evaluation by two pawns
        let game = state(
            &[
                (Color::White, PieceKind::Pawn, Square::new(7, 2)),
                (Color::White, PieceKind::Pawn, Square::new(9, 6)),
                (Color::Black, PieceKind::Pawn, Square::new(6, 3)),
                (Color::Black, PieceKind::Pawn, Square::new(4, 5)),
                (Color::Black, PieceKind::Pawn, Square::new(0, 1)),
            ],
            Color::White,
        );
        let capture = game.all_moves(Color::White)[0].clone();
        assert_eq!(capture.captured.len(), 2);
        let report = analyzer().analyze(&game, &[capture]);
        assert_eq!(report.critical_moments, vec![0]);
    }

    #[test]
    fn test_summary_counts_and_accuracy() {
        let game = GameState::new(Variant::international());
        let engine = RulesEngine::new();

        // Play a few plausible plies through the engine itself
        let mut state = game.clone();
        let mut moves = Vec::new();
        for _ in 0..6 {
            let legal = engine.all_moves(&state, state.current_player());
            if legal.is_empty() {
                break;
            }
            let mv = legal[0].clone();
            state = engine.apply(&state, &mv);
            moves.push(mv);
        }

        let report = analyzer().analyze(&game, &moves);
        assert_eq!(report.plies.len(), moves.len());
        // Early engine-generated moves are all book-or-better
        assert!(report.summary.white_accuracy >= 50.0);
        assert!(report.summary.black_accuracy >= 50.0);
        assert_eq!(
            report.summary.white_blunders + report.summary.black_blunders,
            0
        );
    }

    #[test]
    fn test_classification_thresholds() {
        // Past the book window, with more than one legal move
        assert_eq!(classify(250, 5, 20), MoveClass::Brilliant);
        assert_eq!(classify(150, 5, 20), MoveClass::Great);
        assert_eq!(classify(0, 5, 20), MoveClass::Good);
        assert_eq!(classify(-10, 5, 20), MoveClass::Inaccuracy);
        assert_eq!(classify(-50, 5, 20), MoveClass::Mistake);
        assert_eq!(classify(-500, 5, 20), MoveClass::Blunder);
        // Overrides
        assert_eq!(classify(-500, 1, 20), MoveClass::Forced);
        assert_eq!(classify(-50, 5, 3), MoveClass::Book);
        assert_eq!(classify(-500, 5, 3), MoveClass::Blunder);
    }

    #[test]
    fn test_suggestions_trigger_on_blunders() {
        let plies: Vec<PlyReport> = (0..20)
            .map(|i| PlyReport {
                ply: i,
                mover: if i % 2 == 0 { Color::White } else { Color::Black },
                notation: String::new(),
                class: if i >= 16 { MoveClass::Blunder } else { MoveClass::Good },
                accuracy: if i >= 16 { -300 } else { 0 },
                eval_before: 0,
                eval_after: 0,
            })
            .collect();
        let summary = summarize(&plies);
        assert_eq!(summary.white_blunders + summary.black_blunders, 4);
        assert!(!summary.suggestions.is_empty());
        // Blunders were concentrated in the final third
        assert!(summary
            .suggestions
            .iter()
            .any(|s| s.contains("endgame")));
    }
}
