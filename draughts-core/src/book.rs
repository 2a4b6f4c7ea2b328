//! Opening book with weighted replies and opening-name recognition

use crate::board::Square;
use crate::game::{GameState, Move};
use crate::pieces::Color;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Position key for a game that has not left the initial position
const INITIAL_KEY: &str = "initial";

/// A candidate reply, endpoints in Manoury numbers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookReply {
    pub from: u8,
    pub to: u8,
    /// Selection frequency; replies are drawn proportionally to it
    pub weight: u32,
}

/// A named opening line as a sequence of move notations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedLine {
    pub name: String,
    pub moves: Vec<String>,
}

#[derive(Debug, Error)]
pub enum BookError {
    #[error("book reply {from}-{to} has zero weight")]
    ZeroWeight { from: u8, to: u8 },
}

/// Opening book for the first plies of a game. Instance-scoped: one book
/// per game, reset at new-game start; concurrent games need their own
/// instances.
///
/// Replies are keyed by the compact notation of the last played move (or
/// `"initial"`) and the color to move. The internal history log feeds
/// opening-name recognition.
#[derive(Debug)]
pub struct OpeningBook {
    replies: FxHashMap<(String, Color), Vec<BookReply>>,
    named_lines: Vec<NamedLine>,
    history: Vec<String>,
    max_depth: usize,
    rng: ChaCha8Rng,
}

/// Serialized book layout
#[derive(Serialize, Deserialize)]
struct BookFile {
    max_depth: usize,
    replies: Vec<(String, Color, Vec<BookReply>)>,
    named_lines: Vec<NamedLine>,
}

impl OpeningBook {
    /// Empty book with the given ply cap
    pub fn empty(max_depth: usize) -> Self {
        Self {
            replies: FxHashMap::default(),
            named_lines: Vec::new(),
            history: Vec::new(),
            max_depth,
            rng: ChaCha8Rng::seed_from_u64(0x0b00_c0de),
        }
    }

    pub fn with_seed(max_depth: usize, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            ..Self::empty(max_depth)
        }
    }

    /// Book of common international (10x10) lines
    pub fn international() -> Self {
        let mut book = Self::empty(8);

        book.add_reply(INITIAL_KEY, Color::White, BookReply { from: 32, to: 28, weight: 4 });
        book.add_reply(INITIAL_KEY, Color::White, BookReply { from: 33, to: 28, weight: 2 });
        book.add_reply(INITIAL_KEY, Color::White, BookReply { from: 31, to: 26, weight: 1 });
        book.add_reply(INITIAL_KEY, Color::White, BookReply { from: 34, to: 30, weight: 1 });

        book.add_reply("32-28", Color::Black, BookReply { from: 19, to: 23, weight: 3 });
        book.add_reply("32-28", Color::Black, BookReply { from: 18, to: 23, weight: 2 });
        book.add_reply("32-28", Color::Black, BookReply { from: 17, to: 22, weight: 1 });
        book.add_reply("33-28", Color::Black, BookReply { from: 18, to: 23, weight: 2 });
        book.add_reply("33-28", Color::Black, BookReply { from: 17, to: 22, weight: 1 });
        book.add_reply("31-26", Color::Black, BookReply { from: 19, to: 23, weight: 1 });
        book.add_reply("34-30", Color::Black, BookReply { from: 20, to: 25, weight: 1 });

        // 19-23 (or 18-23) walks into the forced 28x19 exchange, so the
        // white follow-ups are keyed by the recapture, not the pawn push
        book.add_reply("28x19", Color::Black, BookReply { from: 14, to: 23, weight: 2 });
        book.add_reply("28x19", Color::Black, BookReply { from: 13, to: 24, weight: 1 });
        book.add_reply("14x23", Color::White, BookReply { from: 33, to: 29, weight: 2 });
        book.add_reply("14x23", Color::White, BookReply { from: 37, to: 32, weight: 1 });
        book.add_reply("17-22", Color::White, BookReply { from: 28, to: 17, weight: 1 });

        book.named_lines = vec![
            NamedLine {
                name: "Classical".to_string(),
                moves: vec![
                    "32-28".into(),
                    "19-23".into(),
                    "28x19".into(),
                    "14x23".into(),
                    "33-29".into(),
                ],
            },
            NamedLine {
                name: "Roozenburg setup".to_string(),
                moves: vec!["32-28".into(), "18-23".into()],
            },
            NamedLine {
                name: "Polish opening".to_string(),
                moves: vec!["31-26".into()],
            },
        ];

        book
    }

    pub fn add_reply(&mut self, key: &str, color: Color, reply: BookReply) {
        self.replies
            .entry((key.to_string(), color))
            .or_default()
            .push(reply);
    }

    /// Book reply for the position, or None when out of book: past the ply
    /// cap, no entry for the key, or no entry matching a currently-legal
    /// move. Selection among legal candidates is weighted-random by
    /// frequency.
    pub fn lookup(&mut self, state: &GameState) -> Option<Move> {
        if state.move_history().len() >= self.max_depth {
            return None;
        }

        let size = state.variant().board_size;
        let key = state
            .move_history()
            .last()
            .map(|mv| mv.notation(size))
            .unwrap_or_else(|| INITIAL_KEY.to_string());

        let candidates = self.replies.get(&(key, state.current_player()))?;
        let legal = state.all_moves(state.current_player());

        // Only candidates that map onto a currently-legal move count
        let playable: Vec<(&BookReply, &Move)> = candidates
            .iter()
            .filter_map(|reply| {
                let from = Square::from_manoury(reply.from, size)?;
                let to = Square::from_manoury(reply.to, size)?;
                legal
                    .iter()
                    .find(|mv| mv.from == from && mv.to == to)
                    .map(|mv| (reply, mv))
            })
            .collect();

        let total: u32 = playable.iter().map(|(r, _)| r.weight).sum();
        if total == 0 {
            return None;
        }

        let mut roll = self.rng.gen_range(0..total);
        for (reply, mv) in &playable {
            if roll < reply.weight {
                return Some((*mv).clone());
            }
            roll -= reply.weight;
        }
        None
    }

    /// Log a played move for opening-name recognition
    pub fn record(&mut self, mv: &Move, board_size: i8) {
        self.history.push(mv.notation(board_size));
    }

    /// Name of the longest named line the logged history is a prefix-match
    /// of (or that is a prefix of the history).
    pub fn opening_name(&self) -> Option<&str> {
        self.named_lines
            .iter()
            .filter(|line| {
                let n = line.moves.len().min(self.history.len());
                n > 0 && line.moves[..n] == self.history[..n]
            })
            .max_by_key(|line| line.moves.len().min(self.history.len()))
            .map(|line| line.name.as_str())
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Reset the history log for a new game
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Check stored replies for consistency
    pub fn validate(&self) -> Result<(), BookError> {
        for replies in self.replies.values() {
            for r in replies {
                if r.weight == 0 {
                    return Err(BookError::ZeroWeight { from: r.from, to: r.to });
                }
            }
        }
        Ok(())
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: BookFile = serde_json::from_str(&content)?;
        let mut book = Self::empty(file.max_depth);
        for (key, color, replies) in file.replies {
            book.replies.insert((key, color), replies);
        }
        book.named_lines = file.named_lines;
        book.validate()?;
        Ok(book)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = BookFile {
            max_depth: self.max_depth,
            replies: self
                .replies
                .iter()
                .map(|((k, c), v)| (k.clone(), *c, v.clone()))
                .collect(),
            named_lines: self.named_lines.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
