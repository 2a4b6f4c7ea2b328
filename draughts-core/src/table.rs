//! Zobrist hashing and the transposition table

use crate::board::Square;
use crate::game::GameState;
use crate::pieces::{Color, PieceKind};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Seed for the per-run key material. Determinism per run is all hashing
/// needs; cryptographic strength is not required.
const KEY_SEED: u64 = 0x44_52_41_55_47_48_54;

/// Fraction of entries dropped when the table hits capacity
const EVICT_DIVISOR: usize = 10;

// ============================================================================
// ZOBRIST KEYS
// ============================================================================

/// Independent random keys for every (square, color, kind) combination plus
/// one key for "black to move".
#[derive(Clone, Debug)]
pub struct ZobristKeys {
    board_size: i8,
    /// Indexed [square][color][kind]
    piece_keys: Vec<[[u64; 2]; 2]>,
    black_to_move: u64,
}

impl ZobristKeys {
    pub fn new(board_size: i8) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(KEY_SEED);
        let squares = (board_size as usize) * (board_size as usize);
        let piece_keys = (0..squares)
            .map(|_| [[rng.gen(), rng.gen()], [rng.gen(), rng.gen()]])
            .collect();
        Self {
            board_size,
            piece_keys,
            black_to_move: rng.gen(),
        }
    }

    fn square_index(&self, sq: Square) -> usize {
        sq.row as usize * self.board_size as usize + sq.col as usize
    }

    fn piece_key(&self, sq: Square, color: Color, kind: PieceKind) -> u64 {
        let kind_idx = match kind {
            PieceKind::Pawn => 0,
            PieceKind::King => 1,
        };
        self.piece_keys[self.square_index(sq)][color as usize][kind_idx]
    }

    /// Position hash: XOR of the keys of all occupied combinations, XORed
    /// with the turn key when black is to move. Piece identity does not
    /// participate, only occupancy.
    pub fn hash(&self, state: &GameState) -> u64 {
        let mut h = 0u64;
        for piece in state.pieces() {
            h ^= self.piece_key(piece.square, piece.color, piece.kind);
        }
        if state.current_player() == Color::Black {
            h ^= self.black_to_move;
        }
        h
    }
}

// ============================================================================
// TRANSPOSITION TABLE
// ============================================================================

/// How a stored score relates to the search window it was computed in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Score caused a beta cutoff; the true value is at least this
    Lower,
    /// Score never exceeded alpha; the true value is at most this
    Upper,
}

impl Bound {
    /// The same bound seen from the opponent's side (score negated):
    /// a lower bound on my score is an upper bound on yours.
    pub fn flipped(self) -> Bound {
        match self {
            Bound::Exact => Bound::Exact,
            Bound::Lower => Bound::Upper,
            Bound::Upper => Bound::Lower,
        }
    }
}

/// A stored search result
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub depth: u32,
    pub score: i32,
    pub bound: Bound,
    /// (from, to) of the best move found at this node, for move ordering
    pub best: Option<(Square, Square)>,
    stamp: u64,
}

/// Table statistics for diagnostics
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct TableStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// Bounded position cache keyed by Zobrist hash. Instance-scoped: one table
/// per game, cleared via [`TranspositionTable::clear`] at new-game start.
/// Not synchronized; concurrent games need their own instances.
#[derive(Debug)]
pub struct TranspositionTable {
    entries: FxHashMap<u64, Entry>,
    capacity: usize,
    next_stamp: u64,
    hits: u64,
    misses: u64,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            capacity: capacity.max(1),
            next_stamp: 0,
            hits: 0,
            misses: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entry for `hash`, but only if it was searched at least as
    /// deep as `depth`. Shallower entries are insufficient.
    pub fn get(&mut self, hash: u64, depth: u32) -> Option<Entry> {
        match self.entries.get(&hash) {
            Some(entry) if entry.depth >= depth => {
                self.hits += 1;
                Some(*entry)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Best-move hint regardless of stored depth (ordering only)
    pub fn best_move_hint(&self, hash: u64) -> Option<(Square, Square)> {
        self.entries.get(&hash).and_then(|e| e.best)
    }

    /// Score usable as a cutoff at the current window, applying bound-flag
    /// semantics on top of the depth requirement.
    pub fn probe(&mut self, hash: u64, depth: u32, alpha: i32, beta: i32) -> Option<i32> {
        let entry = self.get(hash, depth)?;
        match entry.bound {
            Bound::Exact => Some(entry.score),
            Bound::Lower if entry.score >= beta => Some(entry.score),
            Bound::Upper if entry.score <= alpha => Some(entry.score),
            _ => None,
        }
    }

    /// Store a search result, evicting the oldest tenth of the table by
    /// stamp when full (approximate LRU).
    pub fn store(
        &mut self,
        hash: u64,
        depth: u32,
        score: i32,
        bound: Bound,
        best: Option<(Square, Square)>,
    ) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&hash) {
            self.evict_oldest();
        }
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.entries.insert(
            hash,
            Entry {
                depth,
                score,
                bound,
                best,
                stamp,
            },
        );
    }

    fn evict_oldest(&mut self) {
        let drop_count = (self.capacity / EVICT_DIVISOR).max(1);
        let mut stamps: Vec<u64> = self.entries.values().map(|e| e.stamp).collect();
        stamps.sort_unstable();
        let cutoff = stamps[drop_count.min(stamps.len()) - 1];
        self.entries.retain(|_, e| e.stamp > cutoff);
    }

    pub fn stats(&self) -> TableStats {
        let lookups = self.hits + self.misses;
        TableStats {
            size: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                self.hits as f64 / lookups as f64
            },
        }
    }

    /// Reset for a new game
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_stamp = 0;
        self.hits = 0;
        self.misses = 0;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::PieceKind;
    use crate::variant::Variant;

    fn keys() -> ZobristKeys {
        ZobristKeys::new(10)
    }

    #[test]
    fn test_hash_is_stable() {
        let game = GameState::new(Variant::international());
        let keys = keys();
        assert_eq!(keys.hash(&game), keys.hash(&game));
    }

    #[test]
    fn test_hash_ignores_piece_identity() {
        // Same occupancy built in different placement order hashes equal
        let a = GameState::with_pieces(
            Variant::international(),
            &[
                (Color::White, PieceKind::Pawn, Square::new(6, 3)),
                (Color::Black, PieceKind::Pawn, Square::new(3, 4)),
            ],
            Color::White,
        );
        let b = GameState::with_pieces(
            Variant::international(),
            &[
                (Color::Black, PieceKind::Pawn, Square::new(3, 4)),
                (Color::White, PieceKind::Pawn, Square::new(6, 3)),
            ],
            Color::White,
        );
        let keys = keys();
        assert_eq!(keys.hash(&a), keys.hash(&b));
    }

    #[test]
    fn test_turn_flips_hash() {
        let placements = [
            (Color::White, PieceKind::Pawn, Square::new(6, 3)),
            (Color::Black, PieceKind::Pawn, Square::new(3, 4)),
        ];
        let white_to_move =
            GameState::with_pieces(Variant::international(), &placements, Color::White);
        let black_to_move =
            GameState::with_pieces(Variant::international(), &placements, Color::Black);
        let keys = keys();
        assert_ne!(keys.hash(&white_to_move), keys.hash(&black_to_move));
    }

    #[test]
    fn test_kind_changes_hash() {
        let pawn = GameState::with_pieces(
            Variant::international(),
            &[
                (Color::White, PieceKind::Pawn, Square::new(6, 3)),
                (Color::Black, PieceKind::Pawn, Square::new(3, 4)),
            ],
            Color::White,
        );
        let king = GameState::with_pieces(
            Variant::international(),
            &[
                (Color::White, PieceKind::King, Square::new(6, 3)),
                (Color::Black, PieceKind::Pawn, Square::new(3, 4)),
            ],
            Color::White,
        );
        let keys = keys();
        assert_ne!(keys.hash(&pawn), keys.hash(&king));
    }

    #[test]
    fn test_depth_gating() {
        let mut table = TranspositionTable::new(64);
        table.store(42, 3, 150, Bound::Exact, None);

        assert!(table.get(42, 4).is_none());
        assert!(table.get(42, 3).is_some());
        assert!(table.get(42, 1).is_some());

        let stats = table.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_probe_bound_semantics() {
        let mut table = TranspositionTable::new(64);

        table.store(1, 2, 50, Bound::Exact, None);
        assert_eq!(table.probe(1, 2, -100, 100), Some(50));

        table.store(2, 2, 80, Bound::Lower, None);
        assert_eq!(table.probe(2, 2, 0, 60), Some(80)); // >= beta: cutoff
        assert_eq!(table.probe(2, 2, 0, 100), None); // inside window: no use

        table.store(3, 2, -30, Bound::Upper, None);
        assert_eq!(table.probe(3, 2, 0, 100), Some(-30)); // <= alpha: cutoff
        assert_eq!(table.probe(3, 2, -50, 100), None);
    }

    #[test]
    fn test_eviction_drops_oldest_tenth() {
        let mut table = TranspositionTable::new(20);
        for i in 0..20u64 {
            table.store(i, 1, 0, Bound::Exact, None);
        }
        assert_eq!(table.len(), 20);

        // Next store triggers eviction of the two oldest entries
        table.store(100, 1, 0, Bound::Exact, None);
        assert_eq!(table.len(), 19);
        assert!(table.get(0, 1).is_none());
        assert!(table.get(1, 1).is_none());
        assert!(table.get(2, 1).is_some());
        assert!(table.get(100, 1).is_some());
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut table = TranspositionTable::new(8);
        table.store(1, 1, 0, Bound::Exact, None);
        table.get(1, 1);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.stats().hits, 0);
    }
}
