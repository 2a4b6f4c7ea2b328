//! Game state and move generation

use crate::board::{Diagonal, Square, DIAGONALS};
use crate::pieces::{Color, Piece, PieceKind};
use crate::variant::Variant;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    WhiteWins,
    BlackWins,
}

impl GameStatus {
    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Ongoing => None,
            GameStatus::WhiteWins => Some(Color::White),
            GameStatus::BlackWins => Some(Color::Black),
        }
    }

    fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameStatus::WhiteWins,
            Color::Black => GameStatus::BlackWins,
        }
    }
}

/// A legal move. Multi-jump chains are represented as a single move whose
/// `captured` list holds every piece taken along the chain and whose `path`
/// holds the intermediate landing squares.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Move {
    /// Pre-move snapshot of the moving piece
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    /// Captured pieces in chain order
    pub captured: Vec<Piece>,
    pub is_promotion: bool,
    /// Intermediate landing squares of a multi-jump (excludes `from` and `to`)
    pub path: Vec<Square>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    /// Compact Manoury notation: "32-28" for a simple move, "28x19" for a
    /// capture (endpoints only, as in game records).
    pub fn notation(&self, board_size: i8) -> String {
        let sep = if self.is_capture() { 'x' } else { '-' };
        format!(
            "{}{}{}",
            self.from.manoury(board_size),
            sep,
            self.to.manoury(board_size)
        )
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Immutable game state; `apply_move` produces a new state.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Board: square -> piece (sparse representation, one piece per square)
    board: FxHashMap<Square, Piece>,
    current_player: Color,
    status: GameStatus,
    move_history: Vec<Move>,
    /// True iff `current_player` has at least one capture available
    must_capture: bool,
    variant: Variant,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a fresh game with the variant's initial layout.
    /// Black fills the dark squares of the low rows, white the high rows,
    /// and white moves first.
    pub fn new(variant: Variant) -> Self {
        let size = variant.board_size;
        let rows = variant.setup_rows();
        let mut placements = Vec::new();

        for row in 0..rows {
            for col in 0..size {
                let sq = Square::new(row, col);
                if sq.is_dark() {
                    placements.push((Color::Black, PieceKind::Pawn, sq));
                }
            }
        }
        for row in (size - rows)..size {
            for col in 0..size {
                let sq = Square::new(row, col);
                if sq.is_dark() {
                    placements.push((Color::White, PieceKind::Pawn, sq));
                }
            }
        }

        Self::with_pieces(variant, &placements, Color::White)
    }

    /// Create a game from explicit piece placements (test setups, imports).
    /// Ids are assigned in placement order.
    pub fn with_pieces(
        variant: Variant,
        placements: &[(Color, PieceKind, Square)],
        current_player: Color,
    ) -> Self {
        let mut board = FxHashMap::default();
        for (i, &(color, kind, square)) in placements.iter().enumerate() {
            board.insert(square, Piece::new(i as u32, color, kind, square));
        }

        let mut state = Self {
            board,
            current_player,
            status: GameStatus::Ongoing,
            move_history: Vec::new(),
            must_capture: false,
            variant,
        };
        state.refresh_turn_state();
        state
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// True iff the current player is obliged to capture this turn
    pub fn must_capture(&self) -> bool {
        self.must_capture
    }

    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.board.get(&square)
    }

    /// Iterate pieces on the board
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.board.values()
    }

    pub fn piece_count(&self, color: Color) -> usize {
        self.board.values().filter(|p| p.color == color).count()
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Legal moves for the piece on `square`. Empty when the square holds no
    /// piece of the current player, the game is over, or another piece of
    /// the mover is obliged to capture and this one cannot satisfy the
    /// obligation.
    pub fn valid_moves(&self, square: Square) -> Vec<Move> {
        if self.status != GameStatus::Ongoing {
            return Vec::new();
        }
        let piece = match self.board.get(&square) {
            Some(p) if p.color == self.current_player => *p,
            _ => return Vec::new(),
        };

        let captures = self.all_captures(self.current_player);
        if !captures.is_empty() {
            return captures
                .into_iter()
                .filter(|m| m.from == square)
                .collect();
        }
        self.simple_moves(&piece)
    }

    /// All legal moves for a color, independent of whose turn it is.
    /// Captures are mandatory: when any exist, only captures are returned.
    pub fn all_moves(&self, color: Color) -> Vec<Move> {
        let captures = self.all_captures(color);
        if !captures.is_empty() {
            return captures;
        }
        self.board
            .values()
            .filter(|p| p.color == color)
            .flat_map(|p| self.simple_moves(p))
            .collect()
    }

    /// True iff the color has at least one capture available
    pub fn has_capture(&self, color: Color) -> bool {
        self.board
            .values()
            .filter(|p| p.color == color)
            .any(|p| !self.jumps_from(p.id, p.color, p.kind, p.square, &[]).is_empty())
    }

    /// Every terminal capture sequence for the color, filtered to the
    /// longest chains when the variant mandates maximum capture. The
    /// maximum is taken across all of the color's pieces, not per piece.
    pub fn all_captures(&self, color: Color) -> Vec<Move> {
        let mut chains = Vec::new();
        for piece in self.board.values().filter(|p| p.color == color) {
            self.build_chains(
                piece,
                piece.square,
                piece.kind,
                Vec::new(),
                Vec::new(),
                &mut chains,
            );
        }

        if self.variant.mandatory_max_capture && !chains.is_empty() {
            let longest = chains.iter().map(|m| m.captured.len()).max().unwrap_or(0);
            chains.retain(|m| m.captured.len() == longest);
        }
        chains
    }

    /// Number of legal moves available to a color (mobility heuristic)
    pub fn mobility(&self, color: Color) -> usize {
        self.all_moves(color).len()
    }

    // ========================================================================
    // SIMPLE (NON-CAPTURE) MOVES
    // ========================================================================

    fn simple_moves(&self, piece: &Piece) -> Vec<Move> {
        let mut moves = Vec::new();
        let size = self.variant.board_size;

        match piece.kind {
            PieceKind::Pawn => {
                for dir in DIAGONALS {
                    if dir.row_delta() != piece.color.forward() {
                        continue;
                    }
                    let dest = piece.square.offset(dir, 1);
                    if dest.in_bounds(size) && !self.board.contains_key(&dest) {
                        moves.push(self.simple_move(piece, dest));
                    }
                }
            }
            PieceKind::King => {
                for dir in DIAGONALS {
                    if self.variant.flying_kings {
                        let mut step = 1;
                        loop {
                            let dest = piece.square.offset(dir, step);
                            if !dest.in_bounds(size) || self.board.contains_key(&dest) {
                                break;
                            }
                            moves.push(self.simple_move(piece, dest));
                            step += 1;
                        }
                    } else {
                        let dest = piece.square.offset(dir, 1);
                        if dest.in_bounds(size) && !self.board.contains_key(&dest) {
                            moves.push(self.simple_move(piece, dest));
                        }
                    }
                }
            }
        }

        moves
    }

    fn simple_move(&self, piece: &Piece, to: Square) -> Move {
        let is_promotion = piece.kind == PieceKind::Pawn
            && to.row == piece.color.promotion_row(self.variant.board_size);
        Move {
            piece: *piece,
            from: piece.square,
            to,
            captured: Vec::new(),
            is_promotion,
            path: Vec::new(),
        }
    }

    // ========================================================================
    // CAPTURE CHAINS
    // ========================================================================

    /// Occupant of a square as seen mid-chain: the mover has left its
    /// origin, and already-captured pieces are treated as removed.
    fn chain_occupant(&self, sq: Square, mover_id: u32, captured: &[Piece]) -> Option<&Piece> {
        let piece = self.board.get(&sq)?;
        if piece.id == mover_id || captured.iter().any(|c| c.id == piece.id) {
            None
        } else {
            Some(piece)
        }
    }

    /// Single-jump options from `from`: (victim, landing square) pairs
    fn jumps_from(
        &self,
        mover_id: u32,
        color: Color,
        kind: PieceKind,
        from: Square,
        captured: &[Piece],
    ) -> Vec<(Piece, Square)> {
        let size = self.variant.board_size;
        let mut jumps = Vec::new();

        for dir in DIAGONALS {
            // Pawns only capture forward unless the variant allows backward
            if kind == PieceKind::Pawn
                && !self.variant.backward_capture
                && dir.row_delta() != color.forward()
            {
                continue;
            }

            if kind == PieceKind::King && self.variant.flying_kings {
                // Slide to the first piece on the ray; if it is an enemy,
                // every empty square beyond it is a landing option. A king
                // never jumps two pieces in one hop.
                let mut step = 1;
                let victim = loop {
                    let sq = from.offset(dir, step);
                    if !sq.in_bounds(size) {
                        break None;
                    }
                    if let Some(p) = self.chain_occupant(sq, mover_id, captured) {
                        break (p.color != color).then(|| *p);
                    }
                    step += 1;
                };
                if let Some(victim) = victim {
                    let mut land = step + 1;
                    loop {
                        let sq = from.offset(dir, land);
                        if !sq.in_bounds(size)
                            || self.chain_occupant(sq, mover_id, captured).is_some()
                        {
                            break;
                        }
                        jumps.push((victim, sq));
                        land += 1;
                    }
                }
            } else {
                let mid = from.offset(dir, 1);
                let land = from.offset(dir, 2);
                if !land.in_bounds(size) {
                    continue;
                }
                let victim = match self.chain_occupant(mid, mover_id, captured) {
                    Some(p) if p.color != color => *p,
                    _ => continue,
                };
                if self.chain_occupant(land, mover_id, captured).is_none() {
                    jumps.push((victim, land));
                }
            }
        }

        jumps
    }

    /// Depth-first search over capture continuations. `landings` holds every
    /// landing square reached so far; a sequence becomes a candidate move
    /// when no continuation exists from its last landing.
    fn build_chains(
        &self,
        origin: &Piece,
        current: Square,
        kind: PieceKind,
        captured: Vec<Piece>,
        landings: Vec<Square>,
        out: &mut Vec<Move>,
    ) {
        let jumps = self.jumps_from(origin.id, origin.color, kind, current, &captured);

        if jumps.is_empty() {
            if !captured.is_empty() {
                out.push(self.chain_move(origin, current, kind, captured, &landings));
            }
            return;
        }

        let promotion_row = origin.color.promotion_row(self.variant.board_size);
        for (victim, land) in jumps {
            let mut next_captured = captured.clone();
            next_captured.push(victim);
            let mut next_landings = landings.clone();
            next_landings.push(land);

            let mut next_kind = kind;
            if kind == PieceKind::Pawn && land.row == promotion_row {
                if self.variant.capture_stop_on_promotion {
                    // Promotion ends the chain on the spot
                    out.push(self.chain_move(
                        origin,
                        land,
                        PieceKind::King,
                        next_captured,
                        &next_landings,
                    ));
                    continue;
                }
                // Promote before continuing the chain
                next_kind = PieceKind::King;
            }

            self.build_chains(origin, land, next_kind, next_captured, next_landings, out);
        }
    }

    fn chain_move(
        &self,
        origin: &Piece,
        to: Square,
        final_kind: PieceKind,
        captured: Vec<Piece>,
        landings: &[Square],
    ) -> Move {
        // The last landing is `to`; everything before it is the path
        let path = landings[..landings.len().saturating_sub(1)].to_vec();
        Move {
            piece: *origin,
            from: origin.square,
            to,
            captured,
            is_promotion: origin.kind == PieceKind::Pawn && final_kind == PieceKind::King,
            path,
        }
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Apply a move, returning the successor state. Pure transformation:
    /// captured pieces are removed, the mover is relocated (and promoted if
    /// the move says so), the turn flips, and the capture obligation and
    /// game status are recomputed.
    pub fn apply_move(&self, mv: &Move) -> GameState {
        let mut next = self.clone();

        for victim in &mv.captured {
            next.board.remove(&victim.square);
        }

        if let Some(mut mover) = next.board.remove(&mv.from) {
            mover = mover.at(mv.to);
            if mv.is_promotion {
                mover = mover.promoted();
            }
            next.board.insert(mv.to, mover);
        }

        next.move_history.push(mv.clone());
        next.current_player = self.current_player.opponent();
        next.refresh_turn_state();
        next
    }

    /// Recompute `must_capture` and `status` for the side to move.
    /// A side with no pieces or no legal moves at the start of its turn
    /// has lost.
    fn refresh_turn_state(&mut self) {
        let mover = self.current_player;
        self.must_capture = self.has_capture(mover);

        if self.piece_count(mover) == 0 || self.all_moves(mover).is_empty() {
            self.status = GameStatus::win_for(mover.opponent());
        } else {
            self.status = GameStatus::Ongoing;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
