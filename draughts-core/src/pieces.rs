//! Piece and player definitions

use crate::board::Square;
use serde::{Deserialize, Serialize};

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta a pawn of this color advances by.
    /// White starts on the high rows and pushes toward row 0.
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row a pawn of this color promotes on
    pub const fn promotion_row(self, size: i8) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => size - 1,
        }
    }

    /// Home (back) row of this color
    pub const fn back_row(self, size: i8) -> i8 {
        match self {
            Color::White => size - 1,
            Color::Black => 0,
        }
    }
}

/// Piece kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    King,
}

/// A piece on the board. Identity (`id`) is stable for the whole game;
/// square and kind change by producing a new value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: u32,
    pub color: Color,
    pub kind: PieceKind,
    pub square: Square,
}

impl Piece {
    pub const fn new(id: u32, color: Color, kind: PieceKind, square: Square) -> Self {
        Self { id, color, kind, square }
    }

    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }

    /// Copy of this piece relocated to another square
    pub fn at(&self, square: Square) -> Piece {
        Piece { square, ..*self }
    }

    /// Copy of this piece promoted to king
    pub fn promoted(&self) -> Piece {
        Piece { kind: PieceKind::King, ..*self }
    }
}
