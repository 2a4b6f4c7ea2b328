//! Board geometry for square draughts boards

use serde::{Deserialize, Serialize};

/// Standard international board side length
pub const STANDARD_SIZE: i8 = 10;

/// Board coordinates (row 0 at black's edge, row N-1 at white's edge)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this square is on a board of the given side length
    pub fn in_bounds(&self, size: i8) -> bool {
        self.row >= 0 && self.row < size && self.col >= 0 && self.col < size
    }

    /// Playable squares are the dark ones
    pub fn is_dark(&self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// Square offset by a diagonal direction, taken `steps` times
    pub fn offset(&self, dir: Diagonal, steps: i8) -> Square {
        let (dr, dc) = dir.vector();
        Square::new(self.row + dr * steps, self.col + dc * steps)
    }

    /// Manoury number of this square (1..=size*size/2, row-major over
    /// dark squares).
    ///
    /// Panics if called on a light square: only dark squares carry Manoury
    /// numbers, so a light-square conversion means a broken invariant
    /// upstream.
    pub fn manoury(&self, size: i8) -> u8 {
        assert!(
            self.is_dark() && self.in_bounds(size),
            "Manoury notation is only defined for dark squares on the board, got {:?}",
            self
        );
        let per_row = (size / 2) as u8;
        let index = self.row as u8 * per_row + self.col as u8 / 2;
        index + 1
    }

    /// Square for a Manoury number on a board of the given size
    pub fn from_manoury(number: u8, size: i8) -> Option<Square> {
        let per_row = (size / 2) as u8;
        if number == 0 || number > per_row * size as u8 {
            return None;
        }
        let index = number - 1;
        let row = (index / per_row) as i8;
        let col_pair = (index % per_row) as i8;
        // Dark squares sit on odd columns in even rows, even columns in odd rows
        let col = if row % 2 == 0 { col_pair * 2 + 1 } else { col_pair * 2 };
        Some(Square::new(row, col))
    }

    /// Chebyshev-style distance to the board center (used for centrality)
    pub fn distance_to_center(&self, size: i8) -> i8 {
        // Center falls between squares on an even board; measure against
        // the midpoint doubled to stay in integers.
        let mid = size - 1;
        let dr = (2 * self.row - mid).abs();
        let dc = (2 * self.col - mid).abs();
        // Doubled offsets are always odd on an even board, so this maps the
        // four central squares to 0 and the corners to size/2 - 1.
        (dr.max(dc) - 1) / 2
    }
}

/// The four diagonal directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagonal {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Diagonal {
    /// (row delta, col delta)
    pub const fn vector(self) -> (i8, i8) {
        match self {
            Diagonal::UpLeft => (-1, -1),
            Diagonal::UpRight => (-1, 1),
            Diagonal::DownLeft => (1, -1),
            Diagonal::DownRight => (1, 1),
        }
    }

    /// True if this diagonal moves toward the given row delta
    pub const fn row_delta(self) -> i8 {
        self.vector().0
    }
}

/// All four diagonals
pub const DIAGONALS: [Diagonal; 4] = [
    Diagonal::UpLeft,
    Diagonal::UpRight,
    Diagonal::DownLeft,
    Diagonal::DownRight,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_squares() {
        assert!(!Square::new(0, 0).is_dark());
        assert!(Square::new(0, 1).is_dark());
        assert!(Square::new(1, 0).is_dark());
        assert!(!Square::new(1, 1).is_dark());
    }

    #[test]
    fn test_bounds() {
        assert!(Square::new(0, 0).in_bounds(10));
        assert!(Square::new(9, 9).in_bounds(10));
        assert!(!Square::new(10, 0).in_bounds(10));
        assert!(!Square::new(0, -1).in_bounds(10));
    }

    #[test]
    fn test_manoury_numbering() {
        // First dark square of the top row is 1, last of the bottom row is 50
        assert_eq!(Square::new(0, 1).manoury(10), 1);
        assert_eq!(Square::new(0, 9).manoury(10), 5);
        assert_eq!(Square::new(1, 0).manoury(10), 6);
        assert_eq!(Square::new(9, 8).manoury(10), 50);
    }

    #[test]
    fn test_manoury_round_trip() {
        for n in 1..=50u8 {
            let sq = Square::from_manoury(n, 10).unwrap();
            assert!(sq.is_dark());
            assert_eq!(sq.manoury(10), n);
        }
        assert_eq!(Square::from_manoury(0, 10), None);
        assert_eq!(Square::from_manoury(51, 10), None);
    }

    #[test]
    #[should_panic]
    fn test_manoury_light_square_panics() {
        Square::new(0, 0).manoury(10);
    }

    #[test]
    fn test_offset() {
        let sq = Square::new(5, 4);
        assert_eq!(sq.offset(Diagonal::UpLeft, 1), Square::new(4, 3));
        assert_eq!(sq.offset(Diagonal::DownRight, 3), Square::new(8, 7));
    }

    #[test]
    fn test_center_distance() {
        // On a 10x10 board the four central squares are distance 0
        assert_eq!(Square::new(4, 5).distance_to_center(10), 0);
        assert_eq!(Square::new(5, 4).distance_to_center(10), 0);
        assert!(Square::new(0, 1).distance_to_center(10) > Square::new(3, 4).distance_to_center(10));
    }
}
