//! Variant rule configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Rule configuration, fixed for the lifetime of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Board side length (must be even)
    pub board_size: i8,
    /// Pieces per side at setup
    pub pieces_per_player: u8,
    /// Kings slide any distance along a diagonal
    pub flying_kings: bool,
    /// Pawns may capture backward
    pub backward_capture: bool,
    /// The longest available capture chain is the only legal one
    pub mandatory_max_capture: bool,
    /// A capture chain ends the instant a pawn reaches the promotion row
    pub capture_stop_on_promotion: bool,
}

/// Errors from loading or validating a variant configuration
#[derive(Debug, Error)]
pub enum VariantError {
    #[error("board size {0} is not an even number >= 4")]
    BadBoardSize(i8),
    #[error("{pieces} pieces per player do not fit {rows} setup rows on a {size}x{size} board")]
    BadPieceCount { pieces: u8, rows: i8, size: i8 },
}

impl Variant {
    /// International draughts: 10x10, 20 pieces, flying kings, backward
    /// pawn captures, maximum capture mandatory.
    pub fn international() -> Self {
        Self {
            board_size: 10,
            pieces_per_player: 20,
            flying_kings: true,
            backward_capture: true,
            mandatory_max_capture: true,
            capture_stop_on_promotion: false,
        }
    }

    /// English checkers: 8x8, 12 pieces, short kings, forward-only pawn
    /// captures, any capture satisfies the capture obligation.
    pub fn english() -> Self {
        Self {
            board_size: 8,
            pieces_per_player: 12,
            flying_kings: false,
            backward_capture: false,
            mandatory_max_capture: false,
            capture_stop_on_promotion: false,
        }
    }

    /// Number of filled rows per side at setup
    pub fn setup_rows(&self) -> i8 {
        let per_row = self.board_size / 2;
        (self.pieces_per_player as i8 + per_row - 1) / per_row
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), VariantError> {
        if self.board_size < 4 || self.board_size % 2 != 0 {
            return Err(VariantError::BadBoardSize(self.board_size));
        }
        let per_row = self.board_size / 2;
        let rows = self.setup_rows();
        // Both armies need an empty band between them
        if rows * 2 >= self.board_size || self.pieces_per_player as i8 > rows * per_row {
            return Err(VariantError::BadPieceCount {
                pieces: self.pieces_per_player,
                rows,
                size: self.board_size,
            });
        }
        Ok(())
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let variant: Variant = serde_json::from_str(&content)?;
        variant.validate()?;
        Ok(variant)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::international()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(Variant::international().validate().is_ok());
        assert!(Variant::english().validate().is_ok());
    }

    #[test]
    fn test_setup_rows() {
        assert_eq!(Variant::international().setup_rows(), 4);
        assert_eq!(Variant::english().setup_rows(), 3);
    }

    #[test]
    fn test_bad_board_size() {
        let mut v = Variant::international();
        v.board_size = 9;
        assert!(matches!(v.validate(), Err(VariantError::BadBoardSize(9))));
    }

    #[test]
    fn test_too_many_pieces() {
        let mut v = Variant::international();
        v.pieces_per_player = 30;
        assert!(v.validate().is_err());
    }
}
