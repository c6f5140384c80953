//! Captured pieces tracking
//!
//! Tracks pieces captured by each player and calculates material advantage.
//! Used for the capture rows beside the board.
//!
//! # Material Values
//!
//! Values used for ordering and balance (see [`PieceKind::value`]):
//! - Pawn: 1
//! - Knight: 3
//! - Bishop: 4
//! - Rook: 5
//! - Queen: 9
//! - King: 0 (never captured)
//!
//! # Display Order
//!
//! [`CapturedPieces::summary`] lists captured pieces of one colour by
//! descending value. Pieces of equal value keep the order they were taken in,
//! and all pawns collapse into a single count shown last.
//!
//! # Material Advantage
//!
//! Positive advantage means White is ahead, negative means Black is ahead.
//! Example: if White captured (Rook=5, Pawn=1) and Black captured (Knight=3),
//! White's advantage is (5+1) - 3 = +3.

use crate::game::types::{Color, PieceKind};

/// Captured pieces for both sides
///
/// # Fields
///
/// - `white_captured`: Black pieces that White has captured
/// - `black_captured`: White pieces that Black has captured
///
/// # Usage
///
/// ```rust,ignore
/// captured.add_capture(Color::Black, PieceKind::Queen);
/// let advantage = captured.material_advantage(); // +9 for White
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CapturedPieces {
    /// Pieces captured by white (black pieces taken), in capture order
    pub white_captured: Vec<PieceKind>,
    /// Pieces captured by black (white pieces taken), in capture order
    pub black_captured: Vec<PieceKind>,
}

/// Display-ready view of the pieces one colour has lost
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CaptureSummary {
    /// Non-pawn pieces, highest value first
    pub pieces: Vec<PieceKind>,
    /// Number of pawns lost
    pub pawns: u8,
}

impl CaptureSummary {
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty() && self.pawns == 0
    }

    /// Sum of the material values in this summary
    pub fn total_value(&self) -> i32 {
        self.pieces.iter().map(|kind| kind.value()).sum::<i32>()
            + i32::from(self.pawns) * PieceKind::Pawn.value()
    }
}

impl CapturedPieces {
    /// Record a piece capture
    ///
    /// # Arguments
    ///
    /// * `captured_piece_color` - Color of the piece that was captured
    /// * `kind` - Kind of piece that was captured
    ///
    /// Kings are ignored.
    pub fn add_capture(&mut self, captured_piece_color: Color, kind: PieceKind) {
        if kind == PieceKind::King {
            return;
        }
        match captured_piece_color {
            // If white piece was captured, black gets credit
            Color::White => self.black_captured.push(kind),
            // If black piece was captured, white gets credit
            Color::Black => self.white_captured.push(kind),
        }
    }

    /// Pieces of `color` removed from the board so far, in capture order
    pub fn lost(&self, color: Color) -> &[PieceKind] {
        match color {
            Color::White => &self.black_captured,
            Color::Black => &self.white_captured,
        }
    }

    /// Ordered display summary of the pieces of `color` that were captured
    ///
    /// # Returns
    ///
    /// Non-pawn pieces sorted by descending value (stable, so equal values
    /// stay in capture order) and the pawn count.
    pub fn summary(&self, color: Color) -> CaptureSummary {
        let lost = self.lost(color);
        let mut pieces: Vec<PieceKind> = lost
            .iter()
            .copied()
            .filter(|kind| *kind != PieceKind::Pawn)
            .collect();
        pieces.sort_by_key(|kind| std::cmp::Reverse(kind.value()));
        let pawns = lost.iter().filter(|kind| **kind == PieceKind::Pawn).count();

        CaptureSummary {
            pieces,
            pawns: u8::try_from(pawns).unwrap_or(u8::MAX),
        }
    }

    /// Get material advantage
    ///
    /// Returns positive if White is ahead, negative if Black is ahead, 0 if equal.
    pub fn material_advantage(&self) -> i32 {
        let white_score: i32 = self.white_captured.iter().map(|p| p.value()).sum();
        let black_score: i32 = self.black_captured.iter().map(|p| p.value()).sum();
        white_score - black_score
    }

    /// Clear all captured pieces (for new game)
    pub fn clear(&mut self) {
        self.white_captured.clear();
        self.black_captured.clear();
    }
}
