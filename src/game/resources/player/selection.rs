//! Selection state for the piece currently picked up

use crate::game::types::{Move, Piece, Square};

/// The selected piece and its legal moves
///
/// The move list is fetched once when the piece is selected and reused for
/// every hover, drop and click until the selection changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub piece: Piece,
    pub legal_moves: Vec<Move>,
    /// Set when the already-selected square is pressed again
    pub reselect: bool,
}

impl Selection {
    pub fn new(piece: Piece, legal_moves: Vec<Move>) -> Self {
        Self {
            piece,
            legal_moves,
            reselect: false,
        }
    }

    pub fn square(&self) -> Square {
        self.piece.square
    }

    /// Moves whose destination is `to`
    ///
    /// Several entries means the destination needs a promotion choice.
    pub fn moves_to(&self, to: Square) -> Vec<Move> {
        self.legal_moves
            .iter()
            .copied()
            .filter(|mv| mv.to == to)
            .collect()
    }

    pub fn is_legal_destination(&self, to: Square) -> bool {
        self.legal_moves.iter().any(|mv| mv.to == to)
    }

    /// Distinct destination squares, for move indicators
    pub fn legal_destinations(&self) -> Vec<Square> {
        let mut squares: Vec<Square> = self.legal_moves.iter().map(|mv| mv.to).collect();
        squares.sort();
        squares.dedup();
        squares
    }
}
