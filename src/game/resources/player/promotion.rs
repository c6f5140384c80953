//! Pawn promotion state for a drop that needs a piece choice
//!
//! When more than one legal move shares the dropped (from, to) pair, the move
//! is held here and the UI prompts the player for their choice of piece.

use crate::game::types::{Color, Move, PromotionPiece, Square};

/// A pending pawn promotion
///
/// Holds the candidate moves so the chosen piece resolves to one of the
/// oracle's own moves rather than a move built from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPromotion {
    pub from: Square,
    pub to: Square,
    /// Color of the pawn being promoted
    pub color: Color,
    candidates: Vec<Move>,
}

impl PendingPromotion {
    pub fn new(from: Square, to: Square, color: Color, candidates: Vec<Move>) -> Self {
        Self {
            from,
            to,
            color,
            candidates,
        }
    }

    /// Pieces the prompt should offer, in display order
    pub fn choices(&self) -> Vec<PromotionPiece> {
        PromotionPiece::ALL
            .into_iter()
            .filter(|piece| self.candidates.iter().any(|mv| mv.promotion == Some(*piece)))
            .collect()
    }

    /// The candidate move for the chosen piece
    pub fn resolve(&self, piece: PromotionPiece) -> Option<Move> {
        self.candidates
            .iter()
            .copied()
            .find(|mv| mv.promotion == Some(piece))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(notation: &str) -> Square {
        Square::from_notation(notation).expect("valid square")
    }

    fn pending() -> PendingPromotion {
        let candidates = PromotionPiece::ALL
            .into_iter()
            .map(|piece| Move::with_promotion(sq("b7"), sq("a8"), piece))
            .collect();
        PendingPromotion::new(sq("b7"), sq("a8"), Color::White, candidates)
    }

    #[test]
    fn test_choices_follow_prompt_order() {
        assert_eq!(pending().choices(), PromotionPiece::ALL.to_vec());
    }

    #[test]
    fn test_resolve_picks_matching_candidate() {
        //! The chosen piece selects exactly one of the held moves
        let mv = pending().resolve(PromotionPiece::Knight).expect("candidate exists");
        assert_eq!(mv, Move::with_promotion(sq("b7"), sq("a8"), PromotionPiece::Knight));
    }

    #[test]
    fn test_resolve_unknown_choice() {
        let partial = PendingPromotion::new(
            sq("b7"),
            sq("a8"),
            Color::White,
            vec![Move::with_promotion(sq("b7"), sq("a8"), PromotionPiece::Queen)],
        );
        assert!(partial.resolve(PromotionPiece::Rook).is_none());
        assert_eq!(partial.choices(), vec![PromotionPiece::Queen]);
    }
}
