//! Move encoding for the relay protocol
//!
//! The wire format spells promotions with a letter whose case follows the
//! mover's colour: `Q R B N` for white, `q r b n` for black. Decoding accepts
//! either case. This is the only place that casing exists; the rest of the
//! client works with [`PromotionPiece`].

use crate::game::error::{GameError, GameResult};
use crate::game::types::{Color, Move, PromotionPiece, Square};
use shared::protocol::WireMove;

/// Wire letter for a promotion piece moved by `mover`
pub fn promotion_letter(piece: PromotionPiece, mover: Color) -> char {
    match mover {
        Color::White => piece.letter().to_ascii_uppercase(),
        Color::Black => piece.letter(),
    }
}

/// Encode a local move for the opponent
pub fn encode_move(mv: &Move, mover: Color) -> WireMove {
    WireMove {
        from: mv.from.to_string(),
        to: mv.to.to_string(),
        promotion_piece: mv
            .promotion
            .map(|piece| promotion_letter(piece, mover).to_string()),
    }
}

/// Decode a move received from the opponent
///
/// # Errors
///
/// [`GameError::MalformedRemoteMove`] when a square or the promotion letter
/// cannot be read.
pub fn decode_move(wire: &WireMove) -> GameResult<Move> {
    let malformed = |what: &str| GameError::MalformedRemoteMove {
        message: format!("{what} in {wire:?}"),
    };
    let from = Square::from_notation(&wire.from).ok_or_else(|| malformed("bad origin"))?;
    let to = Square::from_notation(&wire.to).ok_or_else(|| malformed("bad destination"))?;

    let promotion = match wire.promotion_piece.as_deref() {
        None | Some("") => None,
        Some(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) => Some(
                    PromotionPiece::from_letter(letter)
                        .ok_or_else(|| malformed("bad promotion letter"))?,
                ),
                _ => return Err(malformed("bad promotion letter")),
            }
        }
    };

    Ok(Move {
        from,
        to,
        promotion,
    })
}
