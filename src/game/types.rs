//! Type definitions for chess game logic
//!
//! Engine-independent vocabulary used throughout the client: squares,
//! pieces, moves and promotion choices. The oracle adapter converts these to
//! and from the rules engine; nothing outside the adapter sees engine types.
//!
//! # Coordinates
//!
//! - `file`: 0 (file 'a') to 7 (file 'h')
//! - `rank`: 0 (rank '1') to 7 (rank '8')
//! - index: `rank * 8 + file`, so a1 = 0 and h8 = 63

use crate::game::error::GameError;
use std::fmt;
use std::str::FromStr;

pub use shared::protocol::Color;

/// A board square
///
/// Constructed only through checked constructors, so file and rank are
/// always in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    /// Create a square from zero-based file and rank
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let e4 = Square::new(4, 3).unwrap();
    /// assert_eq!(e4.to_string(), "e4");
    /// ```
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then_some(Self { rank, file })
    }

    /// Create a square, pulling out-of-range coordinates onto the board edge
    pub fn clamped(file: u8, rank: u8) -> Self {
        Self {
            rank: rank.min(7),
            file: file.min(7),
        }
    }

    /// Create a square from its linear index (0-63)
    pub fn from_index(index: u8) -> Option<Self> {
        Self::new(index % 8, index / 8).filter(|_| index < 64)
    }

    /// Parse algebraic notation such as `"e4"`
    pub fn from_notation(notation: &str) -> Option<Self> {
        let mut chars = notation.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        Self::new(file as u8 - b'a', rank as u8 - b'1')
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn index(self) -> u8 {
        self.rank * 8 + self.file
    }

    /// File letter ('a'..='h')
    pub fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    /// Rank digit ('1'..='8')
    pub fn rank_char(self) -> char {
        (b'1' + self.rank) as char
    }

    /// All 64 squares, a1 first, h8 last
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).filter_map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_notation(s).ok_or_else(|| GameError::InvalidSquare {
            notation: s.to_string(),
        })
    }
}

/// Kind of chess piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Material value used for capture display and balance
    ///
    /// Bishops count slightly above knights. The king has no value because it
    /// is never captured.
    pub fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 4,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    /// Lower-case letter as used in move text (`p n b r q k`)
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

/// A piece standing on a square
///
/// Snapshots are rebuilt after every applied move, so a `Piece` is never
/// mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
}

impl Piece {
    /// FEN-style symbol: upper case for white, lower case for black
    pub fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.letter().to_ascii_uppercase(),
            Color::Black => self.kind.letter(),
        }
    }
}

/// Piece a pawn may promote to
///
/// Colour-agnostic; the letter casing used on the wire is handled by the
/// oracle adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PromotionPiece {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionPiece {
    /// Choices in the order the promotion prompt offers them
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Bishop,
        PromotionPiece::Knight,
    ];

    pub fn kind(self) -> PieceKind {
        match self {
            PromotionPiece::Queen => PieceKind::Queen,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Knight => PieceKind::Knight,
        }
    }

    /// Read a promotion letter, ignoring case
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'q' => Some(PromotionPiece::Queen),
            'r' => Some(PromotionPiece::Rook),
            'b' => Some(PromotionPiece::Bishop),
            'n' => Some(PromotionPiece::Knight),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        self.kind().letter()
    }
}

/// A chess move
///
/// Two moves are equal when origin, destination and promotion all match.
/// Castling is expressed as the king's two-square step (`e1g1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PromotionPiece>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: PromotionPiece) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = GameError;

    /// Parse coordinate notation: `e2e4` or `e7e8q`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidSquare {
            notation: s.to_string(),
        };
        if !(4..=5).contains(&s.len()) || !s.is_ascii() {
            return Err(invalid());
        }
        let from: Square = s[0..2].parse()?;
        let to: Square = s[2..4].parse()?;
        match s[4..].chars().next() {
            None => Ok(Move::new(from, to)),
            Some(letter) => PromotionPiece::from_letter(letter)
                .map(|piece| Move::with_promotion(from, to, piece))
                .ok_or_else(|| GameError::InvalidPromotion {
                    letter: letter.to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_notation_roundtrip() {
        //! Every square renders as file letter plus rank digit and parses back
        for square in Square::all() {
            let text = square.to_string();
            assert_eq!(text.len(), 2);
            assert_eq!(text.parse::<Square>(), Ok(square));
        }
    }

    #[test]
    fn test_square_index_layout() {
        //! a1 is index 0, h1 is 7, a8 is 56, h8 is 63
        assert_eq!(Square::from_notation("a1").map(Square::index), Some(0));
        assert_eq!(Square::from_notation("h1").map(Square::index), Some(7));
        assert_eq!(Square::from_notation("a8").map(Square::index), Some(56));
        assert_eq!(Square::from_notation("h8").map(Square::index), Some(63));
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn test_square_rejects_out_of_range() {
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
        assert!(Square::from_index(64).is_none());
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
        assert!("".parse::<Square>().is_err());
    }

    #[test]
    fn test_piece_values() {
        //! Capture display values: bishop ranks above knight
        assert_eq!(PieceKind::Pawn.value(), 1);
        assert_eq!(PieceKind::Knight.value(), 3);
        assert_eq!(PieceKind::Bishop.value(), 4);
        assert_eq!(PieceKind::Rook.value(), 5);
        assert_eq!(PieceKind::Queen.value(), 9);
        assert_eq!(PieceKind::King.value(), 0);
    }

    #[test]
    fn test_move_parse_and_display() {
        let mv: Move = "e7e8q".parse().expect("Should parse");
        assert_eq!(mv.promotion, Some(PromotionPiece::Queen));
        assert_eq!(mv.to_string(), "e7e8q");

        let plain: Move = "g1f3".parse().expect("Should parse");
        assert_eq!(plain.promotion, None);
        assert_eq!(plain.to_string(), "g1f3");

        assert!("e7e8x".parse::<Move>().is_err());
        assert!("e7".parse::<Move>().is_err());
    }

    #[test]
    fn test_move_equality_includes_promotion() {
        let from = Square::from_notation("a7").expect("valid");
        let to = Square::from_notation("a8").expect("valid");
        assert_ne!(
            Move::with_promotion(from, to, PromotionPiece::Queen),
            Move::with_promotion(from, to, PromotionPiece::Knight)
        );
        assert_ne!(Move::new(from, to), Move::with_promotion(from, to, PromotionPiece::Rook));
    }

    #[test]
    fn test_promotion_letter_case_insensitive() {
        assert_eq!(PromotionPiece::from_letter('Q'), Some(PromotionPiece::Queen));
        assert_eq!(PromotionPiece::from_letter('n'), Some(PromotionPiece::Knight));
        assert_eq!(PromotionPiece::from_letter('k'), None);
    }
}
