//! Error types for game module
//!
//! Provides custom error types for game logic including move validation,
//! position loading and decoding moves received from the opponent.

/// Errors that can occur in game logic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Move is not in the legal move list of its origin square
    #[error("Illegal move: {mv}")]
    IllegalMove { mv: String },

    /// Text could not be read as a board square
    #[error("Invalid square: {notation:?}")]
    InvalidSquare { notation: String },

    /// Position notation rejected by the rules engine
    #[error("Invalid position: {message}")]
    InvalidPosition { message: String },

    /// Move received from the opponent could not be decoded
    #[error("Malformed remote move: {message}")]
    MalformedRemoteMove { message: String },

    /// Unknown promotion letter
    #[error("Invalid promotion piece: {letter:?}")]
    InvalidPromotion { letter: String },
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
