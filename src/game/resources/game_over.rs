//! Game over state tracking and result attribution
//!
//! Tracks end-game conditions reported by the rules engine and turns them
//! into a result relative to the local player.
//!
//! # Game Over Conditions
//!
//! ## Checkmate
//! The side to move is in check with no legal moves. The side that was
//! mated is the side to move after the final move.
//!
//! ## Draw Conditions
//! - **Stalemate**: side to move has no legal moves but is NOT in check
//! - **InsufficientMaterial**: neither player can deliver checkmate (e.g., K vs K)
//! - **ThreefoldRepetition**: the same position occurred three times
//!
//! # Attribution
//!
//! The engine only knows the terminal tag and whose turn it is next.
//! [`GameStatus::attribute`] compares that colour against the local seat:
//!
//! ```text
//! checkmate, next == local  → lose
//! checkmate, next != local  → win
//! any draw condition        → draw
//! ```
//!
//! # Reference
//!
//! FIDE Laws of Chess: https://www.fide.com/FIDE/handbook/LawsOfChess.pdf
//! - Article 5: Checkmate, stalemate, draws
//! - Article 9: Repetition of position

use crate::game::types::Color;

/// Terminal tag reported after each applied move
///
/// Starts as `InProgress`. The detection order when several apply is
/// checkmate, stalemate, insufficient material, threefold repetition.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TerminalState {
    /// Game is still in progress
    #[default]
    InProgress,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
}

impl TerminalState {
    /// Check if the game has ended
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TerminalState::InProgress)
    }

    /// Check if the terminal state is one of the draw conditions
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            TerminalState::Stalemate
                | TerminalState::InsufficientMaterial
                | TerminalState::ThreefoldRepetition
        )
    }

    /// Get a human-readable description of the terminal condition
    pub fn message(&self) -> &'static str {
        match self {
            TerminalState::InProgress => "Game in progress",
            TerminalState::Checkmate => "Checkmate",
            TerminalState::Stalemate => "Draw by stalemate",
            TerminalState::InsufficientMaterial => "Draw by insufficient material",
            TerminalState::ThreefoldRepetition => "Draw by threefold repetition",
        }
    }
}

/// Result of a finished game from the local player's point of view
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

/// Terminal tag plus, once terminal, the local result
///
/// # Examples
///
/// ```rust,ignore
/// let status = GameStatus::attribute(TerminalState::Checkmate, Color::White, Color::White);
/// assert!(status.is_over() && status.lose());
/// ```
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy)]
pub struct GameStatus {
    pub state: TerminalState,
    pub outcome: Option<Outcome>,
}

impl GameStatus {
    pub fn in_progress() -> Self {
        Self::default()
    }

    /// Attribute a terminal state to the local player
    ///
    /// # Arguments
    ///
    /// * `state` - Terminal tag from the engine
    /// * `to_move_next` - Side to move after the final move
    /// * `local` - Colour the local player is seated as
    pub fn attribute(state: TerminalState, to_move_next: Color, local: Color) -> Self {
        let outcome = match state {
            TerminalState::InProgress => None,
            TerminalState::Checkmate if to_move_next == local => Some(Outcome::Lose),
            TerminalState::Checkmate => Some(Outcome::Win),
            _ => Some(Outcome::Draw),
        };
        Self { state, outcome }
    }

    /// Check if the game has ended
    ///
    /// Input is locked once this returns `true`.
    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn win(&self) -> bool {
        self.outcome == Some(Outcome::Win)
    }

    pub fn lose(&self) -> bool {
        self.outcome == Some(Outcome::Lose)
    }

    pub fn draw(&self) -> bool {
        self.outcome == Some(Outcome::Draw)
    }

    /// Get a message suitable for the result banner
    pub fn message(&self) -> String {
        match self.outcome {
            None => self.state.message().to_string(),
            Some(Outcome::Win) => format!("You win! ({})", self.state.message()),
            Some(Outcome::Lose) => format!("You lose. ({})", self.state.message()),
            Some(Outcome::Draw) => self.state.message().to_string(),
        }
    }
}
