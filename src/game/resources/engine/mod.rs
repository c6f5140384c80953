//! Move legality oracle
//!
//! The oracle owns the canonical position. Everything that needs to know
//! whether a move is legal, what the board looks like or whether the game has
//! ended asks it through [`MoveOracle`].
//!
//! # Contract
//!
//! - [`MoveOracle::moves_for_square`] never fails: empty squares, opponent
//!   pieces and unknown squares all yield an empty list.
//! - [`MoveOracle::play_move`] accepts exactly the moves listed for the
//!   move's origin square and rejects everything else with
//!   [`GameError::IllegalMove`](crate::game::error::GameError::IllegalMove).
//! - Snapshots are rebuilt on every call; callers never hold stale pieces.

pub mod engine;
pub mod wire;

// Re-export all public items
pub use engine::*;
pub use wire::*;

use crate::game::error::GameResult;
use crate::game::resources::captured::CaptureSummary;
use crate::game::resources::game_over::TerminalState;
use crate::game::types::{Color, Move, Piece, Square};

/// Standard starting position
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Rules engine as seen by the rest of the client
pub trait MoveOracle {
    /// Start over from `fen`, clearing captures and repetition history
    fn reset(&mut self, fen: &str) -> GameResult<()>;

    /// Replace the position with `fen`
    fn load_position(&mut self, fen: &str) -> GameResult<()>;

    /// Legal moves starting on `square` for the side to move
    fn moves_for_square(&self, square: Square) -> Vec<Move>;

    /// Apply a legal move, advancing the side to move
    fn play_move(&mut self, mv: &Move) -> GameResult<()>;

    /// Side to move
    fn turn(&self) -> Color;

    fn is_checkmate(&self) -> bool;
    fn is_stalemate(&self) -> bool;
    fn is_insufficient_material(&self) -> bool;
    fn is_threefold_repetition(&self) -> bool;

    /// All pieces currently on the board
    fn board_snapshot(&self) -> Vec<Piece>;

    /// Pieces of `color` removed from the board so far
    fn captured_pieces(&self, color: Color) -> CaptureSummary;

    /// Positive when White has captured more material
    fn material_advantage(&self) -> i32;

    /// Piece standing on `square`, if any
    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board_snapshot()
            .into_iter()
            .find(|piece| piece.square == square)
    }

    /// Terminal tag of the current position
    ///
    /// Checked in the order checkmate, stalemate, insufficient material,
    /// threefold repetition.
    fn terminal_state(&self) -> TerminalState {
        if self.is_checkmate() {
            TerminalState::Checkmate
        } else if self.is_stalemate() {
            TerminalState::Stalemate
        } else if self.is_insufficient_material() {
            TerminalState::InsufficientMaterial
        } else if self.is_threefold_repetition() {
            TerminalState::ThreefoldRepetition
        } else {
            TerminalState::InProgress
        }
    }
}
