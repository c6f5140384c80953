//! Chess game resources - state owned by a game session
//!
//! # Resource Categories
//!
//! ## Rules
//! - [`MoveOracle`] - Contract of the rules engine
//! - [`ChessEngine`] - shakmaty-backed oracle, single source of truth
//!
//! ## Player Interaction
//! - [`Selection`] - Selected piece and its legal moves
//! - [`PendingPromotion`] - Drop waiting for a promotion choice
//!
//! ## Game History
//! - [`CapturedPieces`] - Material tracking and capture display order
//!
//! ## Game Status
//! - [`TerminalState`] / [`GameStatus`] - End conditions and local result

pub mod captured;
pub mod engine;
pub mod game_over;
pub mod player;

pub use captured::*;
pub use engine::*;
pub use game_over::*;
pub use player::*;
