//! Chess game logic module
//!
//! Everything between a pointer event and an applied move, with the rules
//! themselves delegated to a [`MoveOracle`](resources::MoveOracle).
//!
//! # Module Organization
//!
//! - `types` - Squares, pieces, moves, promotion choices
//! - `resources` - Oracle adapter, captures, selection, game-over state
//! - `systems` - Interaction state machine and opponent move relay
//! - `events` - Subscriber registries and the status bus
//! - `session` - [`GameSession`], the owner of one game
//! - `error` - [`GameError`](error::GameError)
//!
//! # Single Writer
//!
//! The oracle position is only mutated through `play_move`, called either by
//! the interaction state machine on a committed drop or by the relay for an
//! opponent move. Both run inside `&mut GameSession`, so one application
//! completes before the next starts.

pub mod error;
pub mod events;
pub mod resources;
pub mod session;
pub mod systems;
pub mod types;

pub use session::GameSession;
