//! Chess game systems - the logic that turns input into moves
//!
//! # System Organization
//!
//! - [`input`] - Board interaction state machine (select, drag, drop, promote)
//! - [`network_move`] - Applies opponent moves and notifies listeners
//!
//! # Flow
//!
//! ```text
//! ┌─────────────────┐        ┌─────────────────┐
//! │ Pointer input   │        │ Opponent move   │
//! │ (BoardInput)    │        │ (WireMove)      │
//! └────────┬────────┘        └────────┬────────┘
//!          ↓                          ↓
//! ┌─────────────────┐        ┌─────────────────┐
//! │ BoardInteraction│        │ OpponentMove    │
//! │ handle()        │        │ Relay::relay()  │
//! └────────┬────────┘        └────────┬────────┘
//!          └───────────┬──────────────┘
//!                      ↓
//!             ┌─────────────────┐
//!             │ MoveOracle      │  Single source of truth
//!             └─────────────────┘
//! ```

pub mod input;
pub mod network_move;

pub use input::*;
pub use network_move::*;
