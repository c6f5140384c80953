//! Penguin Chess client core
//!
//! Two remote players share one position through a drag-and-drop board.
//!
//! - [`input`] - Pointer pixels to squares and back
//! - [`game`] - Rules oracle adapter, interaction state machine, opponent
//!   move relay, status bus, [`GameSession`](game::GameSession)
//! - [`networking`] - Transport queue, WebSocket link, lobby client
//! - [`core`] - Settings and their persistence
//! - [`ui`] - Terminal front end

pub mod core;
pub mod game;
pub mod input;
pub mod networking;
pub mod ui;
