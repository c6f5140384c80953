//! UI module - text front end used by the `penguin` binary
//!
//! - **terminal**: board and capture rendering, command parsing, and the
//!   synthetic pointer scripts that drive the interaction state machine

pub mod terminal;

pub use terminal::{BoardMarks, Command, CommandError};
