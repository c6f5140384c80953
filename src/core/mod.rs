//! Core module - application infrastructure shared by the library and binary
//!
//! - [`settings`] - [`ClientSettings`] and their persistence
//! - [`error`] - [`CoreError`]

pub mod error;
pub mod settings;

pub use error::{CoreError, CoreResult};
pub use settings::ClientSettings;
