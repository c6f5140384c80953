//! Player interaction resources
//!
//! Manages piece selection and pending promotion state for the local player.

pub mod promotion;
pub mod selection;
pub use promotion::*;
pub use selection::*;
