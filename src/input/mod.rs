//! Input handling
//!
//! - [`pointer`] - Pixel ↔ square mapping for pointer events

pub mod pointer;

pub use pointer::*;
