//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Backends translate platform events into `InputEvent`s.

pub(crate) mod platform;
mod types;

pub use types::{InputEvent, Key};
