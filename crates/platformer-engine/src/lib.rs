//! Platformer engine crate.
//!
//! This crate owns the game loop controller and the platform pieces it drives:
//! the display surface, the input source, frame timing and logging setup.

pub mod core;
pub mod device;
pub mod input;
pub mod platform;
pub mod time;

pub mod logging;
pub mod paint;
