//! Paint model shared between the controller and the display backends.
//!
//! Scope: solid colors only. The controller clears the frame with a single
//! background color; nothing else is drawn yet.

pub mod color;

pub use color::Color;
