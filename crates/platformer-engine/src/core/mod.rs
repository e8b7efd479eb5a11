//! Game loop controller.
//!
//! `Game` owns the platform backend and the display it acquired, and drives
//! the per-frame sequence: poll input, update, render. Dropping it releases
//! the display on every exit path.

mod config;
mod display;
mod error;
mod game;

pub use config::{GameConfig, BACKGROUND_COLOR, MAX_FRAME_DT, TARGET_FPS, TARGET_FRAME_TIME};
pub use error::{AcquireStage, InitializationError};
pub use game::Game;
