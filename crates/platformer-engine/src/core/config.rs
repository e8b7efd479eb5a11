use std::time::Duration;

use crate::paint::Color;

/// Nominal frame rate.
///
/// Informational only: the loop does not sleep. Pacing comes from the
/// presentation call blocking on vsync.
pub const TARGET_FPS: u32 = 60;

/// Frame budget at `TARGET_FPS`. Informational only, see `TARGET_FPS`.
pub const TARGET_FRAME_TIME: Duration = Duration::from_nanos(1_000_000_000 / TARGET_FPS as u64);

/// Upper bound on the delta time handed to `update`.
pub const MAX_FRAME_DT: Duration = Duration::from_millis(100);

/// Color every frame is cleared to.
pub const BACKGROUND_COLOR: Color = Color::CORNFLOWER_BLUE;

/// Window parameters for the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    pub title: String,
}

impl GameConfig {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(800, 600, "Platformer Game")
    }
}
