use crate::platform::DisplaySurface;

use super::config::GameConfig;
use super::error::{AcquireStage, InitializationError};

/// Window and rendering context, acquired and released as one unit.
///
/// `acquire` either returns both handles or releases whatever it created;
/// a half-built display never escapes.
pub(crate) struct DisplayResource<P: DisplaySurface> {
    pub(crate) window: P::Window,
    pub(crate) context: P::RenderContext,
}

impl<P: DisplaySurface> DisplayResource<P> {
    /// Creates the window, then the rendering context bound to it.
    ///
    /// The windowing subsystem must already be up; it is left running on
    /// failure so the caller can shut it down.
    pub(crate) fn acquire(platform: &mut P, config: &GameConfig) -> Result<Self, InitializationError> {
        let window = platform
            .create_window(config.width, config.height, &config.title)
            .map_err(|e| InitializationError::from_platform(AcquireStage::Window, e))?;

        let context = match platform.create_render_context(&window) {
            Ok(context) => context,
            Err(e) => {
                platform.destroy_window(window);
                return Err(InitializationError::from_platform(AcquireStage::RenderContext, e));
            }
        };

        Ok(Self { window, context })
    }

    /// Releases the rendering context, then the window.
    pub(crate) fn release(self, platform: &mut P) {
        let Self { window, context } = self;
        platform.destroy_render_context(context);
        platform.destroy_window(window);
    }
}
