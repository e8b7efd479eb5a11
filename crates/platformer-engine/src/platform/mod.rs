//! Platform capabilities consumed by the game loop.
//!
//! The game loop never talks to a windowing library directly. It acquires and
//! drives a [`DisplaySurface`] and drains an [`InputSource`]; one backend object
//! implements both so that window and input events share a single FIFO queue.
//!
//! Backends:
//! - [`WinitPlatform`]: winit event loop + window, wgpu render context.
//! - [`HeadlessPlatform`]: scripted, window-less backend with a call log.

mod headless;
mod winit;

pub use headless::{CallLog, HeadlessPlatform, HeadlessRenderContext, HeadlessWindow, PlatformCall};
pub use self::winit::{WinitPlatform, WinitRenderContext};

use anyhow::Result;

use crate::input::InputEvent;
use crate::paint::Color;

/// Diagnostics reported once the display is fully acquired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayInfo {
    /// Effective drawable width in physical pixels.
    pub width: u32,
    /// Effective drawable height in physical pixels.
    pub height: u32,
    /// Engine version followed by the backend and its driver, if known.
    pub version: String,
}

/// `"platformer-engine <version> (<backend>)"`.
pub(crate) fn version_string(backend: &str) -> String {
    format!("platformer-engine {} ({backend})", env!("CARGO_PKG_VERSION"))
}

/// Window + rendering context provider.
///
/// Acquisition is split into three ordered steps so the caller can unwind a
/// partial acquisition in reverse order. Release methods take their handle by
/// value: a released handle cannot be used again.
pub trait DisplaySurface {
    /// Owned window handle.
    type Window;
    /// Owned rendering context bound to a window.
    type RenderContext;

    /// Brings up the windowing subsystem.
    fn init_subsystem(&mut self) -> Result<()>;

    /// Creates a visible window of `width` x `height` logical pixels.
    fn create_window(&mut self, width: u32, height: u32, title: &str) -> Result<Self::Window>;

    /// Creates a vsync'd rendering context for `window`.
    fn create_render_context(&mut self, window: &Self::Window) -> Result<Self::RenderContext>;

    fn destroy_render_context(&mut self, context: Self::RenderContext);

    fn destroy_window(&mut self, window: Self::Window);

    /// Tears down the windowing subsystem. Called last.
    fn shutdown_subsystem(&mut self);

    /// Sets the color used by subsequent `clear` calls.
    fn set_draw_color(&mut self, context: &mut Self::RenderContext, color: Color);

    /// Clears the back buffer to the current draw color.
    fn clear(&mut self, context: &mut Self::RenderContext);

    /// Presents the back buffer. May block until the next vertical blank.
    fn present(&mut self, context: &mut Self::RenderContext);

    fn display_info(&self, window: &Self::Window, context: &Self::RenderContext) -> DisplayInfo;
}

/// Non-blocking FIFO source of input events.
pub trait InputSource {
    /// Returns the next pending event, or `None` once the queue is drained.
    ///
    /// A `None` ends the current drain; the next call starts a new one and may
    /// pick up events that arrived in the meantime.
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// A complete platform backend: display and input from one object.
pub trait Platform: DisplaySurface + InputSource {}

impl<T: DisplaySurface + InputSource> Platform for T {}
