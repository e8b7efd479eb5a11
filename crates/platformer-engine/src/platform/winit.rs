use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputEvent;
use crate::paint::Color;

use super::{version_string, DisplayInfo, DisplaySurface, InputSource};

/// Rendering context of the desktop backend.
///
/// Holds the frame between `clear` and `present`; at most one frame is in
/// flight.
pub struct WinitRenderContext {
    window: Arc<Window>,
    gpu: Gpu,
    draw_color: Color,
    frame: Option<GpuFrame>,
}

/// Desktop backend: winit for the event loop and window, wgpu for rendering.
///
/// The event loop is pumped rather than run: each drain performs one
/// zero-timeout pump of the OS queue, then hands out the translated events
/// one by one. This keeps the game loop in charge of the frame cadence.
pub struct WinitPlatform {
    gpu_init: GpuInit,
    event_loop: Option<EventLoop<()>>,
    queue: VecDeque<InputEvent>,
    draining: bool,
}

impl WinitPlatform {
    pub fn new(gpu_init: GpuInit) -> Self {
        Self {
            gpu_init,
            event_loop: None,
            queue: VecDeque::new(),
            draining: false,
        }
    }

    /// Moves whatever the OS has queued into `self.queue` without blocking.
    fn pump(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        let mut collector = EventCollector {
            queue: &mut self.queue,
        };

        if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut collector) {
            log::debug!("winit event loop exited with code {code}");
            self.queue.push_back(InputEvent::Quit);
        }
    }
}

impl Default for WinitPlatform {
    fn default() -> Self {
        Self::new(GpuInit::default())
    }
}

/// Receives pumped window events and queues their translation.
struct EventCollector<'q> {
    queue: &'q mut VecDeque<InputEvent>,
}

impl ApplicationHandler for EventCollector<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        self.queue.push_back(translate_window_event(&event));
    }
}

impl DisplaySurface for WinitPlatform {
    type Window = Arc<Window>;
    type RenderContext = WinitRenderContext;

    fn init_subsystem(&mut self) -> Result<()> {
        anyhow::ensure!(self.event_loop.is_none(), "winit event loop already created");

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        self.event_loop = Some(event_loop);
        Ok(())
    }

    fn create_window(&mut self, width: u32, height: u32, title: &str) -> Result<Self::Window> {
        let event_loop = self
            .event_loop
            .as_ref()
            .context("winit event loop is not initialized")?;

        let attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(width as f64, height as f64));

        // The loop is pumped, not run, so there is no `ActiveEventLoop` to
        // create the window from.
        #[allow(deprecated)]
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        Ok(Arc::new(window))
    }

    fn create_render_context(&mut self, window: &Self::Window) -> Result<Self::RenderContext> {
        let gpu = pollster::block_on(Gpu::new(Arc::clone(window), self.gpu_init.clone()))?;

        Ok(WinitRenderContext {
            window: Arc::clone(window),
            gpu,
            draw_color: Color::BLACK,
            frame: None,
        })
    }

    fn destroy_render_context(&mut self, context: Self::RenderContext) {
        let WinitRenderContext { frame, gpu, .. } = context;

        // An unpresented frame must go before the surface it came from.
        drop(frame);
        drop(gpu);
        log::debug!("render context destroyed");
    }

    fn destroy_window(&mut self, window: Self::Window) {
        if Arc::strong_count(&window) > 1 {
            log::warn!("window still referenced elsewhere; it will close when the last handle drops");
        }
        drop(window);
        log::debug!("window destroyed");
    }

    fn shutdown_subsystem(&mut self) {
        self.queue.clear();
        self.draining = false;
        self.event_loop = None;
        log::debug!("winit event loop dropped");
    }

    fn set_draw_color(&mut self, context: &mut Self::RenderContext, color: Color) {
        context.draw_color = color;
    }

    fn clear(&mut self, context: &mut Self::RenderContext) {
        let size = context.window.inner_size();
        if size != context.gpu.size() {
            context.gpu.resize(size);
        }

        // Minimized: nothing to draw into, skip the frame.
        if size.width == 0 || size.height == 0 {
            context.frame = None;
            return;
        }

        match context.gpu.begin_cleared_frame(context.draw_color) {
            Ok(frame) => context.frame = Some(frame),
            Err(err) => {
                context.frame = None;
                match context.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Quit => {
                        log::error!("surface is unusable, requesting quit");
                        self.queue.push_back(InputEvent::Quit);
                    }
                    action => log::debug!("skipping frame: {action:?}"),
                }
            }
        }
    }

    fn present(&mut self, context: &mut Self::RenderContext) {
        let Some(frame) = context.frame.take() else {
            return;
        };

        context.window.pre_present_notify();
        context.gpu.present(frame);
    }

    fn display_info(&self, _window: &Self::Window, context: &Self::RenderContext) -> DisplayInfo {
        let size = context.gpu.size();
        DisplayInfo {
            width: size.width,
            height: size.height,
            version: version_string(&format!("winit + wgpu, {}", context.gpu.adapter_summary())),
        }
    }
}

impl InputSource for WinitPlatform {
    fn poll_event(&mut self) -> Option<InputEvent> {
        if !self.draining {
            self.draining = true;
            self.pump();
        }

        let event = self.queue.pop_front();
        if event.is_none() {
            self.draining = false;
        }
        event
    }
}
