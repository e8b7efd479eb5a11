use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface;
use crate::paint::Color;

/// Settings for the render context of the desktop backend.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,

    /// Present once per vertical blank.
    ///
    /// The game loop has no sleep of its own; with vsync on, `present` is
    /// what holds it to the display refresh rate.
    pub vsync: bool,

    pub required_limits: wgpu::Limits,

    /// Frames the swapchain may queue ahead of the display (a hint).
    pub frame_latency: u32,
}

impl GpuInit {
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            vsync: true,
            required_limits: wgpu::Limits::default(),
            frame_latency: 2,
        }
    }
}

/// What the backend does after the swapchain refused an image.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface configured again; the next frame should go through.
    Reconfigured,
    /// Drop this frame and carry on.
    SkipFrame,
    /// The surface cannot recover; the game should stop.
    Quit,
}

/// Swapchain image for one loop iteration, already cleared.
///
/// Holding it blocks acquisition of the next image, so it lives only between
/// `begin_cleared_frame` and `present`.
pub struct GpuFrame {
    texture: wgpu::SurfaceTexture,
    encoder: wgpu::CommandEncoder,
}

/// wgpu device, queue and window surface of one game window.
///
/// The surface keeps its own `Arc<Window>`, so the window outlives the `Gpu`.
pub struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,
    config: wgpu::SurfaceConfiguration,

    /// Window size in physical pixels; may be 0x0 while minimized, in which
    /// case `config` still holds the last drawable size.
    size: PhysicalSize<u32>,
}

impl Gpu {
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(surface::is_drawable(size), "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("platformer device"),
                required_features: wgpu::Features::empty(),
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, init.prefer_srgb)
            .context("surface reports no texture formats")?;

        // Every frame is a full opaque clear.
        let alpha_mode = surface::choose_alpha_mode(&caps.alpha_modes, Some(wgpu::CompositeAlphaMode::Opaque));

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode(),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.frame_latency,
        };
        surface.configure(&device, &config);

        log::debug!(
            "surface configured: {format:?} {}x{} {:?}",
            size.width,
            size.height,
            config.present_mode
        );

        Ok(Self {
            surface,
            device,
            queue,
            adapter_info: adapter.get_info(),
            config,
            size,
        })
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Backend, adapter name and driver version.
    pub fn adapter_summary(&self) -> String {
        let info = &self.adapter_info;
        describe_adapter(info.backend, &info.name, &info.driver_info)
    }

    /// Follows a window resize. A 0x0 size is recorded but not configured.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if !surface::is_drawable(new_size) {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next swapchain image and records a clear of it to `color`.
    pub fn begin_cleared_frame(&self, color: Color) -> std::result::Result<GpuFrame, SurfaceError> {
        let texture = self.surface.get_current_texture()?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("platformer frame"),
            });

        {
            let _clear = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("platformer clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color.to_wgpu(self.config.format.is_srgb())),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        Ok(GpuFrame { texture, encoder })
    }

    /// Submits the frame's commands and queues the image for display.
    ///
    /// With vsync on this is where the loop waits.
    pub fn present(&self, frame: GpuFrame) {
        let GpuFrame { texture, encoder } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));
        texture.present();
    }

    /// Maps a swapchain error to an action, reconfiguring the surface when
    /// that is the remedy.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = surface::classify_surface_error(&err);
        if action == SurfaceErrorAction::Reconfigured && surface::is_drawable(self.size) {
            self.surface.configure(&self.device, &self.config);
        }
        action
    }
}

/// `"Vulkan: <name> (driver <info>)"`; the driver part is left out when the
/// backend reports none.
fn describe_adapter(backend: wgpu::Backend, name: &str, driver_info: &str) -> String {
    if driver_info.is_empty() {
        format!("{backend:?}: {name}")
    } else {
        format!("{backend:?}: {name} (driver {driver_info})")
    }
}
