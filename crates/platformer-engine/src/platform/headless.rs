use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::{bail, Result};

use crate::core::AcquireStage;
use crate::input::InputEvent;
use crate::paint::Color;

use super::{version_string, DisplayInfo, DisplaySurface, InputSource};

/// One recorded capability call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    InitSubsystem,
    CreateWindow { width: u32, height: u32, title: String },
    CreateRenderContext,
    SetDrawColor(Color),
    Clear,
    Present,
    DestroyRenderContext,
    DestroyWindow,
    ShutdownSubsystem,
}

/// Shared, append-only record of the calls made on a `HeadlessPlatform`.
///
/// Clones observe the same log, so a copy kept by the caller stays readable
/// after the platform itself has been moved into (and dropped with) a `Game`.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<PlatformCall>>>);

impl CallLog {
    fn push(&self, call: PlatformCall) {
        self.0.borrow_mut().push(call);
    }

    /// Snapshot of every call so far, in order.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.0.borrow().clone()
    }

    /// How many times `call` was made.
    pub fn count(&self, call: &PlatformCall) -> usize {
        self.0.borrow().iter().filter(|c| *c == call).count()
    }
}

/// Window handle issued by `HeadlessPlatform`.
#[derive(Debug)]
pub struct HeadlessWindow {
    width: u32,
    height: u32,
}

/// Rendering context issued by `HeadlessPlatform`.
#[derive(Debug)]
pub struct HeadlessRenderContext {
    draw_color: Color,
    frames_presented: u64,
}

/// Window-less platform driven by a script.
///
/// Input is scripted as one batch of events per drain: the first
/// `poll_event` of a drain loads the next batch, and the drain ends when that
/// batch is empty. Once the script runs out a `Quit` is delivered (unless
/// disabled with `quit_when_exhausted(false)`), as if the user closed the
/// window, so an unattended loop always terminates.
///
/// Acquisition failures can be injected per step with `failing_at`.
#[derive(Debug)]
pub struct HeadlessPlatform {
    log: CallLog,
    failure: Option<(AcquireStage, String)>,

    script: VecDeque<Vec<InputEvent>>,
    pending: VecDeque<InputEvent>,
    draining: bool,
    quit_when_exhausted: bool,

    subsystem_up: bool,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            failure: None,
            script: VecDeque::new(),
            pending: VecDeque::new(),
            draining: false,
            quit_when_exhausted: true,
            subsystem_up: false,
        }
    }

    /// Appends event batches, one per drain.
    pub fn with_frames<I>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = Vec<InputEvent>>,
    {
        self.script.extend(frames);
        self
    }

    /// Makes the given acquisition step fail with `cause`.
    pub fn failing_at(mut self, stage: AcquireStage, cause: impl Into<String>) -> Self {
        self.failure = Some((stage, cause.into()));
        self
    }

    pub fn quit_when_exhausted(mut self, enabled: bool) -> Self {
        self.quit_when_exhausted = enabled;
        self
    }

    /// Handle on the call log; stays valid after the platform is dropped.
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    fn check(&self, stage: AcquireStage) -> Result<()> {
        match &self.failure {
            Some((failing, cause)) if *failing == stage => bail!("{cause}"),
            _ => Ok(()),
        }
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for HeadlessPlatform {
    type Window = HeadlessWindow;
    type RenderContext = HeadlessRenderContext;

    fn init_subsystem(&mut self) -> Result<()> {
        self.log.push(PlatformCall::InitSubsystem);
        self.check(AcquireStage::Subsystem)?;
        anyhow::ensure!(!self.subsystem_up, "subsystem already initialized");

        self.subsystem_up = true;
        Ok(())
    }

    fn create_window(&mut self, width: u32, height: u32, title: &str) -> Result<Self::Window> {
        self.log.push(PlatformCall::CreateWindow {
            width,
            height,
            title: title.to_string(),
        });
        self.check(AcquireStage::Window)?;
        anyhow::ensure!(self.subsystem_up, "subsystem is not initialized");
        anyhow::ensure!(width > 0 && height > 0, "window has zero size");

        Ok(HeadlessWindow { width, height })
    }

    fn create_render_context(&mut self, _window: &Self::Window) -> Result<Self::RenderContext> {
        self.log.push(PlatformCall::CreateRenderContext);
        self.check(AcquireStage::RenderContext)?;

        Ok(HeadlessRenderContext {
            draw_color: Color::BLACK,
            frames_presented: 0,
        })
    }

    fn destroy_render_context(&mut self, context: Self::RenderContext) {
        self.log.push(PlatformCall::DestroyRenderContext);
        log::debug!("headless context presented {} frames", context.frames_presented);
    }

    fn destroy_window(&mut self, _window: Self::Window) {
        self.log.push(PlatformCall::DestroyWindow);
    }

    fn shutdown_subsystem(&mut self) {
        self.log.push(PlatformCall::ShutdownSubsystem);
        self.subsystem_up = false;
        self.pending.clear();
    }

    fn set_draw_color(&mut self, context: &mut Self::RenderContext, color: Color) {
        self.log.push(PlatformCall::SetDrawColor(color));
        context.draw_color = color;
    }

    fn clear(&mut self, context: &mut Self::RenderContext) {
        self.log.push(PlatformCall::Clear);
        log::trace!("headless clear to {:?}", context.draw_color);
    }

    fn present(&mut self, context: &mut Self::RenderContext) {
        self.log.push(PlatformCall::Present);
        context.frames_presented += 1;
    }

    fn display_info(&self, window: &Self::Window, _context: &Self::RenderContext) -> DisplayInfo {
        DisplayInfo {
            width: window.width,
            height: window.height,
            version: version_string("headless"),
        }
    }
}

impl InputSource for HeadlessPlatform {
    fn poll_event(&mut self) -> Option<InputEvent> {
        if !self.draining {
            self.draining = true;
            match self.script.pop_front() {
                Some(batch) => self.pending.extend(batch),
                None if self.quit_when_exhausted => self.pending.push_back(InputEvent::Quit),
                None => {}
            }
        }

        let event = self.pending.pop_front();
        if event.is_none() {
            self.draining = false;
        }
        event
    }
}
