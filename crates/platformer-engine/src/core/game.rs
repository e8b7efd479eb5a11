use crate::input::{InputEvent, Key};
use crate::platform::Platform;
use crate::time::FrameClock;

use super::config::{GameConfig, BACKGROUND_COLOR, MAX_FRAME_DT};
use super::display::DisplayResource;
use super::error::{AcquireStage, InitializationError};

/// The game loop controller.
///
/// Owns the platform backend, the display acquired from it, the running latch
/// and the frame clock. One `Game` per process run; it is deliberately not
/// `Clone`.
///
/// ```rust,ignore
/// let mut game = Game::new(WinitPlatform::new(GpuInit::default()), GameConfig::default())?;
/// game.run();
/// // dropping `game` releases the render context, the window, then the subsystem
/// ```
pub struct Game<P: Platform> {
    platform: P,

    /// `Some` for the whole life of the value; taken only in `Drop`.
    display: Option<DisplayResource<P>>,

    /// One-way latch: set at construction, cleared by a stop event.
    running: bool,

    clock: FrameClock,
}

impl<P: Platform> Game<P> {
    /// Acquires the display: subsystem, then window, then render context.
    ///
    /// On failure everything acquired so far is released, in reverse order,
    /// before the error is returned.
    pub fn new(mut platform: P, config: GameConfig) -> Result<Self, InitializationError> {
        platform
            .init_subsystem()
            .map_err(|e| InitializationError::from_platform(AcquireStage::Subsystem, e))?;

        let display = match DisplayResource::acquire(&mut platform, &config) {
            Ok(display) => display,
            Err(err) => {
                platform.shutdown_subsystem();
                return Err(err);
            }
        };

        let info = platform.display_info(&display.window, &display.context);
        log::info!("game initialized: {}x{} \"{}\"", info.width, info.height, config.title);
        log::info!("display backend: {}", info.version);

        Ok(Self {
            platform,
            display: Some(display),
            running: true,
            clock: FrameClock::with_max_dt(MAX_FRAME_DT),
        })
    }

    /// Runs the loop until a stop event is seen.
    ///
    /// The running flag is only checked between iterations, so the iteration
    /// that sees the stop event still updates and renders once.
    pub fn run(&mut self) {
        log::info!("starting game loop");

        while self.running {
            let time = self.clock.tick();
            log::trace!("frame {} dt={:.4}s", time.frame_index, time.dt);

            self.process_events();
            self.update(time.dt);
            self.render();
        }

        log::info!("game loop ended after {} frames", self.clock.frames());
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of loop iterations executed so far.
    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }

    /// Drains every pending event; never waits for new ones.
    fn process_events(&mut self) {
        while let Some(event) = self.platform.poll_event() {
            self.handle_event(&event);
        }
    }

    fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Quit => {
                log::info!("window close requested");
                self.running = false;
            }
            InputEvent::KeyDown { key: Key::Escape } => {
                log::info!("escape pressed, exiting");
                self.running = false;
            }
            InputEvent::KeyDown { .. } | InputEvent::Other => {}
        }
    }

    /// Advances the simulation by `dt` seconds. Nothing to simulate yet.
    fn update(&mut self, dt: f32) {
        debug_assert!((0.0..=MAX_FRAME_DT.as_secs_f32()).contains(&dt), "dt out of range: {dt}");
    }

    /// Clears to the background color and presents exactly one frame.
    fn render(&mut self) {
        let Some(display) = self.display.as_mut() else {
            return;
        };

        self.platform.set_draw_color(&mut display.context, BACKGROUND_COLOR);
        self.platform.clear(&mut display.context);
        self.platform.present(&mut display.context);
    }
}

impl<P: Platform> Drop for Game<P> {
    fn drop(&mut self) {
        let Some(display) = self.display.take() else {
            return;
        };

        display.release(&mut self.platform);
        self.platform.shutdown_subsystem();
        log::info!("display released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::platform::{CallLog, HeadlessPlatform, InputSource, PlatformCall};

    fn run_script(frames: Vec<Vec<InputEvent>>) -> (CallLog, u64) {
        let platform = HeadlessPlatform::new().with_frames(frames);
        let log = platform.call_log();

        let mut game = Game::new(platform, GameConfig::new(800, 600, "Title")).unwrap();
        game.run();
        let frames = game.frames();
        drop(game);

        (log, frames)
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::KeyDown { key }
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn construction_acquires_in_order() {
        let platform = HeadlessPlatform::new();
        let log = platform.call_log();

        let game = Game::new(platform, GameConfig::new(800, 600, "Title")).unwrap();
        assert!(game.is_running());
        assert_eq!(
            log.calls(),
            vec![
                PlatformCall::InitSubsystem,
                PlatformCall::CreateWindow { width: 800, height: 600, title: "Title".into() },
                PlatformCall::CreateRenderContext,
            ]
        );
    }

    #[test]
    fn subsystem_failure_attempts_nothing_else() {
        let platform = HeadlessPlatform::new().failing_at(AcquireStage::Subsystem, "no video");
        let log = platform.call_log();

        let err = Game::new(platform, GameConfig::default()).err().unwrap();
        assert_eq!(err.stage(), AcquireStage::Subsystem);
        assert_eq!(err.cause(), "no video");
        assert_eq!(log.calls(), vec![PlatformCall::InitSubsystem]);
    }

    #[test]
    fn window_failure_releases_subsystem_once() {
        let platform = HeadlessPlatform::new().failing_at(AcquireStage::Window, "no display");
        let log = platform.call_log();

        let err = Game::new(platform, GameConfig::default()).err().unwrap();
        assert_eq!(err.stage(), AcquireStage::Window);
        assert_eq!(log.count(&PlatformCall::ShutdownSubsystem), 1);
        assert_eq!(log.calls().last(), Some(&PlatformCall::ShutdownSubsystem));
        assert_eq!(log.count(&PlatformCall::DestroyWindow), 0);
    }

    #[test]
    fn render_context_failure_releases_window_then_subsystem() {
        let platform = HeadlessPlatform::new().failing_at(AcquireStage::RenderContext, "no adapter");
        let log = platform.call_log();

        let err = Game::new(platform, GameConfig::default()).err().unwrap();
        assert_eq!(err.stage(), AcquireStage::RenderContext);

        let calls = log.calls();
        assert_eq!(
            &calls[calls.len() - 2..],
            &[PlatformCall::DestroyWindow, PlatformCall::ShutdownSubsystem]
        );
        assert_eq!(log.count(&PlatformCall::DestroyRenderContext), 0);
        assert_eq!(log.count(&PlatformCall::DestroyWindow), 1);
        assert_eq!(log.count(&PlatformCall::ShutdownSubsystem), 1);
    }

    // ── destruction ───────────────────────────────────────────────────────

    #[test]
    fn drop_after_run_releases_in_reverse_order_once() {
        let (log, _) = run_script(vec![vec![InputEvent::Quit]]);

        let calls = log.calls();
        assert_eq!(
            &calls[calls.len() - 3..],
            &[
                PlatformCall::DestroyRenderContext,
                PlatformCall::DestroyWindow,
                PlatformCall::ShutdownSubsystem,
            ]
        );
        assert_eq!(log.count(&PlatformCall::DestroyRenderContext), 1);
        assert_eq!(log.count(&PlatformCall::DestroyWindow), 1);
        assert_eq!(log.count(&PlatformCall::ShutdownSubsystem), 1);
    }

    #[test]
    fn drop_without_run_still_releases() {
        let platform = HeadlessPlatform::new();
        let log = platform.call_log();

        drop(Game::new(platform, GameConfig::default()).unwrap());
        assert_eq!(log.count(&PlatformCall::DestroyRenderContext), 1);
        assert_eq!(log.count(&PlatformCall::ShutdownSubsystem), 1);
    }

    #[test]
    fn unwinding_releases_display() {
        let platform = HeadlessPlatform::new();
        let log = platform.call_log();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _game = Game::new(platform, GameConfig::default()).unwrap();
            panic!("failure elsewhere");
        }));

        assert!(result.is_err());
        assert_eq!(log.count(&PlatformCall::DestroyWindow), 1);
        assert_eq!(log.count(&PlatformCall::ShutdownSubsystem), 1);
    }

    // ── loop ──────────────────────────────────────────────────────────────

    #[test]
    fn quit_before_first_drain_runs_one_iteration() {
        let (log, frames) = run_script(vec![vec![InputEvent::Quit]]);
        assert_eq!(frames, 1);
        assert_eq!(log.count(&PlatformCall::Present), 1);
    }

    #[test]
    fn stop_mid_run_finishes_that_iteration_only() {
        let (log, frames) = run_script(vec![vec![], vec![InputEvent::Other], vec![key(Key::Escape)]]);
        assert_eq!(frames, 3);
        assert_eq!(log.count(&PlatformCall::Present), 3);
    }

    #[test]
    fn events_after_stop_in_same_drain_are_still_consumed() {
        let platform = HeadlessPlatform::new()
            .quit_when_exhausted(false)
            .with_frames(vec![vec![InputEvent::Quit, key(Key::A), InputEvent::Other]]);
        let log = platform.call_log();

        let mut game = Game::new(platform, GameConfig::default()).unwrap();
        game.run();

        assert_eq!(game.frames(), 1);
        assert_eq!(log.count(&PlatformCall::Present), 1);
        // `A` and `Other` went out in the same drain as `Quit`; nothing is left.
        assert_eq!(game.platform.poll_event(), None);
    }

    #[test]
    fn each_frame_is_set_color_clear_present() {
        let (log, _) = run_script(vec![vec![], vec![InputEvent::Quit]]);

        let frame_calls: Vec<_> = log
            .calls()
            .into_iter()
            .filter(|c| matches!(c, PlatformCall::SetDrawColor(_) | PlatformCall::Clear | PlatformCall::Present))
            .collect();

        let one_frame = [
            PlatformCall::SetDrawColor(BACKGROUND_COLOR),
            PlatformCall::Clear,
            PlatformCall::Present,
        ];
        assert_eq!(frame_calls, [one_frame.clone(), one_frame].concat());
    }

    // ── events ────────────────────────────────────────────────────────────

    fn game() -> Game<HeadlessPlatform> {
        Game::new(HeadlessPlatform::new(), GameConfig::default()).unwrap()
    }

    #[test]
    fn quit_event_stops() {
        let mut g = game();
        g.handle_event(&InputEvent::Quit);
        assert!(!g.is_running());
    }

    #[test]
    fn escape_stops() {
        let mut g = game();
        g.handle_event(&key(Key::Escape));
        assert!(!g.is_running());
    }

    #[test]
    fn other_keys_and_events_are_ignored() {
        let mut g = game();
        g.handle_event(&key(Key::Space));
        g.handle_event(&key(Key::Unknown(42)));
        g.handle_event(&InputEvent::Other);
        assert!(g.is_running());
    }

    #[test]
    fn running_latch_never_resets() {
        let mut g = game();
        g.handle_event(&InputEvent::Quit);
        g.handle_event(&key(Key::Enter));
        g.handle_event(&InputEvent::Other);
        assert!(!g.is_running());
    }
}
