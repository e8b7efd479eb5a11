use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds, after clamping.
    pub dt: f32,

    /// Zero-based index of the loop iteration this tick starts.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped from above so that a long stall (debugger breakpoint,
/// OS suspension, window drag) does not turn into one huge simulation step.
/// There is no lower clamp: two ticks at the same instant yield `dt == 0.0`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_max: Duration,
}

impl FrameClock {
    /// Starts a clock now, with `dt` capped at `dt_max`.
    pub fn with_max_dt(dt_max: Duration) -> Self {
        Self::starting_at(Instant::now(), dt_max)
    }

    /// Creates a clock whose baseline is `start`.
    pub fn starting_at(start: Instant, dt_max: Duration) -> Self {
        Self {
            last: start,
            frame_index: 0,
            dt_max,
        }
    }

    /// Number of ticks taken so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Samples the monotonic clock and advances.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now` and returns a new `FrameTime`.
    ///
    /// A `now` earlier than the previous tick yields `dt == 0.0` and leaves the
    /// baseline where it was, so the baseline never moves backwards.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let elapsed = now.saturating_duration_since(self.last);
        let dt = clamp_dt(elapsed, self.dt_max);

        self.last = self.last.max(now);

        let ft = FrameTime {
            dt,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

/// Converts an elapsed duration into seconds, capped at `dt_max`.
pub fn clamp_dt(elapsed: Duration, dt_max: Duration) -> f32 {
    elapsed.min(dt_max).as_secs_f32()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: Duration = Duration::from_millis(100);

    #[test]
    fn long_stall_is_clamped_to_ceiling() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, MAX);

        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert_eq!(ft.dt, 0.1);
    }

    #[test]
    fn short_frame_passes_through() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, MAX);

        let ft = clock.tick_at(start + Duration::from_millis(16));
        assert!((ft.dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn same_instant_gives_zero_dt() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, MAX);

        assert_eq!(clock.tick_at(start).dt, 0.0);
    }

    #[test]
    fn baseline_advances_once_per_tick() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, MAX);

        let t1 = start + Duration::from_millis(10);
        let t2 = t1 + Duration::from_millis(20);
        clock.tick_at(t1);

        let ft = clock.tick_at(t2);
        assert!((ft.dt - 0.020).abs() < 1e-6);
    }

    #[test]
    fn earlier_instant_does_not_rewind_baseline() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::starting_at(start, MAX);

        let ft = clock.tick_at(start - Duration::from_millis(500));
        assert_eq!(ft.dt, 0.0);

        let ft = clock.tick_at(start + Duration::from_millis(10));
        assert!((ft.dt - 0.010).abs() < 1e-6);
    }

    #[test]
    fn frame_index_counts_ticks() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, MAX);

        assert_eq!(clock.tick_at(start).frame_index, 0);
        assert_eq!(clock.tick_at(start).frame_index, 1);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn dt_always_within_bounds() {
        for ms in [0u64, 1, 50, 99, 100, 101, 250, 10_000] {
            let dt = clamp_dt(Duration::from_millis(ms), MAX);
            assert!((0.0..=0.1).contains(&dt), "{ms}ms gave {dt}");
        }
    }
}
