//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the loop.
//! Intended usage:
//! - one `FrameClock` per loop
//! - call `tick()` once per iteration to obtain `FrameTime`

mod frame_clock;

pub use frame_clock::{clamp_dt, FrameClock, FrameTime};
