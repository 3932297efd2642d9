//! Frame timing.
//!
//! One `FrameClock` per render loop; `tick()` reads the time elapsed since the
//! previous tick and restarts the measurement in the same step.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
