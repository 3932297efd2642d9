use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Each `tick()` reads the elapsed time and resets the baseline, so the sum of
/// all reported `dt` values tracks wall time (up to clamping).
///
/// Delta time is clamped to avoid pathological values when the application is
/// paused by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps.
    ///
    /// - minimum prevents zero-dt behavior from tight loops on some platforms
    /// - maximum prevents large jumps after long stalls
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Creates a clock that reports raw elapsed time.
    pub fn unclamped() -> Self {
        Self::with_clamps(Duration::ZERO, Duration::MAX)
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(start: Instant, min_ms: u64, max_ms: u64) -> FrameClock {
        let mut c = FrameClock::with_clamps(
            Duration::from_millis(min_ms),
            Duration::from_millis(max_ms),
        );
        c.last = start;
        c
    }

    #[test]
    fn tick_reports_elapsed_and_resets_baseline() {
        let t0 = Instant::now();
        let mut c = clock_at(t0, 0, 1_000);

        let a = c.tick_at(t0 + Duration::from_millis(16));
        let b = c.tick_at(t0 + Duration::from_millis(40));

        assert!((a.dt - 0.016).abs() < 1e-6);
        // Second tick measures from the first, not from the start.
        assert!((b.dt - 0.024).abs() < 1e-6);
    }

    #[test]
    fn frame_index_increments_per_tick() {
        let t0 = Instant::now();
        let mut c = clock_at(t0, 0, 1_000);
        for i in 0..5u64 {
            let ft = c.tick_at(t0 + Duration::from_millis(10 * (i + 1)));
            assert_eq!(ft.frame_index, i);
        }
        assert_eq!(c.frame_index, 5);
    }

    #[test]
    fn dt_is_clamped_to_max_after_stall() {
        let t0 = Instant::now();
        let mut c = clock_at(t0, 1, 250);
        let ft = c.tick_at(t0 + Duration::from_secs(5));
        assert!((ft.dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn dt_is_clamped_to_min_for_tight_loops() {
        let t0 = Instant::now();
        let mut c = clock_at(t0, 1, 250);
        let ft = c.tick_at(t0);
        assert!((ft.dt - 0.001).abs() < 1e-6);
    }

    #[test]
    fn unclamped_reports_raw_time() {
        let t0 = Instant::now();
        let mut c = FrameClock::unclamped();
        c.last = t0;
        let ft = c.tick_at(t0 + Duration::from_secs(3));
        assert!((ft.dt - 3.0).abs() < 1e-6);
    }
}
