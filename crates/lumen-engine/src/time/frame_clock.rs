use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped time since the previous tick, in seconds.
    pub dt: f32,
    /// Monotonic timestamp taken at the tick.
    pub now: Instant,
    /// Unclamped milliseconds since the clock was created.
    pub elapsed_ms: f64,
    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots with a clamped delta.
///
/// The delta is clamped so a debugger pause or a minimized window does not
/// produce a huge step; `elapsed_ms` is left unclamped because shader time
/// must track the wall clock.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self { start: now, last: now, frame_index: 0, dt_min, dt_max }
    }

    /// Resets the delta baseline (not the elapsed origin).
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            elapsed_ms: now.saturating_duration_since(self.start).as_secs_f64() * 1000.0,
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
