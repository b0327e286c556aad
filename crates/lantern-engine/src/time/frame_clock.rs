use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous tick, in seconds, clamped by the clock.
    pub dt: f32,

    /// Seconds since the clock was created.
    ///
    /// Uploaded as the scene shader's `time` uniform; unclamped, so it keeps
    /// tracking wall time across stalls.
    pub elapsed: f32,

    /// Monotonic frame counter, starting at 0 on the first tick.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock lives with each window so its deltas measure that window's
/// redraw cadence.
///
/// Delta time is clamped so a stall (debugger, minimized window, shader
/// compilation on the first frame) does not produce a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock with default clamps.
    ///
    /// - 100 µs minimum: two ticks in one event-loop turn never yield zero
    /// - 250 ms maximum: a long stall counts as a quarter second
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with explicit clamps; `dt_min` must not exceed `dt_max`.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
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
