//! Timer-based stand-in for `requestAnimationFrame`

/// Frame pacing for hosts without an animation-frame primitive
///
/// Spaces timer callbacks `interval_ms` apart: a request made at `now` fires
/// after `max(0, interval - (now - last))` and reports `now + delay` as its
/// frame timestamp.
#[derive(Clone, Debug)]
pub struct FrameFallback {
    interval_ms: f64,
    last_ms: f64,
}

impl FrameFallback {
    /// Create a fallback pacing frames `interval_ms` apart
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: 0.0,
        }
    }

    /// Plan the next frame for a request made at `now_ms`
    ///
    /// Returns `(delay_ms, frame_timestamp_ms)`.
    pub fn next(&mut self, now_ms: f64) -> (f64, f64) {
        let delay = (self.interval_ms - (now_ms - self.last_ms)).max(0.0);
        self.last_ms = now_ms + delay;
        (delay, self.last_ms)
    }

    /// Target spacing between frames
    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }
}

impl Default for FrameFallback {
    fn default() -> Self {
        Self::new(16.0)
    }
}
