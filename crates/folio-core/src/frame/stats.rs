//! Rolling frame-time and FPS statistics

use serde::Serialize;

/// Frames per statistics window
pub const DEFAULT_WINDOW: usize = 60;

/// Average frame time (ms) above which the display emphasises it
pub const DEFAULT_SLOW_FRAME_MS: f64 = 20.0;

/// Rolling frame statistics
///
/// Accumulates frame deltas until `window` samples are in, then starts a
/// fresh window on the next sample.
#[derive(Clone, Debug)]
pub struct FrameStats {
    window: usize,
    frame_index: usize,
    last_time: f64,
    sum: f64,
    avg_frame_time: f64,
    avg_fps: f64,
}

/// Serializable view of [`FrameStats`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub frame_index: usize,
    pub avg_frame_time: f64,
    pub avg_fps: f64,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl FrameStats {
    /// Create statistics over `window` frames (at least one)
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            frame_index: 0,
            last_time: 0.0,
            sum: 0.0,
            avg_frame_time: 0.0,
            avg_fps: 0.0,
        }
    }

    /// Record a frame at `timestamp` (ms)
    pub fn record(&mut self, timestamp: f64) {
        if self.frame_index >= self.window {
            self.frame_index = 0;
            self.sum = 0.0;
        }

        let frame_time = timestamp - self.last_time;
        self.last_time = timestamp;

        self.sum += frame_time;
        self.avg_frame_time = self.sum / (self.frame_index + 1) as f64;
        self.avg_fps = if self.avg_frame_time > 0.0 {
            1000.0 / self.avg_frame_time
        } else {
            0.0
        };

        self.frame_index += 1;
    }

    /// Samples accumulated in the current window
    #[inline]
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Average frame time of the current window (ms)
    #[inline]
    pub fn avg_frame_time(&self) -> f64 {
        self.avg_frame_time
    }

    /// Frames per second derived from the average frame time
    #[inline]
    pub fn avg_fps(&self) -> f64 {
        self.avg_fps
    }

    /// Display markup: `"{ms} | {fps}"`, truncated to integers, with the
    /// frame time in `<b>` when it exceeds `slow_frame_ms`
    pub fn display_markup(&self, slow_frame_ms: f64) -> String {
        let ms = self.avg_frame_time as i64;
        let fps = self.avg_fps as i64;
        if self.avg_frame_time > slow_frame_ms {
            format!("<b>{}</b> | {}", ms, fps)
        } else {
            format!("{} | {}", ms, fps)
        }
    }

    /// Serializable copy of the current figures
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frame_index: self.frame_index,
            avg_frame_time: self.avg_frame_time,
            avg_fps: self.avg_fps,
        }
    }
}
