//! Elapsed-time bookkeeping and frame-rate clamping for a ticker.

use super::listener::FrameDelta;

/// Default target frame rate used to express deltas in frame units.
pub const DEFAULT_TARGET_FPS: f64 = 60.0;

/// Default lower frame-rate bound; deltas never exceed `1000 / 10` ms.
pub const DEFAULT_MIN_FPS: f64 = 10.0;

/// Slack for the `max_fps` skip check, absorbing float error in timestamps
/// that sit exactly on the frame boundary.
const SKIP_EPSILON_MS: f64 = 1e-6;

/// Mutable timing state owned by a ticker.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FrameTiming {
    target_fpms: f64,
    delta_time: f64,
    delta_ms: f64,
    elapsed_ms: f64,
    last_time: f64,
    /// Whether `last_time` marks a real tick rather than the initial `-1`.
    anchored: bool,
    speed: f64,
    /// Frames closer together than this are skipped (from `max_fps`).
    min_elapsed_ms: f64,
    /// Deltas are clamped to this ceiling (from `min_fps`).
    max_elapsed_ms: f64,
}

impl FrameTiming {
    pub(crate) fn new(target_fps: f64) -> Self {
        let target_fpms = target_fps / 1000.0;
        let frame_ms = 1.0 / target_fpms;
        let mut timing = Self {
            target_fpms,
            delta_time: 1.0,
            delta_ms: frame_ms,
            elapsed_ms: frame_ms,
            last_time: -1.0,
            anchored: false,
            speed: 1.0,
            min_elapsed_ms: 0.0,
            max_elapsed_ms: f64::INFINITY,
        };
        timing.set_min_fps(DEFAULT_MIN_FPS);
        timing
    }

    pub(crate) const fn delta_time(&self) -> f64 {
        self.delta_time
    }

    pub(crate) const fn delta_ms(&self) -> f64 {
        self.delta_ms
    }

    pub(crate) const fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub(crate) const fn last_time(&self) -> f64 {
        self.last_time
    }

    pub(crate) const fn speed(&self) -> f64 {
        self.speed
    }

    pub(crate) const fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Frames per second implied by the last raw elapsed time.
    pub(crate) fn fps(&self) -> f64 {
        1000.0 / self.elapsed_ms
    }

    pub(crate) fn min_fps(&self) -> f64 {
        1000.0 / self.max_elapsed_ms
    }

    /// A `fps` of zero removes the ceiling; values above the target rate are
    /// capped at the target rate.
    pub(crate) fn set_min_fps(&mut self, fps: f64) {
        let min_fpms = (fps.max(0.0) / 1000.0).min(self.target_fpms);
        self.max_elapsed_ms = 1.0 / min_fpms;
    }

    pub(crate) fn max_fps(&self) -> f64 {
        if self.min_elapsed_ms > 0.0 {
            (1000.0 / self.min_elapsed_ms).round()
        } else {
            0.0
        }
    }

    /// A `fps` of zero (or less) uncaps the frame rate. The cap never drops
    /// below `min_fps`.
    pub(crate) fn set_max_fps(&mut self, fps: f64) {
        if fps <= 0.0 {
            self.min_elapsed_ms = 0.0;
        } else {
            let max_fps = fps.max(self.min_fps());
            self.min_elapsed_ms = 1000.0 / max_fps;
        }
    }

    /// Restart elapsed-time measurement from `now`, used when a frame source
    /// starts driving the ticker.
    pub(crate) const fn reset_clock(&mut self, now: f64) {
        self.last_time = now;
        self.anchored = true;
    }

    /// Compute the delta for a tick at `current_time`.
    ///
    /// Returns `None` when listeners must not run: the clock did not advance
    /// (deltas reset to zero) or less than `1000 / max_fps` ms passed since
    /// the last dispatched tick (nothing is recorded, so elapsed time
    /// accumulates). A dispatched delta always lies within
    /// `[1000 / max_fps, 1000 / min_fps]` before `speed` is applied; the
    /// ceiling wins if the two bounds cross.
    pub(crate) fn begin(&mut self, current_time: f64) -> Option<FrameDelta> {
        if current_time <= self.last_time {
            self.delta_time = 0.0;
            self.delta_ms = 0.0;
            self.elapsed_ms = 0.0;
            self.last_time = current_time;
            self.anchored = true;
            return None;
        }

        let elapsed_ms = current_time - self.last_time;
        if self.anchored && elapsed_ms < self.min_elapsed_ms - SKIP_EPSILON_MS {
            return None;
        }

        // the first tick has no previous one to measure from
        let delta_ms = elapsed_ms
            .max(self.min_elapsed_ms)
            .min(self.max_elapsed_ms)
            * self.speed;

        self.elapsed_ms = elapsed_ms;
        self.delta_ms = delta_ms;
        self.delta_time = delta_ms * self.target_fpms;
        Some(FrameDelta {
            delta_time: self.delta_time,
            delta_ms: self.delta_ms,
            elapsed_ms: self.elapsed_ms,
        })
    }

    /// Record the tick at `current_time` as the previous one.
    pub(crate) const fn finish(&mut self, current_time: f64) {
        self.last_time = current_time;
        self.anchored = true;
    }
}
