//! Frame clock for hosts driving a [`Scene`](crate::Scene).
//!
//! Produces the monotonic elapsed time and per-frame delta the animation
//! core consumes. Supports pausing, slow motion, a fixed timestep for
//! deterministic runs, and a cap on delta so a stalled window does not
//! make particles jump.
//!
//! # Example
//!
//! ```ignore
//! use treemorph::time::Time;
//!
//! let mut time = Time::new();
//!
//! // In your frame loop:
//! let (elapsed, delta) = time.update();
//! scene.update(elapsed, delta);
//! ```

use std::time::{Duration, Instant};

/// Default upper bound on a single frame delta, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Time tracking for the frame loop.
#[derive(Debug)]
pub struct Time {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Animation time in seconds; only advances while running.
    elapsed_secs: f32,
    /// Time since last frame in seconds, after scaling and clamping.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    /// Set when `fps` was recomputed and not yet taken.
    fps_fresh: bool,
    paused: bool,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
    max_delta: f32,
}

impl Time {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fps_fresh: false,
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Sample the wall clock. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frame_count += 1;
        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            self.fps_fresh = true;
        }

        self.advance(raw_delta)
    }

    /// Step the clock by `raw_delta` seconds without reading the wall clock.
    ///
    /// Applies pause, fixed delta, time scale and the delta cap exactly as
    /// [`Time::update`] does.
    pub fn advance(&mut self, raw_delta: f32) -> (f32, f32) {
        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        let raw = self.fixed_delta.unwrap_or(raw_delta);
        let raw = if raw.is_finite() { raw.max(0.0) } else { 0.0 };
        self.delta_secs = raw.min(self.max_delta) * self.time_scale;
        self.elapsed_secs += self.delta_secs;

        (self.elapsed_secs, self.delta_secs)
    }

    /// Animation time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// The FPS value once after each recompute, `None` in between.
    ///
    /// Lets a host refresh an on-screen counter without doing it every frame.
    pub fn take_fps(&mut self) -> Option<f32> {
        if self.fps_fresh {
            self.fps_fresh = false;
            Some(self.fps)
        } else {
            None
        }
    }

    /// Whether time is currently paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current time scale multiplier.
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Toggle pause state.
    ///
    /// While paused, `delta()` is 0 and `elapsed()` stops increasing.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set a fixed delta time for deterministic updates.
    ///
    /// Pass `None` to use real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Set time scale multiplier. Negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Set the cap on a single frame delta, in seconds.
    pub fn set_max_delta(&mut self, max_delta: f32) {
        self.max_delta = max_delta.max(0.0);
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
