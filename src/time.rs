//! Simulation clock.
//!
//! The host owns wall-clock time and hands the core a frame delta every
//! step. [`SimClock`] turns that raw delta into the step actually
//! integrated: it rejects non-positive or non-finite deltas, applies the
//! time scale, runs the result through the caller's cap and keeps frame and
//! elapsed counters.
//!
//! # Example
//!
//! ```ignore
//! use kinetics::{Integrator, SimClock};
//!
//! let mut clock = SimClock::new();
//! let integrator = Integrator::default();
//!
//! // In the host's frame loop:
//! if let Some(dt) = clock.advance(frame_seconds, |dt| integrator.clamp_dt(dt)) {
//!     // integrate with dt
//! }
//!
//! println!("Elapsed: {:.2}s", clock.elapsed());
//! println!("Frame: {}", clock.frame());
//! ```

/// Frame bookkeeping for a simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimClock {
    /// Total simulated time in seconds.
    elapsed_secs: f32,
    /// Step integrated on the last accepted frame.
    delta_secs: f32,
    /// Accepted frames since the last reset.
    frame_count: u64,
    /// Frames whose delta was capped.
    clamped_frames: u64,
    /// Fixed delta for deterministic updates (optional).
    fixed_delta: Option<f32>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
    /// Whether time is paused.
    paused: bool,
}

impl SimClock {
    /// Create a clock at frame zero.
    pub fn new() -> Self {
        Self {
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            clamped_frames: 0,
            fixed_delta: None,
            time_scale: 1.0,
            paused: false,
        }
    }

    /// Accept a raw host delta.
    ///
    /// The scaled delta is passed through `cap` (normally
    /// [`Integrator::clamp_dt`](crate::Integrator::clamp_dt)). Returns the
    /// step to integrate, or `None` if the frame must be skipped (paused,
    /// zero time scale, or a delta that is not a positive finite number).
    pub fn advance<F>(&mut self, raw_delta: f32, cap: F) -> Option<f32>
    where
        F: FnOnce(f32) -> f32,
    {
        if self.paused || !raw_delta.is_finite() || raw_delta <= 0.0 {
            return None;
        }

        let scaled = self.fixed_delta.unwrap_or(raw_delta) * self.time_scale;
        if scaled <= 0.0 {
            return None;
        }

        let delta = cap(scaled);
        if delta < scaled {
            self.clamped_frames += 1;
        }

        self.delta_secs = delta;
        self.elapsed_secs += delta;
        self.frame_count += 1;
        Some(delta)
    }

    /// Total simulated time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Step integrated on the last accepted frame.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Accepted frames since the last reset.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames whose delta was shortened by the cap.
    #[inline]
    pub fn clamped_frames(&self) -> u64 {
        self.clamped_frames
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

    /// Pause time progression. While paused every frame is skipped.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume time progression after pausing.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Use `delta` for every frame instead of the host delta.
    ///
    /// Pass `None` to go back to host timing. The host delta must still be
    /// positive for the frame to run.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Set time scale multiplier.
    ///
    /// - `1.0` = normal speed
    /// - `0.5` = half speed (slow motion)
    /// - `0.0` = frozen
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    /// Zero the counters. Scale, pause and fixed delta are kept.
    pub fn reset(&mut self) {
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.clamped_frames = 0;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}
