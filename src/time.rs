//! Fixed-timestep clock for driving a cloth.
//!
//! The cloth is only stable for small, constant timesteps, while frames
//! arrive at whatever rate the host manages. [`SimClock`] accumulates frame
//! time and reports how many fixed steps are due.
//!
//! # Example
//!
//! ```
//! use drape::time::SimClock;
//!
//! let mut clock = SimClock::new(0.01).unwrap();
//!
//! // In your frame loop:
//! let due = clock.advance(0.025);
//! assert_eq!(due, 2);
//! assert!((clock.alpha() - 0.5).abs() < 1e-3);
//! ```

use crate::error::ClothError;

/// Fixed-step accumulator with pause and time scaling.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Simulated seconds per step.
    fixed_dt: f32,
    /// Unsimulated time carried to the next frame.
    accumulator: f32,
    /// Total simulated seconds.
    elapsed_secs: f64,
    /// Total fixed steps taken.
    step_count: u64,
    /// Upper bound on steps per frame.
    max_steps_per_frame: u32,
    /// Paused clocks report no steps.
    paused: bool,
    /// Multiplier applied to every frame delta.
    time_scale: f32,
}

impl SimClock {
    /// Create a clock ticking every `fixed_dt` seconds.
    ///
    /// Fails with [`ClothError::InvalidConfiguration`] unless `fixed_dt` is
    /// finite and positive.
    pub fn new(fixed_dt: f32) -> Result<Self, ClothError> {
        if !(fixed_dt.is_finite() && fixed_dt > 0.0) {
            return Err(ClothError::invalid(format!(
                "fixed timestep must be positive, got {}",
                fixed_dt
            )));
        }
        Ok(Self {
            fixed_dt,
            accumulator: 0.0,
            elapsed_secs: 0.0,
            step_count: 0,
            max_steps_per_frame: 8,
            paused: false,
            time_scale: 1.0,
        })
    }

    /// Feed one frame's wall-clock delta; returns how many steps to run.
    ///
    /// At most `max_steps_per_frame` steps are reported; time beyond that
    /// is dropped so a slow frame cannot snowball into slower ones.
    pub fn advance(&mut self, frame_delta: f32) -> u32 {
        if self.paused || !frame_delta.is_finite() || frame_delta <= 0.0 {
            return 0;
        }

        self.accumulator += frame_delta * self.time_scale;

        let mut due = 0;
        while self.accumulator >= self.fixed_dt && due < self.max_steps_per_frame {
            self.accumulator -= self.fixed_dt;
            due += 1;
        }
        if due == self.max_steps_per_frame && self.accumulator >= self.fixed_dt {
            self.accumulator %= self.fixed_dt;
        }

        self.step_count += u64::from(due);
        self.elapsed_secs += f64::from(due) * f64::from(self.fixed_dt);
        due
    }

    /// Seconds per step.
    #[inline]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Total simulated seconds.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_secs
    }

    /// Total fixed steps reported so far.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.step_count
    }

    /// Fraction of a step left in the accumulator, for interpolation.
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.fixed_dt
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Stop reporting steps until resumed.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Start reporting steps again.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip between paused and running.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Scale frame time before it reaches the accumulator.
    ///
    /// `0.5` runs the cloth in slow motion; negative values clamp to zero.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Cap the number of steps a single frame may trigger (at least 1).
    pub fn set_max_steps_per_frame(&mut self, max: u32) {
        self.max_steps_per_frame = max.max(1);
    }

    /// Reset counters and the accumulator; settings are kept.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.elapsed_secs = 0.0;
        self.step_count = 0;
        self.paused = false;
    }
}
