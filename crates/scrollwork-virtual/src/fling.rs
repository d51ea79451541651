//! Fling stepping and prediction.
//!
//! Velocity decays by a fixed factor per 60 Hz frame regardless of the actual
//! tick rate, and the fling stops once it drops under `min_velocity` or hits
//! a scroll edge. [`FlingState::projected_distance`] integrates the same curve
//! ahead of time so prefetching can look where the fling will land.

use web_time::Instant;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingConfig {
    /// Velocity multiplier per 60 Hz frame.
    pub decay_per_frame: f32,
    /// Below this speed (px/s) the fling ends.
    pub min_velocity: f32,
    /// Longest time step integrated in one tick (s).
    pub max_dt: f32,
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            decay_per_frame: 0.90,
            min_velocity: 5.0,
            max_dt: 0.1,
        }
    }
}

impl FlingConfig {
    pub fn decay_per_frame(mut self, decay: f32) -> Self {
        self.decay_per_frame = decay.clamp(0.0, 0.999);
        self
    }
    pub fn min_velocity(mut self, v: f32) -> Self {
        self.min_velocity = v.max(0.0);
        self
    }
}

#[derive(Clone, Debug)]
pub struct FlingState {
    config: FlingConfig,
    velocity: f32, // px/sec
    last_tick: Option<Instant>,
}

impl Default for FlingState {
    fn default() -> Self {
        Self::new(FlingConfig::default())
    }
}

impl FlingState {
    pub fn new(config: FlingConfig) -> Self {
        Self {
            config,
            velocity: 0.0,
            last_tick: None,
        }
    }

    pub fn start(&mut self, velocity: f32, now: Instant) {
        self.velocity = velocity;
        self.last_tick = Some(now);
        log::trace!("fling start at {velocity} px/s");
    }

    pub fn stop(&mut self) {
        self.velocity = 0.0;
        self.last_tick = None;
    }

    pub fn is_active(&self) -> bool {
        self.last_tick.is_some() && self.velocity.abs() >= self.config.min_velocity
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Advances one tick. Returns the scroll delta to apply, or `None` once
    /// the fling has settled.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let last = self.last_tick?;
        if self.velocity.abs() < self.config.min_velocity {
            self.stop();
            return None;
        }

        let dt = now
            .saturating_duration_since(last)
            .as_secs_f32()
            .min(self.config.max_dt);
        self.last_tick = Some(now);
        if dt <= 0.0 {
            return Some(0.0);
        }

        let delta = self.velocity * dt;
        self.velocity *= self.config.decay_per_frame.powf(dt * 60.0);
        Some(delta)
    }

    /// Distance (px, signed) the current fling travels before settling.
    pub fn projected_distance(&self) -> f32 {
        projected_distance(self.velocity, &self.config)
    }
}

/// Distance travelled by a fling starting at `velocity` under `config`'s
/// decay, until its speed falls under `min_velocity`.
pub fn projected_distance(velocity: f32, config: &FlingConfig) -> f32 {
    let speed = velocity.abs();
    if speed < config.min_velocity || config.decay_per_frame <= 0.0 {
        return 0.0;
    }
    // v(t) = v0 * d^(60 t), so the distance until v = v_min is
    // (v0 - v_min) / (-60 ln d).
    let k = -60.0 * config.decay_per_frame.ln();
    if k <= 0.0 {
        return 0.0;
    }
    velocity.signum() * (speed - config.min_velocity) / k
}
