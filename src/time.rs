use std::time::{Duration, Instant};

/// Longest step handed to the physics world.
pub const MAX_STEP: f32 = 1.0 / 60.0;

pub struct Time {
    last: Instant,
    pub delta: Duration,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { last: now, delta: Duration::ZERO }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last;
        self.last = now;
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Caps a frame delta at `max`; shorter deltas pass through. No sub-stepping.
pub fn clamp_step(dt: f32, max: f32) -> f32 {
    if dt > max {
        max
    } else {
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_frames_are_clamped() {
        assert_eq!(clamp_step(0.5, MAX_STEP), MAX_STEP);
        assert_eq!(clamp_step(0.01, MAX_STEP), 0.01);
        assert_eq!(clamp_step(MAX_STEP, MAX_STEP), MAX_STEP);
    }
}
