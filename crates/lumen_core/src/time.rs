use std::time::{Duration, Instant};

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug)]
pub struct Time {
    last_update: Instant,
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            last_update: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }
}

impl Time {
    /// Called by a windowed loop once per frame, measures the wall clock.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.advance(now - self.last_update);
        self.last_update = now;
    }

    /// Moves the clock forward by a fixed amount (headless runs, tests).
    pub fn advance(&mut self, dt: Duration) {
        self.delta = dt;
        self.elapsed += dt;
        self.frame_count += 1;
    }

    /// Returns time in seconds since last frame (e.g., 0.016 for 60fps)
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Returns total time the clock has been advanced by
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
