//! Wall-clock frame timing for interactive hosts.

use std::time::Instant;

/// Turns successive wall-clock instants into clamped step lengths.
///
/// A long pause between frames (a hidden window, a debugger break) would
/// otherwise arrive as one huge `dt` and tunnel particles through the floor.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_dt: f64,
}

impl FrameClock {
    pub fn new(max_dt: f64) -> Self {
        Self { last: None, max_dt }
    }

    /// Seconds since the previous tick, at most `max_dt`. The first tick returns 0.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Like [`FrameClock::tick`] with an explicit current instant.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let Some(last) = self.last.replace(now) else {
            return 0.0;
        };
        let dt = now.saturating_duration_since(last).as_secs_f64();
        if dt > self.max_dt {
            log::warn!(
                "frame clock: {dt:.3}s since last frame, clamping to {:.3}s",
                self.max_dt
            );
            return self.max_dt;
        }
        dt
    }

    /// Forgets the previous tick so the next one returns 0.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
