//! Frame clock with delta-time sanitization

use std::time::Instant;

/// Longest frame the clock will report, in seconds
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Tracks elapsed time and the sanitized delta of the most recent frame
pub struct GameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock from wall time. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Advance the clock by an externally supplied delta (headless stepping).
    ///
    /// Negative deltas clamp to zero and non-finite deltas become a zero-length
    /// frame, so a bad sample never reaches `total_time`.
    pub fn advance(&mut self, dt: f64) {
        self.delta_time = sanitize_delta(dt);
        self.total_time += self.delta_time;
    }
}

/// Clamp a raw frame delta into `[0, MAX_FRAME_TIME]`, mapping NaN/inf to 0
pub fn sanitize_delta(dt: f64) -> f64 {
    if !dt.is_finite() {
        return 0.0;
    }
    // Clamp to avoid huge catch-up steps after a stall
    dt.clamp(0.0, MAX_FRAME_TIME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = GameClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = GameClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = GameClock::new();
        clock.advance(0.1);
        clock.advance(0.1);
        assert!((clock.total_time - 0.2).abs() < 1e-12);
        assert!((clock.delta_time - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_bad_deltas_are_sanitized() {
        let mut clock = GameClock::new();
        clock.advance(f64::NAN);
        assert_eq!(clock.delta_time, 0.0);
        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
        clock.advance(f64::INFINITY);
        assert_eq!(clock.delta_time, 0.0);
        clock.advance(10.0);
        assert_eq!(clock.delta_time, MAX_FRAME_TIME);
        assert_eq!(clock.total_time, MAX_FRAME_TIME);
    }
}
