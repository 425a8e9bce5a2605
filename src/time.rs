//! Frame clock using an accumulator pattern.
//!
//! The browser loop calls at ~60fps with variable delta. TickClock batches
//! those frames into time-advance dispatches of at least `MIN_DISPATCH_MS`,
//! emitting the accumulated gap as fractional seconds so no time is lost to
//! truncation. Engine semantics never depend on the batch size.

/// Smallest frame batch worth dispatching, in milliseconds.
const MIN_DISPATCH_MS: f64 = 100.0;

/// Largest single-frame delta accepted, in milliseconds. Longer gaps (a
/// backgrounded tab) are clamped; real absences go through offline catch-up
/// on restore instead.
const MAX_FRAME_MS: f64 = 500.0;

pub struct TickClock {
    /// Accumulated milliseconds not yet dispatched.
    accumulator: f64,
    /// Timestamp of the last update (ms), None if first frame.
    last_timestamp: Option<f64>,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (from `performance.now()` or similar),
    /// once per draw frame. Returns the elapsed seconds to advance the game
    /// by, or `None` when the accumulated gap is still below the dispatch
    /// threshold.
    pub fn update(&mut self, now_ms: f64) -> Option<f64> {
        let delta = match self.last_timestamp {
            Some(prev) => {
                let d = now_ms - prev;
                // Negative deltas (clock adjustment) contribute nothing.
                d.clamp(0.0, MAX_FRAME_MS)
            }
            None => 0.0, // First frame: no delta
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        if self.accumulator < MIN_DISPATCH_MS {
            return None;
        }
        let seconds = self.accumulator / 1000.0;
        self.accumulator = 0.0;
        Some(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_emits_nothing() {
        let mut clock = TickClock::new();
        assert_eq!(clock.update(0.0), None);
    }

    #[test]
    fn dispatch_at_threshold() {
        let mut clock = TickClock::new();
        clock.update(0.0);
        let delta = clock.update(100.0).unwrap();
        assert!((delta - 0.1).abs() < 1e-9);
    }

    #[test]
    fn sub_threshold_frames_accumulate() {
        let mut clock = TickClock::new();
        clock.update(0.0);
        assert_eq!(clock.update(16.0), None);
        assert_eq!(clock.update(32.0), None);
        assert_eq!(clock.update(48.0), None);
        assert_eq!(clock.update(64.0), None);
        assert_eq!(clock.update(80.0), None);
        assert_eq!(clock.update(96.0), None);
        // Crosses 100ms: the full 112ms is emitted, nothing truncated.
        let delta = clock.update(112.0).unwrap();
        assert!((delta - 0.112).abs() < 1e-9);
    }

    #[test]
    fn no_time_lost_across_many_frames() {
        let mut clock = TickClock::new();
        clock.update(0.0);
        let mut total = 0.0;
        // 600 frames at ~16.67ms each = 10 seconds
        for i in 1..=600 {
            if let Some(delta) = clock.update(i as f64 * 16.667) {
                total += delta;
            }
        }
        // Everything emitted except at most one sub-threshold remainder.
        assert!((total - 10.0).abs() < 0.11, "lost time: emitted {total}");
    }

    #[test]
    fn large_gap_clamped() {
        let mut clock = TickClock::new();
        clock.update(0.0);
        // 10 second gap (tab backgrounded): clamped to 500ms.
        let delta = clock.update(10_000.0).unwrap();
        assert!((delta - 0.5).abs() < 1e-9);
    }

    #[test]
    fn backwards_timestamp_ignored() {
        let mut clock = TickClock::new();
        clock.update(1_000.0);
        assert_eq!(clock.update(500.0), None);
        // The regressed timestamp becomes the new reference point.
        let delta = clock.update(650.0).unwrap();
        assert!((delta - 0.15).abs() < 1e-9);
    }
}
