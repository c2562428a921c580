//! Countdown and Effect Timers
//!
//! Time primitives shared by the puzzle clock and the sabotage effects.
//! All durations are simulated seconds (f64) advanced by the host's frame
//! delta; nothing here reads wall-clock time.

use serde::{Deserialize, Serialize};

// =============================================================================
// COUNTDOWN CLOCK
// =============================================================================

/// Outcome of advancing a [`CountdownClock`] by one frame delta.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClockStep {
    /// Seconds still on the clock after this step.
    pub remaining: f64,
    /// Set when a whole-second boundary was crossed since the last notice.
    /// At most one notice per step, however many boundaries the delta spanned.
    pub notice: bool,
    /// Set while the clock sits at zero after this step.
    pub expired: bool,
}

/// Floor-clamped countdown with a once-per-simulated-second notice schedule.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CountdownClock {
    limit: f64,
    remaining: f64,
    /// Elapsed-seconds mark at which the next notice fires.
    next_notice: f64,
}

impl CountdownClock {
    /// Fresh clock holding `limit` seconds.
    pub fn new(limit: f64) -> Self {
        Self {
            limit,
            remaining: limit,
            next_notice: 1.0,
        }
    }

    /// Seconds the clock started with.
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Seconds left on the clock.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Seconds burned so far.
    pub fn elapsed(&self) -> f64 {
        self.limit - self.remaining
    }

    /// Whether the clock has run out.
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Refill to the full limit and restart the notice schedule.
    pub fn rearm(&mut self) {
        self.remaining = self.limit;
        self.next_notice = 1.0;
    }

    /// Advance by `dt` seconds. Non-positive deltas change nothing and
    /// report nothing.
    pub fn advance(&mut self, dt: f64) -> ClockStep {
        if dt <= 0.0 {
            return ClockStep {
                remaining: self.remaining,
                notice: false,
                expired: false,
            };
        }
        self.remaining = (self.remaining - dt).max(0.0);

        let mut notice = false;
        let elapsed = self.elapsed();
        if elapsed >= self.next_notice {
            notice = true;
            // Coalesce skipped boundaries: the next notice is scheduled one
            // whole second past the boundary we just crossed.
            self.next_notice = elapsed.floor() + 1.0;
        }

        ClockStep {
            remaining: self.remaining,
            notice,
            expired: self.remaining <= 0.0,
        }
    }

    /// Remove `seconds` from the clock without advancing the notice
    /// schedule, floor-clamped at zero. Returns the amount actually removed.
    pub fn drain(&mut self, seconds: f64) -> f64 {
        if seconds <= 0.0 || self.remaining <= 0.0 {
            return 0.0;
        }
        let drained = seconds.min(self.remaining);
        self.remaining -= drained;
        drained
    }
}

// =============================================================================
// EFFECT TIMER
// =============================================================================

/// Accumulating decay timer for environment-wide sabotage effects.
///
/// Re-application while the effect is still running extends the remaining
/// duration; it never restarts it.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct EffectTimer {
    remaining: f64,
}

impl EffectTimer {
    /// Whether the effect is currently up.
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Seconds of effect left.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Add `duration` seconds. Returns `true` when this call turned the
    /// effect on (it was idle before).
    pub fn extend(&mut self, duration: f64) -> bool {
        if duration <= 0.0 {
            return false;
        }
        let was_idle = self.remaining <= 0.0;
        self.remaining += duration;
        was_idle
    }

    /// Decay by `dt` seconds. Returns `true` on the step that turned the
    /// effect off.
    pub fn advance(&mut self, dt: f64) -> bool {
        if dt <= 0.0 || self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining <= 0.0
    }

    /// Force the effect off.
    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_clock_is_full() {
        let clock = CountdownClock::new(60.0);
        assert_eq!(clock.limit(), 60.0);
        assert_eq!(clock.remaining(), 60.0);
        assert_eq!(clock.elapsed(), 0.0);
        assert!(!clock.is_expired());
    }

    #[test]
    fn test_advance_clamps_at_zero() {
        let mut clock = CountdownClock::new(3.0);
        let step = clock.advance(5.0);
        assert_eq!(step.remaining, 0.0);
        assert!(step.expired);
        assert!(clock.is_expired());
    }

    #[test]
    fn test_advance_ignores_non_positive_delta() {
        let mut clock = CountdownClock::new(10.0);
        clock.advance(2.0);
        let before = clock.remaining();

        let step = clock.advance(0.0);
        assert_eq!(clock.remaining(), before);
        assert!(!step.notice);
        assert!(!step.expired);

        let step = clock.advance(-1.0);
        assert_eq!(clock.remaining(), before);
        assert!(!step.notice);
    }

    #[test]
    fn test_one_notice_per_second() {
        let mut clock = CountdownClock::new(10.0);
        let mut notices = 0;
        // 4 Hz for 3 simulated seconds.
        for _ in 0..12 {
            if clock.advance(0.25).notice {
                notices += 1;
            }
        }
        assert_eq!(notices, 3);
    }

    #[test]
    fn test_notice_cadence_is_tick_rate_independent() {
        // Two runners covering the same 5.5s span at different frame rates
        // should hear the same number of notices.
        let mut slow = CountdownClock::new(30.0);
        let mut slow_notices = 0;
        for _ in 0..11 {
            if slow.advance(0.5).notice {
                slow_notices += 1;
            }
        }

        let mut fast = CountdownClock::new(30.0);
        let mut fast_notices = 0;
        for _ in 0..330 {
            if fast.advance(1.0 / 60.0).notice {
                fast_notices += 1;
            }
        }

        assert_eq!(slow_notices, 5);
        assert_eq!(fast_notices, 5);
    }

    #[test]
    fn test_large_delta_coalesces_notices() {
        let mut clock = CountdownClock::new(60.0);
        // Jumping 4.5 seconds crosses four boundaries but fires one notice.
        let step = clock.advance(4.5);
        assert!(step.notice);
        // The next boundary is at elapsed 5.0, so a small step reaches it.
        let step = clock.advance(0.6);
        assert!(step.notice);
        let step = clock.advance(0.2);
        assert!(!step.notice);
    }

    #[test]
    fn test_drain_clamps_and_reports() {
        let mut clock = CountdownClock::new(10.0);
        assert_eq!(clock.drain(4.0), 4.0);
        assert_eq!(clock.remaining(), 6.0);
        assert_eq!(clock.drain(100.0), 6.0);
        assert_eq!(clock.remaining(), 0.0);
        assert_eq!(clock.drain(1.0), 0.0);
    }

    #[test]
    fn test_drain_ignores_non_positive() {
        let mut clock = CountdownClock::new(10.0);
        assert_eq!(clock.drain(0.0), 0.0);
        assert_eq!(clock.drain(-3.0), 0.0);
        assert_eq!(clock.remaining(), 10.0);
    }

    #[test]
    fn test_exhausted_clock_reports_expired_on_next_advance() {
        let mut clock = CountdownClock::new(10.0);
        clock.drain(10.0);
        // Drain itself does not tick; the next advance observes expiry.
        let step = clock.advance(0.1);
        assert!(step.expired);
        assert_eq!(step.remaining, 0.0);
    }

    #[test]
    fn test_rearm_restores_full_clock() {
        let mut clock = CountdownClock::new(10.0);
        clock.advance(7.5);
        clock.rearm();
        assert_eq!(clock.remaining(), 10.0);
        // Notice schedule restarts too.
        assert!(!clock.advance(0.5).notice);
        assert!(clock.advance(0.5).notice);
    }

    #[test]
    fn test_effect_timer_extends_instead_of_restarting() {
        let mut timer = EffectTimer::default();
        assert!(timer.extend(10.0));
        timer.advance(4.0);
        // Second application stacks onto the 6.0 left.
        assert!(!timer.extend(10.0));
        assert_eq!(timer.remaining(), 16.0);
    }

    #[test]
    fn test_effect_timer_expiry_edge() {
        let mut timer = EffectTimer::default();
        timer.extend(1.0);
        assert!(!timer.advance(0.5));
        assert!(timer.advance(0.5));
        // Already off; no second expiry report.
        assert!(!timer.advance(0.5));
        assert!(!timer.is_active());
    }

    #[test]
    fn test_effect_timer_ignores_non_positive_extension() {
        let mut timer = EffectTimer::default();
        assert!(!timer.extend(0.0));
        assert!(!timer.extend(-2.0));
        assert!(!timer.is_active());
    }

    proptest! {
        #[test]
        fn prop_remaining_stays_within_limit(
            limit in 1.0f64..300.0,
            ops in proptest::collection::vec((any::<bool>(), 0.0f64..20.0), 0..100),
        ) {
            let mut clock = CountdownClock::new(limit);
            for (advance, amount) in ops {
                if advance {
                    clock.advance(amount);
                } else {
                    clock.drain(amount);
                }
                prop_assert!(clock.remaining() >= 0.0);
                prop_assert!(clock.remaining() <= clock.limit());
            }
        }
    }
}
