//! Frame Advance
//!
//! One cooperative scheduler step for the whole session. The active
//! puzzle's countdown resolves first, so a clock exhausted this frame
//! fails its puzzle before anything else runs; the environment effect
//! timers decay after it. Hosts call [`advance`] once per frame with the
//! frame delta and drain the events it returns.

use tracing::debug;

use crate::game::env::Environment;
use crate::game::events::GameEvent;
use crate::game::lifecycle;
use crate::game::state::{PuzzleId, RaceState};

/// What one frame advance produced.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Events drained this frame, including any queued by operations that
    /// ran since the previous drain.
    pub events: Vec<GameEvent>,

    /// Puzzle that timed out during this frame, if any.
    pub failed: Option<PuzzleId>,
}

/// Advance the session by `dt` seconds.
///
/// Non-positive or non-finite deltas change nothing and drain nothing.
pub fn advance(state: &mut RaceState, env: &mut dyn Environment, dt: f64) -> TickReport {
    let mut report = TickReport::default();
    if !dt.is_finite() || dt <= 0.0 {
        debug!(dt, "ignoring degenerate frame delta");
        return report;
    }

    // 1. Session clock
    state.elapsed += dt;

    // 2. Active puzzle countdown (resolves exhaustion into failure)
    report.failed = lifecycle::tick_active(state, dt);

    // 3. Fog decay
    if state.fog.advance(dt) {
        env.set_fog_active(false);
        state.push_event(GameEvent::fog_cleared(state.elapsed));
    }

    // 4. Generic decoy decay
    if state.decoys.advance(dt) {
        env.clear_decoys();
        state.push_event(GameEvent::decoys_cleared(state.elapsed));
    }

    // 5. Hand the frame's notifications to the host
    report.events = state.take_events();
    report
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::env::testing::RecordingEnvironment;
    use crate::game::env::NullEnvironment;
    use crate::game::events::GameEventData;
    use crate::game::lifecycle::start_puzzle;
    use crate::game::sabotage::{apply_fake_clues, apply_fog, apply_time_drain};
    use crate::game::state::{FailReason, PuzzleConfig, PuzzleState, RaceId};
    use crate::game::variant::NullVariant;

    fn race() -> RaceState {
        RaceState::new(RaceId::new([9; 16]))
    }

    fn add_null(state: &mut RaceState, time_limit: f64) -> PuzzleId {
        let config = PuzzleConfig::new(time_limit, 0.5).unwrap();
        state.add_puzzle(config, Box::new(NullVariant))
    }

    #[test]
    fn test_drained_clock_fails_on_next_frame() {
        let mut state = race();
        let mut env = NullEnvironment;
        let id = add_null(&mut state, 60.0);

        start_puzzle(&mut state, id);
        advance(&mut state, &mut env, 57.0);
        assert_eq!(state.puzzle(id).unwrap().lifecycle.remaining(), 3.0);

        // A 5s drain against 3s of clock clamps to zero without failing.
        state.bank.add(1);
        apply_time_drain(&mut state, 5.0);
        assert_eq!(state.puzzle(id).unwrap().lifecycle.remaining(), 0.0);
        assert!(state.puzzle(id).unwrap().lifecycle.is_active());

        // The next frame observes the exhausted clock.
        let report = advance(&mut state, &mut env, 0.1);
        assert_eq!(report.failed, Some(id));
        assert_eq!(
            state.puzzle(id).unwrap().lifecycle.state(),
            PuzzleState::Failed
        );
        assert!(state.registry.is_vacant());
        assert!(report.events.iter().any(|e| matches!(
            e.data,
            GameEventData::PuzzleFailed { reason: FailReason::TimedOut, .. }
        )));
    }

    #[test]
    fn test_timeout_through_ordinary_ticking() {
        let mut state = race();
        let mut env = NullEnvironment;
        let id = add_null(&mut state, 2.0);

        start_puzzle(&mut state, id);
        let mut failed = None;
        for _ in 0..25 {
            let report = advance(&mut state, &mut env, 0.1);
            if report.failed.is_some() {
                failed = report.failed;
                break;
            }
        }
        assert_eq!(failed, Some(id));
    }

    #[test]
    fn test_countdown_notices_arrive_once_per_second() {
        let mut state = race();
        let mut env = NullEnvironment;
        let id = add_null(&mut state, 60.0);
        start_puzzle(&mut state, id);

        let mut notices = 0;
        for _ in 0..12 {
            let report = advance(&mut state, &mut env, 0.25);
            notices += report
                .events
                .iter()
                .filter(|e| matches!(e.data, GameEventData::TimeRemaining { .. }))
                .count();
        }
        assert_eq!(notices, 3);
    }

    #[test]
    fn test_fog_clears_itself_and_tells_the_scene() {
        let mut state = race();
        let mut env = RecordingEnvironment::default();
        state.bank.add(1);
        apply_fog(&mut state, &mut env, 10.0);
        assert!(env.fog_active);

        advance(&mut state, &mut env, 9.0);
        assert!(env.fog_active);

        let report = advance(&mut state, &mut env, 1.5);
        assert!(!env.fog_active);
        assert!(!state.fog.is_active());
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::FogCleared)));
    }

    #[test]
    fn test_generic_decoys_clear_after_duration() {
        let mut state = race();
        let mut env = RecordingEnvironment::default();
        state.bank.add(1);
        apply_fake_clues(&mut state, &mut env, 8.0);
        assert!(env.decoys_up);

        let report = advance(&mut state, &mut env, 8.5);
        assert!(!env.decoys_up);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::DecoysCleared)));
    }

    #[test]
    fn test_degenerate_deltas_are_ignored() {
        let mut state = race();
        let mut env = NullEnvironment;
        let id = add_null(&mut state, 60.0);
        start_puzzle(&mut state, id);
        state.take_events();

        for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let report = advance(&mut state, &mut env, dt);
            assert!(report.events.is_empty());
            assert!(report.failed.is_none());
        }
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.puzzle(id).unwrap().lifecycle.remaining(), 60.0);
    }

    #[test]
    fn test_advance_drains_queued_operation_events() {
        let mut state = race();
        let mut env = NullEnvironment;
        let id = add_null(&mut state, 60.0);

        // The start queues its event; the frame drain carries it out.
        start_puzzle(&mut state, id);
        let report = advance(&mut state, &mut env, 0.016);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::PuzzleStarted { .. })));
    }

    #[test]
    fn test_event_timestamps_follow_the_session_clock() {
        let mut state = race();
        let mut env = NullEnvironment;
        let id = add_null(&mut state, 60.0);
        start_puzzle(&mut state, id);

        advance(&mut state, &mut env, 0.5);
        let report = advance(&mut state, &mut env, 0.5);
        let notice = report
            .events
            .iter()
            .find(|e| matches!(e.data, GameEventData::TimeRemaining { .. }))
            .unwrap();
        assert_eq!(notice.at, 1.0);
    }
}
