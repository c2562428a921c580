//! Puzzle Lifecycle Operations
//!
//! The session operations that drive each puzzle's state machine: start,
//! complete, fail, reset, time drain, and discrete action judging.
//! Precondition misses here are expected races (a late grab after the
//! clock ran out, a duplicate start request) and resolve as silent no-ops;
//! every distinction a caller can act on comes back as an outcome value.

use tracing::{debug, info, warn};

use crate::game::events::GameEvent;
use crate::game::gold::{self, GoldVerdict};
use crate::game::sabotage::SABOTAGE_MENU;
use crate::game::state::{FailReason, PuzzleId, PuzzleState, RaceState};
use crate::game::variant::{ActionOutcome, PlayerAction};

/// Result of a [`start_puzzle`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// The puzzle armed and claimed the active slot
    Started,
    /// No such puzzle slot
    UnknownPuzzle,
    /// The puzzle was already running; nothing changed
    AlreadyActive,
    /// The puzzle sits in a terminal state; reset it first
    Finished,
    /// A different puzzle holds the active slot
    AnotherActive(PuzzleId),
}

/// Arm a puzzle: `Idle -> Active`, clock refilled to the limit, registry
/// claimed, variant `on_start` hook fired.
pub fn start_puzzle(state: &mut RaceState, id: PuzzleId) -> StartOutcome {
    if let Some(holder) = state.registry.current() {
        if holder != id {
            warn!(
                puzzle = id.0,
                holder = holder.0,
                "refusing start while another puzzle is active"
            );
            return StartOutcome::AnotherActive(holder);
        }
    }

    let at = state.elapsed;
    let Some(instance) = state.puzzles.get_mut(&id) else {
        warn!(puzzle = id.0, "start on unknown puzzle");
        return StartOutcome::UnknownPuzzle;
    };
    match instance.lifecycle.state() {
        PuzzleState::Active => return StartOutcome::AlreadyActive,
        PuzzleState::Completed | PuzzleState::Failed => {
            debug!(puzzle = id.0, "start on finished puzzle ignored");
            return StartOutcome::Finished;
        }
        PuzzleState::Idle => {}
    }

    instance.lifecycle.arm();
    instance.attempts += 1;
    instance.variant.on_start();
    let time_limit = instance.lifecycle.time_limit();

    state.registry.activate(id);
    state.push_event(GameEvent::puzzle_started(at, id, time_limit));
    info!(puzzle = id.0, time_limit, "puzzle started");
    StartOutcome::Started
}

/// Complete the active attempt: `Active -> Completed`, gold evaluated
/// exactly once, token credited on gold, registry released.
///
/// Returns the gold verdict, or `None` when the call was a no-op.
pub fn complete_puzzle(state: &mut RaceState, id: PuzzleId) -> Option<GoldVerdict> {
    let at = state.elapsed;
    let instance = state.puzzles.get_mut(&id)?;
    if !instance.lifecycle.is_active() {
        debug!(puzzle = id.0, state = ?instance.lifecycle.state(), "complete ignored");
        return None;
    }

    let config = instance.lifecycle.config();
    let remaining = instance.lifecycle.remaining();
    let verdict = gold::evaluate(config.time_limit, config.gold_fraction, remaining);

    instance.lifecycle.mark_completed();
    instance.variant.on_complete();
    instance.best_clear = Some(match instance.best_clear {
        Some(best) => best.min(verdict.clear_time),
        None => verdict.clear_time,
    });
    if verdict.is_gold {
        instance.golds += 1;
    }
    let kind = instance.variant.name();

    state.registry.release(id);
    state.push_event(GameEvent::puzzle_completed(
        at,
        id,
        verdict.clear_time,
        verdict.is_gold,
    ));
    info!(
        puzzle = id.0,
        kind,
        clear_time = verdict.clear_time,
        gold = verdict.is_gold,
        "puzzle completed"
    );

    if verdict.is_gold {
        let balance = state.bank.add(1);
        state.push_event(GameEvent::tokens_changed(at, balance));
        state.push_event(GameEvent::sabotage_offered(at, SABOTAGE_MENU.to_vec()));
    }
    Some(verdict)
}

/// Fail the active attempt: `Active -> Failed`, registry released.
///
/// Returns whether a transition happened.
pub fn fail_puzzle(state: &mut RaceState, id: PuzzleId, reason: FailReason) -> bool {
    let at = state.elapsed;
    let Some(instance) = state.puzzles.get_mut(&id) else {
        return false;
    };
    if !instance.lifecycle.is_active() {
        debug!(puzzle = id.0, "fail ignored");
        return false;
    }

    instance.lifecycle.mark_failed();
    instance.variant.on_fail();

    state.registry.release(id);
    state.push_event(GameEvent::puzzle_failed(at, id, reason));
    info!(puzzle = id.0, ?reason, "puzzle failed");
    true
}

/// Return a puzzle to `Idle` from any state, clock refilled. Replaying a
/// finished puzzle is reset followed by start.
///
/// Returns whether the puzzle exists.
pub fn reset_puzzle(state: &mut RaceState, id: PuzzleId) -> bool {
    let at = state.elapsed;
    let Some(instance) = state.puzzles.get_mut(&id) else {
        return false;
    };

    instance.lifecycle.idle();
    instance.variant.on_reset();

    state.registry.release(id);
    state.push_event(GameEvent::puzzle_reset(at, id));
    debug!(puzzle = id.0, "puzzle reset");
    true
}

/// Burn `seconds` off an active puzzle's clock, floor-clamped at zero.
/// Returns the seconds actually removed.
///
/// Deliberately never fails the puzzle, even when it drains the clock to
/// zero: the next frame advance observes the exhausted clock and fails it
/// through the normal path, so timer resolution keeps priority over any
/// sabotage landing in the same frame.
pub fn drain_time(state: &mut RaceState, id: PuzzleId, seconds: f64) -> f64 {
    if seconds <= 0.0 {
        return 0.0;
    }
    let at = state.elapsed;
    let Some(instance) = state.puzzles.get_mut(&id) else {
        return 0.0;
    };
    if !instance.lifecycle.is_active() {
        debug!(puzzle = id.0, "time drain ignored; puzzle not active");
        return 0.0;
    }

    let drained = instance.lifecycle.drain_clock(seconds);
    let remaining = instance.lifecycle.remaining();
    if drained > 0.0 {
        state.push_event(GameEvent::time_drained(at, id, drained, remaining));
        debug!(puzzle = id.0, drained, remaining, "clock drained");
    }
    drained
}

/// Feed one discrete player action to a puzzle's variant and apply the
/// lifecycle consequence it judges. Actions on a puzzle that is not
/// active are swallowed; late grabs are normal.
pub fn apply_action(state: &mut RaceState, id: PuzzleId, action: &PlayerAction) -> ActionOutcome {
    let Some(instance) = state.puzzles.get_mut(&id) else {
        return ActionOutcome::Ignored;
    };
    if !instance.lifecycle.is_active() {
        return ActionOutcome::Ignored;
    }

    let outcome = instance.variant.handle_action(action);
    match outcome {
        ActionOutcome::Solved => {
            complete_puzzle(state, id);
        }
        ActionOutcome::Failed => {
            fail_puzzle(state, id, FailReason::MistakeLimit);
        }
        ActionOutcome::Progress | ActionOutcome::Mistake | ActionOutcome::Ignored => {}
    }
    outcome
}

/// Advance the active puzzle's countdown by one frame delta: emit the
/// per-second notice and resolve expiry into failure. Returns the puzzle
/// that timed out, if any.
pub(crate) fn tick_active(state: &mut RaceState, dt: f64) -> Option<PuzzleId> {
    let id = state.registry.current()?;
    let at = state.elapsed;
    let instance = state.puzzles.get_mut(&id)?;
    if !instance.lifecycle.is_active() {
        return None;
    }

    let step = instance.lifecycle.advance_clock(dt);
    instance.variant.on_tick(dt);

    if step.notice && !step.expired {
        state.push_event(GameEvent::time_remaining(at, id, step.remaining));
    }
    if step.expired {
        fail_puzzle(state, id, FailReason::TimedOut);
        return Some(id);
    }
    None
}

// =============================================================================
// TESTS
// =============================================================================
