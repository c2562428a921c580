//! Sabotage Effects
//!
//! Token-gated disruptions one racer buys against another's run: fog over
//! the whole environment, time burned off the active puzzle's clock, or
//! decoy clues planted near it. Every effect costs one token, debited
//! before the effect resolves. A failed debit cancels the effect; a drain
//! that finds no active puzzle burns the token anyway.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::game::bank::TokenBank;
use crate::game::env::Environment;
use crate::game::events::GameEvent;
use crate::game::lifecycle;
use crate::game::state::{PuzzleId, RaceState};

/// Cost of every sabotage effect, in tokens.
pub const SABOTAGE_COST: u32 = 1;

/// The fixed candidate set offered after a gold completion.
pub const SABOTAGE_MENU: [SabotageKind; 3] = [
    SabotageKind::Fog,
    SabotageKind::TimeDrain,
    SabotageKind::FakeClues,
];

/// Kinds of sabotage effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SabotageKind {
    /// Cloud the environment
    Fog = 0,
    /// Burn time off the active puzzle's clock
    TimeDrain = 1,
    /// Plant plausible but wrong clues
    FakeClues = 2,
}

/// Default magnitudes for dispatched effects.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SabotageConfig {
    /// Seconds of fog added per purchase
    pub fog_duration: f64,

    /// Seconds burned off the target clock per purchase
    pub drain_seconds: f64,

    /// Seconds the decoy clues stay up per purchase
    pub decoy_duration: f64,
}

impl Default for SabotageConfig {
    fn default() -> Self {
        Self {
            fog_duration: 10.0,
            drain_seconds: 5.0,
            decoy_duration: 8.0,
        }
    }
}

/// How one sabotage purchase resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SabotageOutcome {
    /// Token debited, effect landed. `target` names the puzzle hit, or is
    /// `None` for environment-wide effects.
    Applied {
        target: Option<PuzzleId>,
    },
    /// Token debited, but no active puzzle was there to hit. Not refunded.
    Wasted,
    /// Balance was short; nothing changed.
    InsufficientTokens,
    /// The request itself was malformed (non-positive magnitude); nothing
    /// was charged.
    Rejected,
}

impl SabotageOutcome {
    /// Whether the effect actually landed on something.
    pub fn landed(&self) -> bool {
        matches!(self, SabotageOutcome::Applied { .. })
    }
}

/// Effects the selection surface may present right now. Empty while the
/// bank cannot cover a single purchase.
pub fn available_effects(bank: &TokenBank) -> &'static [SabotageKind] {
    if bank.balance() >= SABOTAGE_COST {
        &SABOTAGE_MENU
    } else {
        &[]
    }
}

/// Apply `kind` with its configured default magnitude.
pub fn dispatch(
    state: &mut RaceState,
    env: &mut dyn Environment,
    kind: SabotageKind,
    config: &SabotageConfig,
) -> SabotageOutcome {
    match kind {
        SabotageKind::Fog => apply_fog(state, env, config.fog_duration),
        SabotageKind::TimeDrain => apply_time_drain(state, config.drain_seconds),
        SabotageKind::FakeClues => apply_fake_clues(state, env, config.decoy_duration),
    }
}

/// Cloak the environment in fog for `duration` seconds. Re-application
/// while fog is still up extends the remaining time; it never restarts.
pub fn apply_fog(
    state: &mut RaceState,
    env: &mut dyn Environment,
    duration: f64,
) -> SabotageOutcome {
    if duration <= 0.0 {
        return SabotageOutcome::Rejected;
    }
    if !state.bank.spend(SABOTAGE_COST) {
        debug!("fog refused; insufficient tokens");
        return SabotageOutcome::InsufficientTokens;
    }

    let at = state.elapsed;
    let balance = state.bank.balance();
    state.push_event(GameEvent::tokens_changed(at, balance));

    if state.fog.extend(duration) {
        env.set_fog_active(true);
        state.push_event(GameEvent::fog_started(at, duration));
    } else {
        state.push_event(GameEvent::fog_extended(at, duration, state.fog.remaining()));
    }
    state.push_event(GameEvent::sabotage_applied(at, SabotageKind::Fog, None));
    info!(duration, remaining = state.fog.remaining(), "fog applied");
    SabotageOutcome::Applied { target: None }
}

/// Burn `seconds` off whatever puzzle is active right now. With no active
/// puzzle the token still burns; sabotage against an empty room wastes the
/// purchase and mutates nothing else.
pub fn apply_time_drain(state: &mut RaceState, seconds: f64) -> SabotageOutcome {
    if seconds <= 0.0 {
        return SabotageOutcome::Rejected;
    }
    if !state.bank.spend(SABOTAGE_COST) {
        debug!("time drain refused; insufficient tokens");
        return SabotageOutcome::InsufficientTokens;
    }

    let at = state.elapsed;
    let balance = state.bank.balance();
    state.push_event(GameEvent::tokens_changed(at, balance));

    let Some(target) = state.registry.current() else {
        debug!("time drain found no active puzzle; token wasted");
        state.push_event(GameEvent::sabotage_wasted(at, SabotageKind::TimeDrain));
        return SabotageOutcome::Wasted;
    };

    lifecycle::drain_time(state, target, seconds);
    state.push_event(GameEvent::sabotage_applied(
        at,
        SabotageKind::TimeDrain,
        Some(target),
    ));
    info!(target = target.0, seconds, "time drain applied");
    SabotageOutcome::Applied {
        target: Some(target),
    }
}

/// Plant decoy clues. With an active puzzle the variant decides what a
/// wrong clue looks like; with none, generic decoys go up in the
/// environment and clear themselves after `duration`.
pub fn apply_fake_clues(
    state: &mut RaceState,
    env: &mut dyn Environment,
    duration: f64,
) -> SabotageOutcome {
    if duration <= 0.0 {
        return SabotageOutcome::Rejected;
    }
    if !state.bank.spend(SABOTAGE_COST) {
        debug!("fake clues refused; insufficient tokens");
        return SabotageOutcome::InsufficientTokens;
    }

    let at = state.elapsed;
    let balance = state.bank.balance();
    state.push_event(GameEvent::tokens_changed(at, balance));

    if let Some(target) = state.registry.current() {
        if let Some(instance) = state.puzzles.get_mut(&target) {
            instance.variant.spawn_decoys(duration);
        }
        state.push_event(GameEvent::decoys_spawned(at, Some(target), duration));
        state.push_event(GameEvent::sabotage_applied(
            at,
            SabotageKind::FakeClues,
            Some(target),
        ));
        info!(target = target.0, duration, "fake clues planted on active puzzle");
        return SabotageOutcome::Applied {
            target: Some(target),
        };
    }

    if state.decoys.extend(duration) {
        env.spawn_decoys();
    }
    state.push_event(GameEvent::decoys_spawned(at, None, duration));
    state.push_event(GameEvent::sabotage_applied(at, SabotageKind::FakeClues, None));
    info!(duration, "generic decoys planted");
    SabotageOutcome::Applied { target: None }
}

// =============================================================================
// TESTS
// =============================================================================
