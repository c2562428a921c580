//! Race State Definitions
//!
//! All state types for a single race session: identifiers, timing
//! configuration, the per-puzzle lifecycle machine, and the session owner
//! every operation mutates. Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::clock::{ClockStep, CountdownClock, EffectTimer};
use crate::game::bank::TokenBank;
use crate::game::events::GameEvent;
use crate::game::registry::ActivePuzzleRegistry;
use crate::game::variant::PuzzleVariant;

// =============================================================================
// RACE ID
// =============================================================================

/// Unique race session identifier (UUID as bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub struct RaceId(pub [u8; 16]);

impl RaceId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Create a fresh random id.
    pub fn random() -> Self {
        Self(*uuid::Uuid::new_v4().as_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s)
            .ok()
            .map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

// =============================================================================
// PUZZLE ID
// =============================================================================

/// Ordinal identifier of a puzzle slot within one race.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub struct PuzzleId(pub u32);

// =============================================================================
// PUZZLE STATE
// =============================================================================

/// Lifecycle state of a single puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum PuzzleState {
    /// Built, clock idle, not yet racing
    #[default]
    Idle,
    /// Clock running, accepting play
    Active,
    /// Solved before the clock ran out
    Completed,
    /// Clock exhausted or mistake tolerance spent
    Failed,
}

impl PuzzleState {
    /// Terminal states only leave through a reset.
    pub fn is_terminal(self) -> bool {
        matches!(self, PuzzleState::Completed | PuzzleState::Failed)
    }
}

/// Why a puzzle failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    /// The countdown reached zero
    TimedOut,
    /// The variant's mistake tolerance ran out
    MistakeLimit,
    /// The host forced the failure (scene-side condition)
    Forced,
}

// =============================================================================
// PUZZLE CONFIG
// =============================================================================

/// Errors from puzzle configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Time limit was zero, negative, or not finite.
    #[error("time limit must be positive and finite, got {0}")]
    InvalidTimeLimit(f64),

    /// Gold fraction fell outside `(0, 1]`.
    #[error("gold fraction must be in (0, 1], got {0}")]
    InvalidGoldFraction(f64),
}

/// Per-puzzle timing configuration, fixed for the life of the puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Seconds the player gets for one attempt
    pub time_limit: f64,

    /// Fraction of the limit that must remain for a gold completion
    pub gold_fraction: f64,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            time_limit: crate::DEFAULT_TIME_LIMIT,
            gold_fraction: crate::DEFAULT_GOLD_FRACTION,
        }
    }
}

impl PuzzleConfig {
    /// Validated constructor.
    pub fn new(time_limit: f64, gold_fraction: f64) -> Result<Self, ConfigError> {
        if !time_limit.is_finite() || time_limit <= 0.0 {
            return Err(ConfigError::InvalidTimeLimit(time_limit));
        }
        if !(gold_fraction > 0.0 && gold_fraction <= 1.0) {
            return Err(ConfigError::InvalidGoldFraction(gold_fraction));
        }
        Ok(Self {
            time_limit,
            gold_fraction,
        })
    }
}

// =============================================================================
// PUZZLE LIFECYCLE
// =============================================================================

/// The per-puzzle state machine: lifecycle state plus countdown clock.
///
/// Fields stay private so `Active` with a full clock, `Completed` with a
/// frozen clock, and the other state/clock pairings can only be produced
/// by the transitions in [`crate::game::lifecycle`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PuzzleLifecycle {
    config: PuzzleConfig,
    state: PuzzleState,
    clock: CountdownClock,
}

impl PuzzleLifecycle {
    /// Fresh idle lifecycle for `config`.
    pub fn new(config: PuzzleConfig) -> Self {
        Self {
            config,
            state: PuzzleState::Idle,
            clock: CountdownClock::new(config.time_limit),
        }
    }

    /// Timing configuration.
    pub fn config(&self) -> PuzzleConfig {
        self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PuzzleState {
        self.state
    }

    /// Seconds left on the clock.
    pub fn remaining(&self) -> f64 {
        self.clock.remaining()
    }

    /// Seconds one attempt gets.
    pub fn time_limit(&self) -> f64 {
        self.config.time_limit
    }

    /// Whether the puzzle is racing right now.
    pub fn is_active(&self) -> bool {
        self.state == PuzzleState::Active
    }

    /// `Idle -> Active` with a full clock.
    pub(crate) fn arm(&mut self) {
        self.state = PuzzleState::Active;
        self.clock.rearm();
    }

    /// `Active -> Completed`, clock frozen where it stands.
    pub(crate) fn mark_completed(&mut self) {
        self.state = PuzzleState::Completed;
    }

    /// `Active -> Failed`, clock frozen where it stands.
    pub(crate) fn mark_failed(&mut self) {
        self.state = PuzzleState::Failed;
    }

    /// `any -> Idle` with a full clock.
    pub(crate) fn idle(&mut self) {
        self.state = PuzzleState::Idle;
        self.clock.rearm();
    }

    /// Advance the countdown by one frame delta.
    pub(crate) fn advance_clock(&mut self, dt: f64) -> ClockStep {
        self.clock.advance(dt)
    }

    /// Burn seconds off the countdown.
    pub(crate) fn drain_clock(&mut self, seconds: f64) -> f64 {
        self.clock.drain(seconds)
    }
}

// =============================================================================
// PUZZLE INSTANCE
// =============================================================================

/// One puzzle slot: the shared lifecycle machine composed with the variant
/// strategy that gives it rules.
#[derive(Debug)]
pub struct PuzzleInstance {
    /// Slot id within the race
    pub id: PuzzleId,

    /// Lifecycle state machine and countdown
    pub lifecycle: PuzzleLifecycle,

    /// Puzzle-kind behavior
    pub variant: Box<dyn PuzzleVariant>,

    /// Attempts started
    pub attempts: u32,

    /// Gold completions earned
    pub golds: u32,

    /// Fastest clear in seconds
    pub best_clear: Option<f64>,
}

impl PuzzleInstance {
    /// Create an idle instance.
    pub fn new(id: PuzzleId, config: PuzzleConfig, variant: Box<dyn PuzzleVariant>) -> Self {
        Self {
            id,
            lifecycle: PuzzleLifecycle::new(config),
            variant,
            attempts: 0,
            golds: 0,
            best_clear: None,
        }
    }
}

// =============================================================================
// RACE STATE
// =============================================================================

/// Complete state of one race session.
///
/// This is the injectable context every operation takes as `&mut RaceState`;
/// tests build as many independent sessions as they like and nothing in the
/// crate assumes there is only one.
#[derive(Debug)]
pub struct RaceState {
    /// Race identifier
    pub race_id: RaceId,

    /// Simulated seconds since the session began
    pub elapsed: f64,

    /// All puzzle slots (BTreeMap for deterministic iteration)
    pub puzzles: BTreeMap<PuzzleId, PuzzleInstance>,

    /// The single active-puzzle back-reference
    pub registry: ActivePuzzleRegistry,

    /// Sabotage token balance
    pub bank: TokenBank,

    /// Environment fog effect clock
    pub fog: EffectTimer,

    /// Generic decoy effect clock (fake clues that hit no puzzle)
    pub decoys: EffectTimer,

    /// Next slot id (monotonic counter)
    next_puzzle_id: u32,

    /// Events generated since the last drain
    pending_events: Vec<GameEvent>,
}

impl RaceState {
    /// Create an empty race session.
    pub fn new(race_id: RaceId) -> Self {
        Self {
            race_id,
            elapsed: 0.0,
            puzzles: BTreeMap::new(),
            registry: ActivePuzzleRegistry::new(),
            bank: TokenBank::new(),
            fog: EffectTimer::default(),
            decoys: EffectTimer::default(),
            next_puzzle_id: 0,
            pending_events: Vec::new(),
        }
    }

    /// Add a puzzle slot. Ids are handed out in insertion order.
    pub fn add_puzzle(
        &mut self,
        config: PuzzleConfig,
        variant: Box<dyn PuzzleVariant>,
    ) -> PuzzleId {
        let id = PuzzleId(self.next_puzzle_id);
        self.next_puzzle_id += 1;
        self.puzzles.insert(id, PuzzleInstance::new(id, config, variant));
        id
    }

    /// Get a puzzle by id.
    pub fn puzzle(&self, id: PuzzleId) -> Option<&PuzzleInstance> {
        self.puzzles.get(&id)
    }

    /// Get a puzzle mutably by id.
    pub fn puzzle_mut(&mut self, id: PuzzleId) -> Option<&mut PuzzleInstance> {
        self.puzzles.get_mut(&id)
    }

    /// The puzzle currently accepting play, if any.
    pub fn active_puzzle(&self) -> Option<&PuzzleInstance> {
        self.registry.current().and_then(|id| self.puzzles.get(&id))
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a race event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Build the end-of-race summary from current state.
    pub fn summary(&self) -> RaceSummary {
        let puzzles: Vec<PuzzleResult> = self
            .puzzles
            .values()
            .map(|instance| PuzzleResult {
                id: instance.id,
                kind: instance.variant.name().to_string(),
                state: instance.lifecycle.state(),
                attempts: instance.attempts,
                golds: instance.golds,
                best_clear: instance.best_clear,
            })
            .collect();

        let completed = puzzles
            .iter()
            .filter(|p| p.state == PuzzleState::Completed)
            .count() as u32;

        RaceSummary {
            race_id: self.race_id,
            elapsed: self.elapsed,
            completed,
            tokens_earned: self.bank.lifetime_earned(),
            tokens_spent: self.bank.lifetime_spent(),
            tokens_left: self.bank.balance(),
            puzzles,
        }
    }
}

// =============================================================================
// RACE SUMMARY
// =============================================================================

/// End-of-race report for one puzzle slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleResult {
    /// Slot id
    pub id: PuzzleId,

    /// Variant kind label
    pub kind: String,

    /// State the puzzle ended the race in
    pub state: PuzzleState,

    /// Attempts started
    pub attempts: u32,

    /// Gold completions
    pub golds: u32,

    /// Fastest clear in seconds
    pub best_clear: Option<f64>,
}

/// Aggregated race report for leaderboards and the end screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceSummary {
    /// Race identifier
    pub race_id: RaceId,

    /// Session seconds the race ran
    pub elapsed: f64,

    /// Puzzles completed
    pub completed: u32,

    /// Tokens earned over the race
    pub tokens_earned: u32,

    /// Tokens spent over the race
    pub tokens_spent: u32,

    /// Tokens left unspent
    pub tokens_left: u32,

    /// Per-puzzle results in slot order
    pub puzzles: Vec<PuzzleResult>,
}

// =============================================================================
// TESTS
// =============================================================================
