//! Puzzle Variant Strategies
//!
//! Each puzzle kind plugs its rules into the shared lifecycle through
//! [`PuzzleVariant`]: lifecycle hooks called at most once per attempt, a
//! decoy hook for the fake-clue sabotage, a per-frame hook for
//! variant-local timers, and the discrete action handler the interaction
//! layer feeds. Variants never drive lifecycle state themselves; they
//! judge actions and the session operations apply the consequences.

use std::any::Any;

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::core::sequence::{self, SequenceError, SequenceSpec};

// =============================================================================
// PLAYER ACTIONS
// =============================================================================

/// Discrete player interaction, already translated from raw motion input
/// by the interaction layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Turn dial `dial` to show `symbol`
    SetDial {
        dial: u8,
        symbol: u16,
    },

    /// Commit the current dial positions
    SubmitCombination,

    /// Seat the plug stamped `symbol` into `socket`
    SeatPlug {
        socket: u8,
        symbol: u16,
    },
}

/// How a variant judged one action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// Legal move, puzzle not finished yet
    Progress,
    /// The action solved the puzzle
    Solved,
    /// Wrong move; the puzzle continues
    Mistake,
    /// Wrong move that spent the variant's whole mistake tolerance
    Failed,
    /// The action does not apply to this variant
    Ignored,
}

// =============================================================================
// VARIANT TRAIT
// =============================================================================

/// Behavior sockets a concrete puzzle kind plugs into the lifecycle.
pub trait PuzzleVariant: std::fmt::Debug {
    /// Short kind label for logs and summaries.
    fn name(&self) -> &'static str;

    /// A fresh attempt is starting.
    fn on_start(&mut self) {}

    /// The attempt finished successfully.
    fn on_complete(&mut self) {}

    /// The attempt failed.
    fn on_fail(&mut self) {}

    /// The puzzle returned to idle.
    fn on_reset(&mut self) {}

    /// Frame delta while this puzzle is active, for variant-local timers.
    fn on_tick(&mut self, dt: f64) {
        let _ = dt;
    }

    /// The fake-clue sabotage landed on this puzzle. Kinds with nothing to
    /// fake simply absorb the call.
    fn spawn_decoys(&mut self, duration: f64) {
        let _ = duration;
    }

    /// Judge one discrete player action.
    fn handle_action(&mut self, action: &PlayerAction) -> ActionOutcome {
        let _ = action;
        ActionOutcome::Ignored
    }

    /// Concrete-type access for hosts that render variant internals.
    fn as_any(&self) -> &dyn Any;
}

/// How a variant obtains its target each attempt.
#[derive(Clone, Copy, Debug)]
enum TargetSource {
    /// Redrawn from the OS CSPRNG on every start
    Secure(SequenceSpec),
    /// Construction-time target kept for the whole session
    Fixed,
}

// =============================================================================
// NULL VARIANT
// =============================================================================

/// Variant for puzzles whose solve detection lives entirely in the scene
/// layer (physical assembly checks and the like); the host drives the
/// lifecycle directly and this variant just answers the hooks.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullVariant;

impl PuzzleVariant for NullVariant {
    fn name(&self) -> &'static str {
        "null"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// COMBINATION PUZZLE
// =============================================================================

/// Decoy combination planted by the fake-clue sabotage.
#[derive(Clone, Debug, PartialEq)]
pub struct DecoyCombination {
    /// The wrong combination on display.
    pub symbols: Vec<u16>,
    /// Seconds of display time left.
    pub remaining: f64,
}

/// Dial-combination puzzle: match the dials to a generated target
/// sequence, with a bounded number of wrong submissions per attempt.
#[derive(Debug)]
pub struct CombinationPuzzle {
    source: TargetSource,
    domain: u16,
    target: Vec<u16>,
    dials: Vec<u16>,
    mistakes: u32,
    max_mistakes: u32,
    decoy: Option<DecoyCombination>,
}

impl CombinationPuzzle {
    /// Wrong submissions tolerated per attempt by default.
    pub const DEFAULT_MAX_MISTAKES: u32 = 3;

    /// Puzzle with a fresh secure target drawn on every start.
    pub fn new(spec: SequenceSpec) -> Result<Self, SequenceError> {
        let target = sequence::generate_secure(spec)?;
        Ok(Self {
            source: TargetSource::Secure(spec),
            domain: spec.domain(),
            dials: vec![0; target.len()],
            target,
            mistakes: 0,
            max_mistakes: Self::DEFAULT_MAX_MISTAKES,
            decoy: None,
        })
    }

    /// Puzzle with a fixed target, for scripted rooms and tests.
    pub fn with_target(domain: u16, target: Vec<u16>) -> Self {
        Self {
            source: TargetSource::Fixed,
            domain,
            dials: vec![0; target.len()],
            target,
            mistakes: 0,
            max_mistakes: Self::DEFAULT_MAX_MISTAKES,
            decoy: None,
        }
    }

    /// Override the mistake tolerance.
    pub fn with_mistake_limit(mut self, limit: u32) -> Self {
        self.max_mistakes = limit;
        self
    }

    /// The combination that opens the lock.
    pub fn target(&self) -> &[u16] {
        &self.target
    }

    /// Current dial positions.
    pub fn dials(&self) -> &[u16] {
        &self.dials
    }

    /// Wrong submissions so far this attempt.
    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    /// The decoy combination currently on display, if any.
    pub fn decoy(&self) -> Option<&DecoyCombination> {
        self.decoy.as_ref()
    }

    /// Decoy combination: the real target with its leading symbol swapped
    /// for a legal different one, so it reads plausible but never opens
    /// the lock.
    fn make_decoy(&self) -> Vec<u16> {
        let mut symbols = self.target.clone();
        let mut forbidden = vec![symbols[0]];
        if self.domain >= 3 && symbols.len() > 1 {
            forbidden.push(symbols[1]);
        }
        if let Ok(swap) = sequence::draw_excluding(&mut OsRng, self.domain, &forbidden) {
            symbols[0] = swap;
        }
        symbols
    }
}

impl PuzzleVariant for CombinationPuzzle {
    fn name(&self) -> &'static str {
        "combination"
    }

    fn on_start(&mut self) {
        if let TargetSource::Secure(spec) = &self.source {
            // Every attempt gets a fresh target; knowledge carried out of a
            // failed attempt goes cold.
            if let Ok(target) = sequence::generate(&mut OsRng, *spec) {
                self.target = target;
            }
        }
        self.dials = vec![0; self.target.len()];
        self.mistakes = 0;
        self.decoy = None;
    }

    fn on_complete(&mut self) {
        self.decoy = None;
    }

    fn on_fail(&mut self) {
        self.decoy = None;
    }

    fn on_reset(&mut self) {
        self.dials = vec![0; self.target.len()];
        self.mistakes = 0;
        self.decoy = None;
    }

    fn on_tick(&mut self, dt: f64) {
        if let Some(decoy) = &mut self.decoy {
            decoy.remaining -= dt;
            if decoy.remaining <= 0.0 {
                self.decoy = None;
            }
        }
    }

    fn spawn_decoys(&mut self, duration: f64) {
        if duration <= 0.0 {
            return;
        }
        if self.decoy.is_none() {
            let symbols = self.make_decoy();
            self.decoy = Some(DecoyCombination {
                symbols,
                remaining: 0.0,
            });
        }
        // Re-application extends the display; it never swaps the decoy.
        if let Some(decoy) = self.decoy.as_mut() {
            decoy.remaining += duration;
        }
    }

    fn handle_action(&mut self, action: &PlayerAction) -> ActionOutcome {
        match *action {
            PlayerAction::SetDial { dial, symbol } => {
                if symbol >= self.domain {
                    return ActionOutcome::Ignored;
                }
                match self.dials.get_mut(dial as usize) {
                    Some(slot) => {
                        *slot = symbol;
                        ActionOutcome::Progress
                    }
                    None => ActionOutcome::Ignored,
                }
            }
            PlayerAction::SubmitCombination => {
                if self.dials == self.target {
                    ActionOutcome::Solved
                } else {
                    self.mistakes += 1;
                    if self.mistakes >= self.max_mistakes {
                        ActionOutcome::Failed
                    } else {
                        ActionOutcome::Mistake
                    }
                }
            }
            PlayerAction::SeatPlug { .. } => ActionOutcome::Ignored,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// SOCKET PUZZLE
// =============================================================================

/// Socket-match puzzle: seat each stamped plug into the socket bearing the
/// same symbol. Required symbols are pairwise distinct so no two sockets
/// ever share a stamp. Wrong plugs bounce off; the clock is the only
/// pressure.
#[derive(Debug)]
pub struct SocketPuzzle {
    source: TargetSource,
    domain: u16,
    required: Vec<u16>,
    seated: Vec<Option<u16>>,
}

impl SocketPuzzle {
    /// Puzzle with `sockets` fresh secure stamps drawn on every start.
    pub fn new(domain: u16, sockets: usize) -> Result<Self, SequenceError> {
        let spec = SequenceSpec::new(domain, sockets)?;
        let required = sequence::distinct_targets_secure(domain, sockets)?;
        Ok(Self {
            source: TargetSource::Secure(spec),
            domain,
            seated: vec![None; required.len()],
            required,
        })
    }

    /// Puzzle with fixed stamps, for scripted rooms and tests.
    pub fn with_required(domain: u16, required: Vec<u16>) -> Self {
        Self {
            source: TargetSource::Fixed,
            domain,
            seated: vec![None; required.len()],
            required,
        }
    }

    /// Symbol required by each socket.
    pub fn required(&self) -> &[u16] {
        &self.required
    }

    /// Plug seated in each socket, if any.
    pub fn seated(&self) -> &[Option<u16>] {
        &self.seated
    }

    fn all_seated(&self) -> bool {
        self.seated.iter().all(|s| s.is_some())
    }
}

impl PuzzleVariant for SocketPuzzle {
    fn name(&self) -> &'static str {
        "socket"
    }

    fn on_start(&mut self) {
        if let TargetSource::Secure(spec) = &self.source {
            let domains = vec![spec.domain(); spec.length()];
            if let Ok(required) = sequence::distinct_targets(&mut OsRng, &domains) {
                self.required = required;
            }
        }
        self.seated = vec![None; self.required.len()];
    }

    fn on_reset(&mut self) {
        self.seated = vec![None; self.required.len()];
    }

    fn handle_action(&mut self, action: &PlayerAction) -> ActionOutcome {
        match *action {
            PlayerAction::SeatPlug { socket, symbol } => {
                if symbol >= self.domain {
                    return ActionOutcome::Ignored;
                }
                let idx = socket as usize;
                let Some(&required) = self.required.get(idx) else {
                    return ActionOutcome::Ignored;
                };
                if self.seated[idx].is_some() {
                    return ActionOutcome::Ignored;
                }
                if symbol == required {
                    self.seated[idx] = Some(symbol);
                    if self.all_seated() {
                        ActionOutcome::Solved
                    } else {
                        ActionOutcome::Progress
                    }
                } else {
                    ActionOutcome::Mistake
                }
            }
            _ => ActionOutcome::Ignored,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
