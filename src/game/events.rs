//! Race Events
//!
//! Notifications generated by the session operations for the host layers
//! (timer UI, sabotage selection surface, scene effects). Events queue on
//! the session in the order they happened and are drained once per frame.

use serde::{Deserialize, Serialize};

use crate::game::sabotage::SabotageKind;
use crate::game::state::{FailReason, PuzzleId};

/// Race event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Puzzle armed and its countdown began
    PuzzleStarted {
        puzzle: PuzzleId,
        time_limit: f64,
    },

    /// Once-per-second countdown notice for the timer display
    TimeRemaining {
        puzzle: PuzzleId,
        remaining: f64,
    },

    /// Sabotage burned time off the clock
    TimeDrained {
        puzzle: PuzzleId,
        drained: f64,
        remaining: f64,
    },

    /// Puzzle solved
    PuzzleCompleted {
        puzzle: PuzzleId,
        clear_time: f64,
        gold: bool,
    },

    /// Puzzle failed
    PuzzleFailed {
        puzzle: PuzzleId,
        reason: FailReason,
    },

    /// Puzzle returned to idle
    PuzzleReset {
        puzzle: PuzzleId,
    },

    /// Token balance changed
    TokensChanged {
        balance: u32,
    },

    /// Sabotage selection surface should open with these options
    SabotageOffered {
        options: Vec<SabotageKind>,
    },

    /// Sabotage effect landed
    SabotageApplied {
        kind: SabotageKind,
        target: Option<PuzzleId>,
    },

    /// Sabotage token burned with nothing to hit
    SabotageWasted {
        kind: SabotageKind,
    },

    /// Environment fog switched on
    FogStarted {
        duration: f64,
    },

    /// Running fog got more time
    FogExtended {
        added: f64,
        remaining: f64,
    },

    /// Environment fog switched off
    FogCleared,

    /// Decoy clues went up, on a puzzle or in the environment
    DecoysSpawned {
        target: Option<PuzzleId>,
        duration: f64,
    },

    /// Generic environment decoys came down
    DecoysCleared,
}

/// A race event with its session timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Session seconds when the event occurred
    pub at: f64,

    /// Puzzle involved, if any
    pub puzzle: Option<PuzzleId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(at: f64, data: GameEventData) -> Self {
        let puzzle = match &data {
            GameEventData::PuzzleStarted { puzzle, .. } => Some(*puzzle),
            GameEventData::TimeRemaining { puzzle, .. } => Some(*puzzle),
            GameEventData::TimeDrained { puzzle, .. } => Some(*puzzle),
            GameEventData::PuzzleCompleted { puzzle, .. } => Some(*puzzle),
            GameEventData::PuzzleFailed { puzzle, .. } => Some(*puzzle),
            GameEventData::PuzzleReset { puzzle } => Some(*puzzle),
            GameEventData::SabotageApplied { target, .. } => *target,
            GameEventData::DecoysSpawned { target, .. } => *target,
            _ => None,
        };

        Self { at, puzzle, data }
    }

    /// Create puzzle started event.
    pub fn puzzle_started(at: f64, puzzle: PuzzleId, time_limit: f64) -> Self {
        Self::new(at, GameEventData::PuzzleStarted { puzzle, time_limit })
    }

    /// Create countdown notice event.
    pub fn time_remaining(at: f64, puzzle: PuzzleId, remaining: f64) -> Self {
        Self::new(at, GameEventData::TimeRemaining { puzzle, remaining })
    }

    /// Create time drained event.
    pub fn time_drained(at: f64, puzzle: PuzzleId, drained: f64, remaining: f64) -> Self {
        Self::new(
            at,
            GameEventData::TimeDrained {
                puzzle,
                drained,
                remaining,
            },
        )
    }

    /// Create puzzle completed event.
    pub fn puzzle_completed(at: f64, puzzle: PuzzleId, clear_time: f64, gold: bool) -> Self {
        Self::new(
            at,
            GameEventData::PuzzleCompleted {
                puzzle,
                clear_time,
                gold,
            },
        )
    }

    /// Create puzzle failed event.
    pub fn puzzle_failed(at: f64, puzzle: PuzzleId, reason: FailReason) -> Self {
        Self::new(at, GameEventData::PuzzleFailed { puzzle, reason })
    }

    /// Create puzzle reset event.
    pub fn puzzle_reset(at: f64, puzzle: PuzzleId) -> Self {
        Self::new(at, GameEventData::PuzzleReset { puzzle })
    }

    /// Create token balance event.
    pub fn tokens_changed(at: f64, balance: u32) -> Self {
        Self::new(at, GameEventData::TokensChanged { balance })
    }

    /// Create sabotage offer event.
    pub fn sabotage_offered(at: f64, options: Vec<SabotageKind>) -> Self {
        Self::new(at, GameEventData::SabotageOffered { options })
    }

    /// Create sabotage applied event.
    pub fn sabotage_applied(at: f64, kind: SabotageKind, target: Option<PuzzleId>) -> Self {
        Self::new(at, GameEventData::SabotageApplied { kind, target })
    }

    /// Create sabotage wasted event.
    pub fn sabotage_wasted(at: f64, kind: SabotageKind) -> Self {
        Self::new(at, GameEventData::SabotageWasted { kind })
    }

    /// Create fog started event.
    pub fn fog_started(at: f64, duration: f64) -> Self {
        Self::new(at, GameEventData::FogStarted { duration })
    }

    /// Create fog extended event.
    pub fn fog_extended(at: f64, added: f64, remaining: f64) -> Self {
        Self::new(at, GameEventData::FogExtended { added, remaining })
    }

    /// Create fog cleared event.
    pub fn fog_cleared(at: f64) -> Self {
        Self::new(at, GameEventData::FogCleared)
    }

    /// Create decoys spawned event.
    pub fn decoys_spawned(at: f64, target: Option<PuzzleId>, duration: f64) -> Self {
        Self::new(at, GameEventData::DecoysSpawned { target, duration })
    }

    /// Create decoys cleared event.
    pub fn decoys_cleared(at: f64) -> Self {
        Self::new(at, GameEventData::DecoysCleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_infers_puzzle_from_data() {
        let event = GameEvent::time_remaining(4.0, PuzzleId(2), 56.0);
        assert_eq!(event.puzzle, Some(PuzzleId(2)));

        let event = GameEvent::sabotage_applied(4.0, SabotageKind::TimeDrain, Some(PuzzleId(1)));
        assert_eq!(event.puzzle, Some(PuzzleId(1)));

        let event = GameEvent::fog_started(4.0, 10.0);
        assert_eq!(event.puzzle, None);
    }

    #[test]
    fn test_event_serializes() {
        let event = GameEvent::puzzle_completed(12.5, PuzzleId(0), 29.0, true);
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
