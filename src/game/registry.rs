//! Active Puzzle Registry
//!
//! The single shared back-reference naming the puzzle currently accepting
//! play. Sabotage resolves its target through this slot instead of
//! searching the session, and the one-active-at-a-time rule is enforced
//! against it. The registry holds an id, never the puzzle itself, and it
//! is a plain value handed around by the session, not a global.

use serde::{Deserialize, Serialize};

use crate::game::state::PuzzleId;

/// Slot tracking the at-most-one active puzzle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePuzzleRegistry {
    current: Option<PuzzleId>,
}

impl ActivePuzzleRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the active puzzle, if any.
    pub fn current(&self) -> Option<PuzzleId> {
        self.current
    }

    /// Whether no puzzle is active.
    pub fn is_vacant(&self) -> bool {
        self.current.is_none()
    }

    /// Point the registry at `id`. Lifecycle transitions are the only
    /// writers; they refuse to start a puzzle while another holds the slot.
    pub(crate) fn activate(&mut self, id: PuzzleId) {
        self.current = Some(id);
    }

    /// Clear the slot, but only if `id` still holds it.
    pub(crate) fn release(&mut self, id: PuzzleId) {
        if self.current == Some(id) {
            self.current = None;
        }
    }
}
