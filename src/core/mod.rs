//! Core primitives.
//!
//! Time and randomness building blocks with no knowledge of puzzles or
//! race sessions.

pub mod clock;
pub mod sequence;

// Re-export core types
pub use clock::{ClockStep, CountdownClock, EffectTimer};
pub use sequence::{draw_excluding, SequenceError, SequenceSpec};
