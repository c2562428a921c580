//! # Vault Dash Core
//!
//! Headset-free game core for Vault Dash, a room-scale puzzle-racing game:
//! per-puzzle lifecycle machines, the gold-time sabotage economy, and
//! constrained sequence generation, with the scene, UI, and input layers
//! kept behind narrow boundaries so the whole crate runs in plain tests.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     VAULT DASH CORE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── clock.rs    - Countdown + effect timers (f64 seconds)   │
//! │  └── sequence.rs - Exclusion-draw sequence generation        │
//! │                                                              │
//! │  game/           - Session logic                             │
//! │  ├── state.rs    - Ids, configs, lifecycle machine, owner    │
//! │  ├── lifecycle.rs- Start/complete/fail/reset/drain/action    │
//! │  ├── gold.rs     - Gold-time policy                          │
//! │  ├── bank.rs     - Sabotage token bank                       │
//! │  ├── registry.rs - Active-puzzle back-reference              │
//! │  ├── sabotage.rs - Fog / time-drain / fake-clue dispatch     │
//! │  ├── variant.rs  - Puzzle-kind strategies                    │
//! │  ├── events.rs   - Polled notification stream                │
//! │  ├── env.rs      - Scene environment boundary                │
//! │  └── tick.rs     - Frame advance                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Scheduling Model
//!
//! Everything here is single-threaded and cooperative: the host calls
//! [`advance`] once per frame and the session operations in between, and
//! every call runs to completion before the next one starts. Within a
//! frame the active puzzle's countdown resolves first, so a timer that
//! ran out always beats sabotage aimed at the same puzzle in the same
//! frame.
//!
//! Sequence targets come from the operating system's CSPRNG in
//! production; every generator is generic over [`rand::Rng`] so tests
//! drive them with seeded streams instead.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::clock::{CountdownClock, EffectTimer};
pub use crate::core::sequence::{SequenceError, SequenceSpec};
pub use game::bank::TokenBank;
pub use game::env::{Environment, NullEnvironment};
pub use game::events::{GameEvent, GameEventData};
pub use game::gold::GoldVerdict;
pub use game::lifecycle::{
    apply_action, complete_puzzle, drain_time, fail_puzzle, reset_puzzle, start_puzzle,
    StartOutcome,
};
pub use game::registry::ActivePuzzleRegistry;
pub use game::sabotage::{
    available_effects, dispatch, SabotageConfig, SabotageKind, SabotageOutcome, SABOTAGE_COST,
    SABOTAGE_MENU,
};
pub use game::state::{
    ConfigError, FailReason, PuzzleConfig, PuzzleId, PuzzleState, RaceId, RaceState, RaceSummary,
};
pub use game::tick::{advance, TickReport};
pub use game::variant::{
    ActionOutcome, CombinationPuzzle, NullVariant, PlayerAction, PuzzleVariant, SocketPuzzle,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default seconds a puzzle attempt gets.
pub const DEFAULT_TIME_LIMIT: f64 = 60.0;

/// Default fraction of the limit that must remain for a gold completion.
pub const DEFAULT_GOLD_FRACTION: f64 = 0.5;
