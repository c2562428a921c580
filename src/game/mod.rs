//! Game Logic Module
//!
//! All race session code. Single-threaded and synchronous: every
//! operation runs to completion inside the caller's frame.
//!
//! ## Module Structure
//!
//! - `state`: Race state, puzzle lifecycle machine, configs, summary
//! - `lifecycle`: Start/complete/fail/reset/drain/action operations
//! - `gold`: Gold-time evaluation policy
//! - `bank`: Sabotage token bank
//! - `registry`: Active-puzzle back-reference
//! - `sabotage`: Fog, time-drain, and fake-clue dispatch
//! - `variant`: Puzzle-kind strategies behind the lifecycle
//! - `events`: Polled notification stream for the host layers
//! - `env`: Scene environment boundary
//! - `tick`: Frame advance

pub mod bank;
pub mod env;
pub mod events;
pub mod gold;
pub mod lifecycle;
pub mod registry;
pub mod sabotage;
pub mod state;
pub mod tick;
pub mod variant;

// Re-export key types
pub use events::{GameEvent, GameEventData};
pub use state::{PuzzleConfig, PuzzleId, PuzzleState, RaceId, RaceState};
pub use tick::TickReport;
pub use variant::{PlayerAction, PuzzleVariant};
