//! Environment Boundary
//!
//! The narrow handle the scene layer gives the core for environment-wide
//! sabotage effects. The core only toggles flags through it; how fog or
//! decoy props actually render is scene business and never leaks in here.

/// Scene-side operations the sabotage effects need.
pub trait Environment {
    /// Turn the environment fog on or off.
    fn set_fog_active(&mut self, active: bool);

    /// Put up the generic, non-puzzle-scoped decoy props.
    fn spawn_decoys(&mut self);

    /// Take the generic decoy props down.
    fn clear_decoys(&mut self);
}

/// Environment that ignores every call. For hosts without a scene wired
/// up, and for tests that only care about core state.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEnvironment;

impl Environment for NullEnvironment {
    fn set_fog_active(&mut self, _active: bool) {}
    fn spawn_decoys(&mut self) {}
    fn clear_decoys(&mut self) {}
}
