//! Vault Dash Demo
//!
//! Drives a scripted race against the core crate: three puzzle slots, a
//! gold completion, sabotage purchases, a timeout, and the end-of-race
//! summary printed as JSON. The scene layer is a console stub so the
//! whole run is observable from the log.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use vault_dash::{
    advance, apply_action, available_effects, complete_puzzle, dispatch, reset_puzzle,
    start_puzzle, CombinationPuzzle, Environment, GameEvent, GameEventData, PlayerAction,
    PuzzleConfig, RaceId, RaceState, RaceSummary, SabotageConfig, SabotageKind, SequenceSpec,
    SocketPuzzle, DEFAULT_GOLD_FRACTION, VERSION,
};

/// Demo frame delta (4 Hz keeps the log readable).
const FRAME_DT: f64 = 0.25;

/// Scene stub that narrates every call the core makes.
#[derive(Debug, Default)]
struct ConsoleEnvironment;

impl Environment for ConsoleEnvironment {
    fn set_fog_active(&mut self, active: bool) {
        info!(active, "scene: fog toggled");
    }

    fn spawn_decoys(&mut self) {
        info!("scene: generic decoys up");
    }

    fn clear_decoys(&mut self) {
        info!("scene: generic decoys down");
    }
}

/// Wrapper the demo prints at the end.
#[derive(Serialize)]
struct RaceReport {
    generated_at: DateTime<Utc>,
    summary: RaceSummary,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Vault Dash Core v{}", VERSION);
    info!("Gold threshold: {}x of each time limit", DEFAULT_GOLD_FRACTION);

    demo_race()
}

/// Run the scripted demo race.
fn demo_race() -> Result<()> {
    info!("=== Starting Demo Race ===");

    let mut state = RaceState::new(RaceId::random());
    let mut env = ConsoleEnvironment;
    let sabotage = SabotageConfig::default();

    info!("Race ID: {}", state.race_id.to_uuid_string());
    info!("Race tag: {}", hex::encode(&state.race_id.0[..4]));

    // Three puzzle slots: a dial lock, a plug board, and a scene-driven
    // final vault door.
    let combo = state.add_puzzle(
        PuzzleConfig::new(45.0, 0.5)?,
        Box::new(CombinationPuzzle::new(SequenceSpec::new(10, 4)?)?),
    );
    let sockets = state.add_puzzle(
        PuzzleConfig::new(60.0, 0.5)?,
        Box::new(SocketPuzzle::new(6, 3)?),
    );
    let vault_door = state.add_puzzle(PuzzleConfig::new(20.0, 0.5)?, Box::new(NullDoor));

    // --- Dial lock: a fast, gold clear ------------------------------------
    start_puzzle(&mut state, combo);
    run_seconds(&mut state, &mut env, 3.0);

    let target = state
        .puzzle(combo)
        .context("combination slot missing")?
        .variant
        .as_any()
        .downcast_ref::<CombinationPuzzle>()
        .context("slot 0 is not a combination puzzle")?
        .target()
        .to_vec();
    info!(?target, "scene read the dial target off the lock");

    for (dial, &symbol) in target.iter().enumerate() {
        apply_action(
            &mut state,
            combo,
            &PlayerAction::SetDial {
                dial: dial as u8,
                symbol,
            },
        );
    }
    apply_action(&mut state, combo, &PlayerAction::SubmitCombination);
    run_seconds(&mut state, &mut env, 0.5);

    // Spend the gold token on fog, then show a refused purchase.
    info!(options = ?available_effects(&state.bank), "sabotage menu");
    dispatch(&mut state, &mut env, SabotageKind::Fog, &sabotage);
    let refused = dispatch(&mut state, &mut env, SabotageKind::TimeDrain, &sabotage);
    info!(?refused, "second purchase with an empty bank");
    run_seconds(&mut state, &mut env, 1.0);

    // --- Plug board: one wrong plug, then a clean solve --------------------
    start_puzzle(&mut state, sockets);
    run_seconds(&mut state, &mut env, 2.0);

    let required = state
        .puzzle(sockets)
        .context("socket slot missing")?
        .variant
        .as_any()
        .downcast_ref::<SocketPuzzle>()
        .context("slot 1 is not a socket puzzle")?
        .required()
        .to_vec();

    let wrong = (required[0] + 1) % 6;
    let bounced = apply_action(
        &mut state,
        sockets,
        &PlayerAction::SeatPlug {
            socket: 0,
            symbol: wrong,
        },
    );
    info!(?bounced, "wrong plug bounced off socket 0");

    for (socket, &symbol) in required.iter().enumerate() {
        run_seconds(&mut state, &mut env, 1.0);
        apply_action(
            &mut state,
            sockets,
            &PlayerAction::SeatPlug {
                socket: socket as u8,
                symbol,
            },
        );
    }
    run_seconds(&mut state, &mut env, 0.5);

    // --- Vault door: drained, timed out, then replayed for gold ------------
    start_puzzle(&mut state, vault_door);
    run_seconds(&mut state, &mut env, 1.0);
    dispatch(&mut state, &mut env, SabotageKind::TimeDrain, &sabotage);
    run_seconds(&mut state, &mut env, 16.0);

    reset_puzzle(&mut state, vault_door);
    start_puzzle(&mut state, vault_door);
    run_seconds(&mut state, &mut env, 1.0);
    complete_puzzle(&mut state, vault_door);
    run_seconds(&mut state, &mut env, 0.5);

    // Last token goes on decoys against an empty room; they go up in the
    // environment and clear themselves.
    dispatch(&mut state, &mut env, SabotageKind::FakeClues, &sabotage);
    run_seconds(&mut state, &mut env, 9.0);

    // --- Report -------------------------------------------------------------
    info!("=== Race Results ===");
    let report = RaceReport {
        generated_at: Utc::now(),
        summary: state.summary(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Advance the session in demo-sized frames, narrating what comes out.
fn run_seconds(state: &mut RaceState, env: &mut ConsoleEnvironment, seconds: f64) {
    let steps = (seconds / FRAME_DT).round() as u32;
    for _ in 0..steps {
        let report = advance(state, env, FRAME_DT);
        log_events(&report.events);
    }
}

/// Log the interesting events; countdown notices stay quiet.
fn log_events(events: &[GameEvent]) {
    for event in events {
        match &event.data {
            GameEventData::PuzzleStarted { puzzle, time_limit } => {
                info!(puzzle = puzzle.0, time_limit, "puzzle started");
            }
            GameEventData::PuzzleCompleted {
                puzzle,
                clear_time,
                gold,
            } => {
                info!(puzzle = puzzle.0, clear_time, gold, "puzzle completed");
            }
            GameEventData::PuzzleFailed { puzzle, reason } => {
                info!(puzzle = puzzle.0, ?reason, "puzzle failed");
            }
            GameEventData::TimeDrained {
                puzzle, remaining, ..
            } => {
                info!(puzzle = puzzle.0, remaining, "clock drained");
            }
            GameEventData::TokensChanged { balance } => {
                info!(balance, "token balance changed");
            }
            GameEventData::SabotageOffered { options } => {
                info!(?options, "sabotage offered");
            }
            GameEventData::FogCleared => {
                info!("fog lifted");
            }
            GameEventData::DecoysCleared => {
                info!("decoys cleared");
            }
            _ => {}
        }
    }
}

/// The vault door's solve detection lives in the scene, so its variant is
/// inert and the script completes it directly.
#[derive(Debug, Default)]
struct NullDoor;

impl vault_dash::PuzzleVariant for NullDoor {
    fn name(&self) -> &'static str {
        "vault-door"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
