use clap::Args;
use std::path::Path;
use std::time::{Duration, Instant};
use workoutroom_core::{Config, TickOutcome, WorkoutSession};

use super::load_catalog;

#[derive(Args)]
pub struct SimulateArgs {
    /// Plan ID to simulate
    plan: String,
    /// Override the preparation countdown in seconds
    #[arg(long)]
    prep: Option<u32>,
    /// Also print a snapshot after every tick
    #[arg(long)]
    snapshots: bool,
}

/// Drives a session with synthetic one-second instants and prints one JSON
/// object per line: phase changes, cues, and the final event.
pub fn run(args: SimulateArgs, catalog: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(catalog)?;
    let config = Config::load_or_default();
    let mut session = WorkoutSession::new(catalog, &config);

    let mut plan = session
        .catalog()
        .plan(&args.plan)
        .cloned()
        .ok_or_else(|| format!("plan not found: {}", args.plan))?;
    if let Some(prep) = args.prep {
        plan.timing.prep_seconds = Some(prep);
    }
    session.load_custom_plan(plan)?;

    let started = session.start()?;
    emit("event", &started)?;
    emit_new_cue(&session, 0)?;

    let period = Duration::from_millis(config.scheduler.tick_interval_ms);
    let base = Instant::now();
    let mut fire = 1u32;
    while session.is_running() {
        let fired_before = session.feedback().fired_count();
        let outcome = session.tick_at(base + period * fire);
        fire += 1;

        if let TickOutcome::Advanced {
            event,
            notification,
        } = &outcome
        {
            if let Some(change) = notification {
                emit("phase_change", change)?;
            }
            emit_new_cue(&session, fired_before)?;
            if let Some(event) = event {
                emit("event", event)?;
            }
        }
        if args.snapshots {
            emit("snapshot", &session.snapshot())?;
        }
    }
    Ok(())
}

fn emit_new_cue(
    session: &WorkoutSession,
    fired_before: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    if session.feedback().fired_count() > fired_before {
        if let Some(cue) = session.latest_cue() {
            emit("cue", cue)?;
        }
    }
    Ok(())
}

fn emit<T: serde::Serialize>(kind: &str, data: &T) -> Result<(), Box<dyn std::error::Error>> {
    let line = serde_json::json!({ "kind": kind, "data": data });
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}
