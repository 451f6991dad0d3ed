use clap::Args;
use std::path::Path;
use std::time::Duration;
use workoutroom_core::{Config, Phase, SessionRunner};

use super::load_catalog;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Args)]
pub struct RunArgs {
    /// Plan ID to run
    plan: String,
    /// Override the preparation countdown in seconds
    #[arg(long)]
    prep: Option<u32>,
}

/// Runs a plan on the real-time tick task, printing phase changes and cues
/// as JSON lines until the workout completes.
pub fn run(args: RunArgs, catalog: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(catalog)?;
    let config = Config::load_or_default();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    rt.block_on(async move {
        let mut runner = SessionRunner::from_config(catalog, &config);
        runner.with(|s| -> Result<(), Box<dyn std::error::Error>> {
            let mut plan = s
                .catalog()
                .plan(&args.plan)
                .cloned()
                .ok_or_else(|| format!("plan not found: {}", args.plan))?;
            if let Some(prep) = args.prep {
                plan.timing.prep_seconds = Some(prep);
            }
            s.load_custom_plan(plan)?;
            Ok(())
        })??;
        runner.start()?;

        let mut last_change: Option<String> = None;
        let mut seen_cues = 0u64;
        loop {
            tokio::time::sleep(POLL_INTERVAL).await;
            let (lines, phase) = runner.with(|s| {
                let mut lines = Vec::new();
                let changes: Vec<_> = s.notifications().iter().collect();
                let start = last_change
                    .as_ref()
                    .and_then(|id| changes.iter().position(|c| &c.id.to_string() == id))
                    .map_or(0, |i| i + 1);
                for change in &changes[start..] {
                    lines.push(serde_json::json!({ "kind": "phase_change", "data": change }));
                }
                if let Some(latest) = changes.last() {
                    last_change = Some(latest.id.to_string());
                }
                if s.feedback().fired_count() > seen_cues {
                    if let Some(cue) = s.latest_cue() {
                        lines.push(serde_json::json!({ "kind": "cue", "data": cue }));
                    }
                    seen_cues = s.feedback().fired_count();
                }
                (lines, s.phase())
            })?;
            for line in lines {
                println!("{}", serde_json::to_string(&line)?);
            }

            if phase == Phase::Completed || !runner.is_ticking() {
                let snapshot = runner.snapshot()?;
                let line = serde_json::json!({ "kind": "snapshot", "data": snapshot });
                println!("{}", serde_json::to_string(&line)?);
                break;
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
