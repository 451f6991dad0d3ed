use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::NotificationHistory;
use crate::config::SchedulerConfig;
use crate::events::Event;
use crate::timer::{ExecutionState, Phase, WorkoutEngine};

/// Emitted when a tick moves the engine into a different phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub from: Phase,
    pub to: Phase,
    pub exercise_name: Option<String>,
    pub next_exercise_name: Option<String>,
    pub current_round: u32,
    pub total_rounds: u32,
}

impl PhaseChange {
    fn capture(from: Phase, state: &ExecutionState) -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
            from,
            to: state.phase(),
            exercise_name: state.current_exercise().map(|e| e.name.clone()),
            next_exercise_name: state.next_exercise().map(|e| e.name.clone()),
            current_round: state.current_round,
            total_rounds: state.total_rounds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    Advanced {
        event: Option<Event>,
        notification: Option<PhaseChange>,
    },
    /// Fired too soon after the previous tick.
    Ignored { since_last_ms: u64 },
    /// Engine is not running; the tick source should stop.
    Inactive,
}

impl TickOutcome {
    pub fn notification(&self) -> Option<&PhaseChange> {
        match self {
            TickOutcome::Advanced { notification, .. } => notification.as_ref(),
            _ => None,
        }
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self, TickOutcome::Advanced { .. })
    }
}

/// Drives a [`WorkoutEngine`] one tick at a time.
///
/// Holds no timer: `fire` is called by whatever owns the clock (the tokio
/// [`TickDriver`](super::TickDriver) in production, a loop in tests and
/// simulations) with the instant the tick actually fired.
#[derive(Debug)]
pub struct TickScheduler {
    min_interval: Duration,
    last_fire: Option<Instant>,
    history: NotificationHistory,
    tick_count: u64,
    ignored_count: u64,
}

impl TickScheduler {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            min_interval: Duration::from_millis(config.min_tick_interval_ms),
            last_fire: None,
            history: NotificationHistory::new(config.history_limit),
            tick_count: 0,
            ignored_count: 0,
        }
    }

    pub fn history(&self) -> &NotificationHistory {
        &self.history
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn ignored_count(&self) -> u64 {
        self.ignored_count
    }

    /// Forget the previous fire time so the next fire is never treated as
    /// early. Call when the tick source restarts.
    pub fn reset_clock(&mut self) {
        self.last_fire = None;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Timer entry point. Fires arriving less than the minimum interval
    /// after the previous one are dropped with a warning.
    pub fn fire(&mut self, engine: &mut WorkoutEngine, now: Instant) -> TickOutcome {
        if !engine.is_running() {
            return TickOutcome::Inactive;
        }
        if let Some(last) = self.last_fire {
            let since = now.saturating_duration_since(last);
            if since < self.min_interval {
                self.ignored_count += 1;
                let since_last_ms = since.as_millis() as u64;
                tracing::warn!(since_last_ms, "tick fired too soon, ignoring");
                return TickOutcome::Ignored { since_last_ms };
            }
        }
        self.last_fire = Some(now);
        self.advance(engine)
    }

    /// Tick the engine once, with no drift guard.
    pub fn advance(&mut self, engine: &mut WorkoutEngine) -> TickOutcome {
        let before = engine.phase();
        let event = match engine.tick() {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(error = %e, "tick skipped");
                return TickOutcome::Inactive;
            }
        };
        self.tick_count += 1;

        let notification = if engine.phase() != before {
            let change = PhaseChange::capture(before, engine.state());
            tracing::debug!(from = %change.from, to = %change.to, round = change.current_round, "phase change");
            self.history.push(change.clone());
            Some(change)
        } else {
            None
        };
        TickOutcome::Advanced {
            event,
            notification,
        }
    }
}
