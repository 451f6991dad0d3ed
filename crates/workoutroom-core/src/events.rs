use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{ActivePhase, Phase};

/// Every state change of the workout engine produces an Event.
/// The UI polls for events; the feedback layer reacts to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PlanLoaded {
        plan_id: String,
        exercise_count: usize,
        total_rounds: u32,
        at: DateTime<Utc>,
    },
    WorkoutStarted {
        plan_id: String,
        phase: Phase,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    WorkoutPaused {
        phase: ActivePhase,
        time_remaining: u32,
        at: DateTime<Utc>,
    },
    WorkoutResumed {
        phase: ActivePhase,
        time_remaining: u32,
        at: DateTime<Utc>,
    },
    WorkoutStopped {
        elapsed_secs: u64,
        completed_exercises: u32,
        at: DateTime<Utc>,
    },
    WorkoutReset {
        at: DateTime<Utc>,
    },
    /// Manual skip to the next exercise; the rest phase is not entered.
    ExerciseSkipped {
        from_index: usize,
        from_round: u32,
        to_index: usize,
        to_round: u32,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero and the engine moved on.
    PhaseChanged {
        from: Phase,
        to: Phase,
        exercise_index: usize,
        round: u32,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    WorkoutCompleted {
        summary: WorkoutSummary,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::PlanLoaded { .. } => "plan_loaded",
            Event::WorkoutStarted { .. } => "workout_started",
            Event::WorkoutPaused { .. } => "workout_paused",
            Event::WorkoutResumed { .. } => "workout_resumed",
            Event::WorkoutStopped { .. } => "workout_stopped",
            Event::WorkoutReset { .. } => "workout_reset",
            Event::ExerciseSkipped { .. } => "exercise_skipped",
            Event::PhaseChanged { .. } => "phase_changed",
            Event::WorkoutCompleted { .. } => "workout_completed",
        }
    }
}

/// Totals for a finished workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub plan_id: String,
    pub plan_name: String,
    pub total_elapsed_seconds: u64,
    pub completed_exercises: u32,
    pub total_rounds: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}
