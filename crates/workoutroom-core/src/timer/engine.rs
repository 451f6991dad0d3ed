//! Workout execution engine.
//!
//! A tick-driven state machine. It owns no timer and no threads: the caller
//! (normally the tick scheduler) invokes `tick()` once per second, and UI
//! commands call the other methods. Every method either applies a complete
//! transition or returns a [`CommandError`] with the state untouched.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -start-> Preparing -0-> Working -0-> Resting -0-> Working ... -> Completed
//!               (any running phase) <-pause/resume-> Paused
//! ```
//!
//! The last exercise of the last round completes the workout; the last
//! exercise of any other round wraps to exercise 0 of the next round;
//! otherwise the engine moves to the next exercise in the same round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::{ActivePhase, Phase, RunState};
use crate::catalog::{Exercise, Timing, WorkoutPlan};
use crate::error::CommandError;
use crate::events::{Event, WorkoutSummary};

pub const DEFAULT_PREP_SECONDS: u32 = 10;

/// A plan bound to the engine, with its exercises resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedPlan {
    pub plan: WorkoutPlan,
    pub exercises: Vec<Exercise>,
    pub prep_seconds: u32,
}

/// Snapshot of a session. Only the engine mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionState {
    pub plan: Option<LoadedPlan>,
    /// 0-based.
    pub current_exercise_index: usize,
    /// 1-based.
    pub current_round: u32,
    pub total_rounds: u32,
    pub time_remaining: u32,
    /// Length of the current phase; denominator for progress display.
    pub current_phase_duration: u32,
    pub total_elapsed_seconds: u64,
    pub run_state: RunState,
    pub completed_exercise_count: u32,
    pub total_exercise_count: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self {
            plan: None,
            current_exercise_index: 0,
            current_round: 1,
            total_rounds: 0,
            time_remaining: 0,
            current_phase_duration: 0,
            total_elapsed_seconds: 0,
            run_state: RunState::Idle,
            completed_exercise_count: 0,
            total_exercise_count: 0,
            started_at: None,
            ended_at: None,
        }
    }
}

impl ExecutionState {
    pub fn phase(&self) -> Phase {
        self.run_state.phase()
    }

    pub fn is_active(&self) -> bool {
        self.run_state.is_active()
    }

    pub fn is_paused(&self) -> bool {
        self.run_state.is_paused()
    }

    pub fn has_plan(&self) -> bool {
        self.plan.is_some()
    }

    pub fn exercises(&self) -> &[Exercise] {
        self.plan.as_ref().map(|p| p.exercises.as_slice()).unwrap_or(&[])
    }

    pub fn timing(&self) -> Option<Timing> {
        self.plan.as_ref().map(|p| p.plan.timing)
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.exercises().get(self.current_exercise_index)
    }

    pub fn is_last_exercise_in_round(&self) -> bool {
        let n = self.exercises().len();
        n > 0 && self.current_exercise_index + 1 == n
    }

    pub fn is_final_round(&self) -> bool {
        self.current_round >= self.total_rounds
    }

    /// The last exercise slot of the workout.
    pub fn is_final_exercise(&self) -> bool {
        self.is_last_exercise_in_round() && self.is_final_round()
    }

    /// Exercise that follows the current one: none after the final slot,
    /// exercise 0 after the last exercise of a round, otherwise the next
    /// exercise in the round.
    pub fn next_exercise(&self) -> Option<&Exercise> {
        if self.is_final_exercise() {
            None
        } else if self.is_last_exercise_in_round() {
            self.exercises().first()
        } else {
            self.exercises().get(self.current_exercise_index + 1)
        }
    }

    fn phase_duration(&self, phase: ActivePhase) -> u32 {
        let Some(loaded) = &self.plan else {
            return 0;
        };
        match phase {
            ActivePhase::Preparing => loaded.prep_seconds,
            ActivePhase::Working => loaded.plan.timing.work_seconds,
            ActivePhase::Resting => loaded.plan.timing.rest_seconds,
        }
    }
}

/// Commands accepted by [`WorkoutEngine::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Start,
    Pause,
    Resume,
    Stop,
    NextExercise,
    Tick,
    Reset,
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "pause" => Ok(Command::Pause),
            "resume" => Ok(Command::Resume),
            "stop" => Ok(Command::Stop),
            "next" | "next_exercise" | "skip" => Ok(Command::NextExercise),
            "tick" => Ok(Command::Tick),
            "reset" => Ok(Command::Reset),
            other => {
                tracing::warn!(command = other, "unknown workout command");
                Err(CommandError::UnknownCommand(other.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutEngine {
    state: ExecutionState,
    default_prep_seconds: u32,
}

impl Default for WorkoutEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PREP_SECONDS)
    }
}

impl WorkoutEngine {
    /// `default_prep_seconds` applies to plans that carry no prep time.
    pub fn new(default_prep_seconds: u32) -> Self {
        Self {
            state: ExecutionState::default(),
            default_prep_seconds,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn run_state(&self) -> RunState {
        self.state.run_state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_active()
    }

    pub fn plan(&self) -> Option<&WorkoutPlan> {
        self.state.plan.as_ref().map(|p| &p.plan)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn dispatch(&mut self, command: Command) -> Result<Option<Event>, CommandError> {
        match command {
            Command::Start => self.start().map(Some),
            Command::Pause => self.pause().map(Some),
            Command::Resume => self.resume().map(Some),
            Command::Stop => self.stop().map(Some),
            Command::NextExercise => self.next_exercise().map(Some),
            Command::Tick => self.tick(),
            Command::Reset => self.reset().map(Some),
        }
    }

    /// Bind a plan whose exercises are already resolved. Counters reset and
    /// the engine returns to Idle.
    pub fn load_plan(
        &mut self,
        plan: WorkoutPlan,
        exercises: Vec<Exercise>,
    ) -> Result<Event, CommandError> {
        if self.state.run_state.in_progress() {
            return Err(CommandError::SessionInProgress);
        }
        plan.check_shape().map_err(CommandError::InvalidPlan)?;
        if exercises.len() != plan.exercises.len()
            || exercises.iter().zip(&plan.exercises).any(|(e, id)| &e.id != id)
        {
            return Err(CommandError::InvalidPlan(
                "resolved exercises do not match the plan".into(),
            ));
        }

        let prep_seconds = plan.timing.prep_seconds.unwrap_or(self.default_prep_seconds);
        let event = Event::PlanLoaded {
            plan_id: plan.id.clone(),
            exercise_count: exercises.len(),
            total_rounds: plan.timing.rounds,
            at: Utc::now(),
        };
        self.state = ExecutionState {
            total_rounds: plan.timing.rounds,
            total_exercise_count: plan.total_exercise_count(),
            plan: Some(LoadedPlan {
                plan,
                exercises,
                prep_seconds,
            }),
            ..ExecutionState::default()
        };
        self.show_first_countdown();
        tracing::debug!(event = event.name(), "plan loaded");
        Ok(event)
    }

    pub fn start(&mut self) -> Result<Event, CommandError> {
        let Some(loaded) = &self.state.plan else {
            return Err(CommandError::NoPlanLoaded);
        };
        match self.state.run_state {
            RunState::Running(_) => return Err(CommandError::AlreadyActive),
            RunState::Paused(_) => return Err(CommandError::SessionPaused),
            RunState::Completed => return Err(CommandError::AlreadyCompleted),
            RunState::Idle => {}
        }
        let plan_id = loaded.plan.id.clone();
        let first = if loaded.prep_seconds > 0 {
            ActivePhase::Preparing
        } else {
            ActivePhase::Working
        };

        self.reset_counters();
        self.state.started_at = Some(Utc::now());
        self.state.run_state = RunState::Running(first);
        self.enter(first);
        tracing::info!(plan = %plan_id, phase = %Phase::from(first), "workout started");
        Ok(Event::WorkoutStarted {
            plan_id,
            phase: first.into(),
            duration_secs: self.state.time_remaining,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Result<Event, CommandError> {
        let RunState::Running(phase) = self.state.run_state else {
            return Err(CommandError::NotActive);
        };
        self.state.run_state = RunState::Paused(phase);
        tracing::debug!(phase = %Phase::from(phase), remaining = self.state.time_remaining, "paused");
        Ok(Event::WorkoutPaused {
            phase,
            time_remaining: self.state.time_remaining,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Result<Event, CommandError> {
        let RunState::Paused(phase) = self.state.run_state else {
            return Err(CommandError::NotPaused);
        };
        self.state.run_state = RunState::Running(phase);
        tracing::debug!(remaining = self.state.time_remaining, "resumed");
        Ok(Event::WorkoutResumed {
            phase,
            time_remaining: self.state.time_remaining,
            at: Utc::now(),
        })
    }

    /// Back to Idle with counters cleared. The plan stays loaded.
    pub fn stop(&mut self) -> Result<Event, CommandError> {
        let event = Event::WorkoutStopped {
            elapsed_secs: self.state.total_elapsed_seconds,
            completed_exercises: self.state.completed_exercise_count,
            at: Utc::now(),
        };
        self.reset_counters();
        self.state.run_state = RunState::Idle;
        self.show_first_countdown();
        tracing::debug!("workout stopped");
        Ok(event)
    }

    /// Back to Idle with no plan.
    pub fn reset(&mut self) -> Result<Event, CommandError> {
        self.state = ExecutionState::default();
        tracing::debug!("engine reset");
        Ok(Event::WorkoutReset { at: Utc::now() })
    }

    /// Skip straight to the next exercise's work phase.
    ///
    /// Resting is bypassed. The current exercise is credited unless it was
    /// already credited when its rest began. A paused session stays paused.
    pub fn next_exercise(&mut self) -> Result<Event, CommandError> {
        if self.state.plan.is_none() {
            return Err(CommandError::NoPlanLoaded);
        }
        let phase = match self.state.run_state {
            RunState::Running(p) | RunState::Paused(p) => p,
            RunState::Completed => return Err(CommandError::AlreadyCompleted),
            RunState::Idle => return Err(CommandError::NotActive),
        };

        if phase != ActivePhase::Resting {
            self.credit_exercise();
        }
        let from_index = self.state.current_exercise_index;
        let from_round = self.state.current_round;
        if let Some(done) = self.advance_slot() {
            return Ok(done);
        }
        tracing::debug!(
            from_index,
            to_index = self.state.current_exercise_index,
            round = self.state.current_round,
            "exercise skipped"
        );
        Ok(Event::ExerciseSkipped {
            from_index,
            from_round,
            to_index: self.state.current_exercise_index,
            to_round: self.state.current_round,
            at: Utc::now(),
        })
    }

    /// One second of workout time. Returns an event when a countdown
    /// reaches zero.
    pub fn tick(&mut self) -> Result<Option<Event>, CommandError> {
        if self.state.plan.is_none() {
            return Err(CommandError::NoPlanLoaded);
        }
        let RunState::Running(phase) = self.state.run_state else {
            return Err(CommandError::NotActive);
        };

        self.state.total_elapsed_seconds += 1;
        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        if self.state.time_remaining > 0 {
            return Ok(None);
        }
        Ok(Some(self.finish_phase(phase)))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish_phase(&mut self, phase: ActivePhase) -> Event {
        match phase {
            ActivePhase::Preparing => {
                self.enter(ActivePhase::Working);
                self.phase_changed(Phase::Preparing)
            }
            ActivePhase::Working => {
                self.credit_exercise();
                if self.state.phase_duration(ActivePhase::Resting) > 0 {
                    self.enter(ActivePhase::Resting);
                    return self.phase_changed(Phase::Working);
                }
                match self.advance_slot() {
                    Some(done) => done,
                    None => self.phase_changed(Phase::Working),
                }
            }
            ActivePhase::Resting => match self.advance_slot() {
                Some(done) => done,
                None => self.phase_changed(Phase::Resting),
            },
        }
    }

    /// Move to the next exercise slot, or complete after the final one.
    /// Returns the completion event when the workout ends.
    fn advance_slot(&mut self) -> Option<Event> {
        if self.state.is_final_exercise() {
            return Some(self.complete());
        }
        if self.state.is_last_exercise_in_round() {
            self.state.current_exercise_index = 0;
            self.state.current_round += 1;
        } else {
            self.state.current_exercise_index += 1;
        }
        self.enter(ActivePhase::Working);
        None
    }

    fn complete(&mut self) -> Event {
        self.state.run_state = RunState::Completed;
        self.state.time_remaining = 0;
        self.state.current_phase_duration = 0;
        self.state.completed_exercise_count = self.state.total_exercise_count;
        let now = Utc::now();
        self.state.ended_at = Some(now);

        let (plan_id, plan_name) = self
            .state
            .plan
            .as_ref()
            .map(|p| (p.plan.id.clone(), p.plan.name.clone()))
            .unwrap_or_default();
        let summary = WorkoutSummary {
            plan_id,
            plan_name,
            total_elapsed_seconds: self.state.total_elapsed_seconds,
            completed_exercises: self.state.completed_exercise_count,
            total_rounds: self.state.total_rounds,
            started_at: self.state.started_at,
            ended_at: self.state.ended_at,
        };
        tracing::info!(
            plan = %summary.plan_id,
            elapsed = summary.total_elapsed_seconds,
            "workout completed"
        );
        Event::WorkoutCompleted { summary, at: now }
    }

    /// Load a countdown. Keeps a paused session paused.
    fn enter(&mut self, phase: ActivePhase) {
        let duration = self.state.phase_duration(phase);
        self.state.time_remaining = duration;
        self.state.current_phase_duration = duration;
        self.state.run_state = match self.state.run_state {
            RunState::Paused(_) => RunState::Paused(phase),
            _ => RunState::Running(phase),
        };
    }

    fn phase_changed(&self, from: Phase) -> Event {
        tracing::debug!(
            %from,
            to = %self.state.phase(),
            exercise = self.state.current_exercise_index,
            round = self.state.current_round,
            "phase changed"
        );
        Event::PhaseChanged {
            from,
            to: self.state.phase(),
            exercise_index: self.state.current_exercise_index,
            round: self.state.current_round,
            duration_secs: self.state.current_phase_duration,
            at: Utc::now(),
        }
    }

    fn credit_exercise(&mut self) {
        self.state.completed_exercise_count = self
            .state
            .completed_exercise_count
            .saturating_add(1)
            .min(self.state.total_exercise_count);
    }

    fn reset_counters(&mut self) {
        self.state.current_exercise_index = 0;
        self.state.current_round = 1;
        self.state.total_elapsed_seconds = 0;
        self.state.completed_exercise_count = 0;
        self.state.started_at = None;
        self.state.ended_at = None;
    }

    /// Idle display: the countdown the session will open with.
    fn show_first_countdown(&mut self) {
        let duration = match self.state.phase_duration(ActivePhase::Preparing) {
            0 => self.state.phase_duration(ActivePhase::Working),
            prep => prep,
        };
        self.state.time_remaining = duration;
        self.state.current_phase_duration = duration;
    }
}
