//! Workout session facade.
//!
//! [`WorkoutSession`] wires the engine to its observers: every command or
//! tick goes through the engine, the scheduler records phase changes, and
//! the feedback dispatcher gets a chance to fire whenever the (phase,
//! exercise, round) position moves. [`SessionRunner`] adds the real-time
//! tick source on top.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::catalog::{Catalog, Exercise, WorkoutPlan};
use crate::config::Config;
use crate::context::{overall_progress, PhaseContext};
use crate::error::CommandError;
use crate::events::Event;
use crate::feedback::{DispatchOutcome, FeedbackCue, FeedbackDispatcher};
use crate::scheduler::{NotificationHistory, TickDriver, TickOutcome, TickScheduler};
use crate::timer::{ExecutionState, Phase, RunState, WorkoutEngine};

/// Format seconds as `MM:SS`. Minutes are not capped at 59.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Presentation hints for the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDisplay {
    pub label: String,
    /// Colour token, resolved by the renderer.
    pub color: String,
    pub glyph: String,
}

impl PhaseDisplay {
    fn for_state(state: &ExecutionState) -> Self {
        let exercise = state.current_exercise();
        let (label, color, glyph) = match state.phase() {
            Phase::Idle => ("Ready", "neutral", "▶".to_string()),
            Phase::Preparing => ("Get Ready", "amber", "⏳".to_string()),
            Phase::Working => (
                "Work",
                "red",
                exercise.map(|e| e.start_glyph.clone()).unwrap_or_default(),
            ),
            Phase::Resting => (
                "Rest",
                "green",
                exercise.map(|e| e.end_glyph.clone()).unwrap_or_default(),
            ),
            Phase::Paused => ("Paused", "slate", "⏸".to_string()),
            Phase::Completed => ("Complete", "gold", "🏆".to_string()),
        };
        Self {
            label: label.to_string(),
            color: color.to_string(),
            glyph,
        }
    }
}

/// Which commands currently make sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub can_start: bool,
    pub can_pause: bool,
    pub can_resume: bool,
    pub can_stop: bool,
    pub can_next: bool,
}

impl Controls {
    pub fn for_state(state: &ExecutionState) -> Self {
        let run = state.run_state;
        Self {
            can_start: state.has_plan() && run == RunState::Idle,
            can_pause: run.is_active(),
            can_resume: run.is_paused(),
            can_stop: run.in_progress() || run == RunState::Completed,
            can_next: run.in_progress(),
        }
    }
}

/// Read model for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub plan_id: Option<String>,
    pub plan_name: Option<String>,
    pub current_exercise: Option<Exercise>,
    pub next_exercise: Option<Exercise>,
    pub exercise_number: usize,
    pub exercise_count: usize,
    pub current_round: u32,
    pub total_rounds: u32,
    pub time_remaining: u32,
    pub time_remaining_display: String,
    pub elapsed_display: String,
    /// Elapsed share of the current phase, 0-100.
    pub phase_progress: f64,
    /// Completed exercise slots, 0-100.
    pub overall_progress: f64,
    pub completed_exercise_count: u32,
    pub total_exercise_count: u32,
    pub display: PhaseDisplay,
    pub controls: Controls,
    pub context: Option<PhaseContext>,
}

impl SessionSnapshot {
    pub fn of(state: &ExecutionState) -> Self {
        let plan = state.plan.as_ref().map(|p| &p.plan);
        let phase_progress = if state.current_phase_duration == 0 {
            0.0
        } else {
            let done = state.current_phase_duration.saturating_sub(state.time_remaining);
            done as f64 / state.current_phase_duration as f64 * 100.0
        };
        Self {
            phase: state.phase(),
            plan_id: plan.map(|p| p.id.clone()),
            plan_name: plan.map(|p| p.name.clone()),
            current_exercise: state.current_exercise().cloned(),
            next_exercise: state.next_exercise().cloned(),
            exercise_number: if state.has_plan() {
                state.current_exercise_index + 1
            } else {
                0
            },
            exercise_count: state.exercises().len(),
            current_round: state.current_round,
            total_rounds: state.total_rounds,
            time_remaining: state.time_remaining,
            time_remaining_display: format_clock(state.time_remaining as u64),
            elapsed_display: format_clock(state.total_elapsed_seconds),
            phase_progress,
            overall_progress: overall_progress(state),
            completed_exercise_count: state.completed_exercise_count,
            total_exercise_count: state.total_exercise_count,
            display: PhaseDisplay::for_state(state),
            controls: Controls::for_state(state),
            context: PhaseContext::derive(state),
        }
    }
}

type Position = (Phase, usize, u32);

pub struct WorkoutSession {
    catalog: Arc<Catalog>,
    engine: WorkoutEngine,
    scheduler: TickScheduler,
    feedback: FeedbackDispatcher,
    cues: VecDeque<FeedbackCue>,
    cue_limit: usize,
}

impl WorkoutSession {
    pub fn new(catalog: Arc<Catalog>, config: &Config) -> Self {
        Self {
            catalog,
            engine: WorkoutEngine::new(config.timing.default_prep_seconds),
            scheduler: TickScheduler::new(&config.scheduler),
            feedback: FeedbackDispatcher::new(config.feedback.clone()),
            cues: VecDeque::new(),
            cue_limit: config.scheduler.history_limit.max(1),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &ExecutionState {
        self.engine.state()
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::of(self.engine.state())
    }

    pub fn context(&self) -> Option<PhaseContext> {
        PhaseContext::derive(self.engine.state())
    }

    pub fn notifications(&self) -> &NotificationHistory {
        self.scheduler.history()
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn feedback(&self) -> &FeedbackDispatcher {
        &self.feedback
    }

    /// Dispatched cues, oldest first.
    pub fn cues(&self) -> impl Iterator<Item = &FeedbackCue> {
        self.cues.iter()
    }

    pub fn latest_cue(&self) -> Option<&FeedbackCue> {
        self.cues.back()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn load_plan(&mut self, plan_id: &str) -> Result<Event, CommandError> {
        let plan = self
            .catalog
            .plan(plan_id)
            .cloned()
            .ok_or_else(|| CommandError::PlanNotFound(plan_id.to_string()))?;
        self.load_custom_plan(plan)
    }

    /// Load a plan that is not in the catalog, e.g. one finalized by the
    /// wizard. Its exercises must still resolve against the catalog.
    pub fn load_custom_plan(&mut self, plan: WorkoutPlan) -> Result<Event, CommandError> {
        let exercises = self.catalog.resolve_exercises(&plan)?;
        let event = self.engine.load_plan(plan, exercises)?;
        self.scheduler.clear_history();
        self.cues.clear();
        self.feedback.reset();
        Ok(event)
    }

    pub fn start(&mut self) -> Result<Event, CommandError> {
        let event = self.observe(Instant::now(), |e| e.start())?;
        self.scheduler.reset_clock();
        Ok(event)
    }

    pub fn pause(&mut self) -> Result<Event, CommandError> {
        self.observe(Instant::now(), |e| e.pause())
    }

    pub fn resume(&mut self) -> Result<Event, CommandError> {
        let event = self.observe(Instant::now(), |e| e.resume())?;
        self.scheduler.reset_clock();
        Ok(event)
    }

    pub fn stop(&mut self) -> Result<Event, CommandError> {
        self.observe(Instant::now(), |e| e.stop())
    }

    pub fn next_exercise(&mut self) -> Result<Event, CommandError> {
        self.observe(Instant::now(), |e| e.next_exercise())
    }

    pub fn reset(&mut self) -> Result<Event, CommandError> {
        let event = self.engine.reset()?;
        self.scheduler.clear_history();
        self.scheduler.reset_clock();
        self.cues.clear();
        self.feedback.reset();
        Ok(event)
    }

    /// Manual one-second advance, bypassing the drift guard.
    pub fn tick(&mut self) -> Result<TickOutcome, CommandError> {
        if !self.engine.state().has_plan() {
            return Err(CommandError::NoPlanLoaded);
        }
        if !self.engine.is_running() {
            return Err(CommandError::NotActive);
        }
        let now = Instant::now();
        let before = self.position();
        let outcome = self.scheduler.advance(&mut self.engine);
        self.after_transition(before, now);
        Ok(outcome)
    }

    /// Timer entry point with the drift guard applied.
    pub fn tick_at(&mut self, now: Instant) -> TickOutcome {
        let before = self.position();
        let outcome = self.scheduler.fire(&mut self.engine, now);
        if outcome.is_advanced() {
            self.after_transition(before, now);
        }
        outcome
    }

    /// Dispatch feedback for the current context. `None` when there is no
    /// context (no plan, idle, paused).
    pub fn trigger_feedback(&mut self, force: bool) -> Option<DispatchOutcome> {
        self.trigger_feedback_at(Instant::now(), force)
    }

    pub fn trigger_feedback_at(&mut self, now: Instant, force: bool) -> Option<DispatchOutcome> {
        let context = PhaseContext::derive(self.engine.state())?;
        let outcome = self.feedback.dispatch_context(&context, now, force);
        if let DispatchOutcome::Fired(cue) = &outcome {
            self.record_cue(cue.clone());
        }
        Some(outcome)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn observe<F>(&mut self, now: Instant, command: F) -> Result<Event, CommandError>
    where
        F: FnOnce(&mut WorkoutEngine) -> Result<Event, CommandError>,
    {
        let before = self.position();
        let event = command(&mut self.engine)?;
        self.after_transition(before, now);
        Ok(event)
    }

    fn after_transition(&mut self, before: Position, now: Instant) {
        if self.position() != before {
            self.trigger_feedback_at(now, false);
        }
    }

    /// Pause does not move the position; the underlying phase is kept.
    fn position(&self) -> Position {
        let state = self.engine.state();
        let phase = state
            .run_state
            .active_phase()
            .map(Phase::from)
            .unwrap_or_else(|| state.phase());
        (phase, state.current_exercise_index, state.current_round)
    }

    fn record_cue(&mut self, cue: FeedbackCue) {
        self.cues.push_back(cue);
        while self.cues.len() > self.cue_limit {
            self.cues.pop_front();
        }
    }
}

/// A session shared with a real-time tick task.
///
/// Commands lock the session, apply, and then start or stop the driver to
/// match the run state. Must be used from within a tokio runtime.
pub struct SessionRunner {
    session: Arc<Mutex<WorkoutSession>>,
    driver: TickDriver,
}

impl SessionRunner {
    pub fn new(session: WorkoutSession, period: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            driver: TickDriver::new(period),
        }
    }

    pub fn from_config(catalog: Arc<Catalog>, config: &Config) -> Self {
        Self::new(
            WorkoutSession::new(catalog, config),
            Duration::from_millis(config.scheduler.tick_interval_ms),
        )
    }

    pub fn session(&self) -> Arc<Mutex<WorkoutSession>> {
        Arc::clone(&self.session)
    }

    pub fn is_ticking(&self) -> bool {
        self.driver.is_running()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut WorkoutSession) -> R) -> Result<R, CommandError> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, CommandError> {
        self.with(|s| s.snapshot())
    }

    pub fn load_plan(&mut self, plan_id: &str) -> Result<Event, CommandError> {
        self.with(|s| s.load_plan(plan_id))?
    }

    pub fn start(&mut self) -> Result<Event, CommandError> {
        let event = self.with(|s| s.start())??;
        self.spawn_ticks();
        Ok(event)
    }

    pub fn resume(&mut self) -> Result<Event, CommandError> {
        let event = self.with(|s| s.resume())??;
        self.spawn_ticks();
        Ok(event)
    }

    pub fn pause(&mut self) -> Result<Event, CommandError> {
        let event = self.with(|s| s.pause())??;
        self.driver.stop();
        Ok(event)
    }

    pub fn stop(&mut self) -> Result<Event, CommandError> {
        let event = self.with(|s| s.stop())??;
        self.driver.stop();
        Ok(event)
    }

    pub fn reset(&mut self) -> Result<Event, CommandError> {
        let event = self.with(|s| s.reset())??;
        self.driver.stop();
        Ok(event)
    }

    pub fn next_exercise(&mut self) -> Result<Event, CommandError> {
        self.with(|s| s.next_exercise())?
    }

    fn spawn_ticks(&mut self) {
        let session = Arc::clone(&self.session);
        self.driver.start(move |now| match session.lock() {
            Ok(mut s) => {
                s.tick_at(now);
                s.is_running()
            }
            Err(_) => {
                tracing::warn!("session lock poisoned, stopping ticks");
                false
            }
        });
    }

    fn lock(&self) -> Result<MutexGuard<'_, WorkoutSession>, CommandError> {
        self.session.lock().map_err(|_| CommandError::LockPoisoned)
    }
}
