//! Multi-step configuration wizard: timing, then exercises, then review.
//!
//! The wizard owns the [`DraftConfig`]. Every mutation recomputes the
//! estimated duration and re-runs full validation; forward navigation is
//! gated on the current step's prerequisites and its blocking findings.

use std::sync::Arc;

use crate::catalog::{Catalog, Difficulty, WorkoutPlan};
use crate::config::{Config, TimingLimits};
use crate::draft::{DraftConfig, WizardStep};
use crate::error::WizardError;
use crate::validation::{Finding, ValidationReport, Validator};

pub struct ConfigWizard {
    draft: DraftConfig,
    validator: Validator,
    messages: Vec<String>,
}

impl ConfigWizard {
    pub fn new(catalog: Arc<Catalog>, config: &Config) -> Self {
        let validator = Validator::new(
            catalog,
            config.timing.clone(),
            config.validation.cache_capacity,
        );
        let mut wizard = Self {
            draft: DraftConfig::with_defaults(&config.timing),
            validator,
            messages: Vec::new(),
        };
        wizard.revalidate();
        wizard
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn draft(&self) -> &DraftConfig {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.draft.step
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.dirty
    }

    /// Messages appended by refused navigation and duplicate adds.
    pub fn blocking_messages(&self) -> &[String] {
        &self.messages
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Findings for the rules that belong to the current step only.
    pub fn validate_current_step(&mut self) -> ValidationReport {
        self.validator.validate_step(&self.draft, self.draft.step)
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Advance one step if the current one is complete.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let current = self.draft.step;
        let Some(target) = current.next() else {
            return Ok(current);
        };
        if let Err(reason) = self.check_step(current) {
            return Err(self.refuse(current, reason));
        }
        self.draft.step = target;
        tracing::debug!(from = current.number(), to = target.number(), "wizard advanced");
        Ok(target)
    }

    /// Go back one step. Never fails; stays on the first step.
    pub fn previous(&mut self) -> WizardStep {
        if let Some(prev) = self.draft.step.previous() {
            self.draft.step = prev;
        }
        self.draft.step
    }

    /// Jump to any step. Backward jumps are free; forward jumps must pass
    /// every step in between.
    pub fn go_to(&mut self, target: WizardStep) -> Result<WizardStep, WizardError> {
        let current = self.draft.step;
        if target <= current {
            self.draft.step = target;
            return Ok(target);
        }
        for step in WizardStep::ALL {
            if step >= current && step < target {
                if let Err(reason) = self.check_step(step) {
                    return Err(self.refuse(step, reason));
                }
            }
        }
        self.draft.step = target;
        Ok(target)
    }

    fn check_step(&mut self, step: WizardStep) -> Result<(), String> {
        match step {
            WizardStep::Timing => {
                if self.draft.work_seconds == 0 {
                    return Err("work time must be greater than zero".into());
                }
                if self.draft.rounds == 0 {
                    return Err("at least one round is required".into());
                }
            }
            WizardStep::Exercises => {
                if self.draft.exercises.is_empty() {
                    return Err("select at least one exercise".into());
                }
            }
            WizardStep::Review => {}
        }
        let report = self.validator.validate_step(&self.draft, step);
        let blocked = report.blocking().next().map(|f| f.message.clone());
        match blocked {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }

    fn refuse(&mut self, step: WizardStep, reason: String) -> WizardError {
        tracing::debug!(step = step.number(), %reason, "wizard step blocked");
        self.messages
            .push(format!("Step {}: {reason}", step.number()));
        WizardError::StepBlocked {
            step: step.number(),
            reason,
        }
    }

    // ── Timing ───────────────────────────────────────────────────────

    pub fn set_work_seconds(&mut self, seconds: u32) {
        let l = self.limits();
        self.draft.work_seconds = within(seconds, l.min_work_seconds, l.max_work_seconds);
        self.touch();
    }

    pub fn set_rest_seconds(&mut self, seconds: u32) {
        let l = self.limits();
        self.draft.rest_seconds = within(seconds, l.min_rest_seconds, l.max_rest_seconds);
        self.touch();
    }

    pub fn set_prep_seconds(&mut self, seconds: u32) {
        let l = self.limits();
        self.draft.prep_seconds = within(seconds, l.min_prep_seconds, l.max_prep_seconds);
        self.touch();
    }

    pub fn set_rounds(&mut self, rounds: u32) {
        let l = self.limits();
        self.draft.rounds = within(rounds, l.min_rounds.max(1), l.max_rounds.max(1));
        self.touch();
    }

    // ── Exercises ────────────────────────────────────────────────────

    /// Append an exercise. Returns `false` (and leaves a message) if it is
    /// already in the list.
    pub fn add_exercise(&mut self, id: &str) -> bool {
        if self.draft.exercises.iter().any(|e| e == id) {
            self.messages.push(format!("'{id}' is already in the workout"));
            return false;
        }
        self.draft.exercises.push(id.to_string());
        self.touch();
        true
    }

    pub fn remove_exercise(&mut self, id: &str) -> bool {
        let before = self.draft.exercises.len();
        self.draft.exercises.retain(|e| e != id);
        if self.draft.exercises.len() == before {
            return false;
        }
        self.touch();
        true
    }

    /// Move an exercise to `new_index`. No-op if the id is missing or the
    /// index is out of bounds.
    pub fn reorder_exercise(&mut self, id: &str, new_index: usize) -> bool {
        let Some(from) = self.draft.exercises.iter().position(|e| e == id) else {
            return false;
        };
        if new_index >= self.draft.exercises.len() {
            return false;
        }
        let item = self.draft.exercises.remove(from);
        self.draft.exercises.insert(new_index, item);
        self.touch();
        true
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn set_name(&mut self, name: &str) {
        self.draft.name = name.to_string();
        self.touch();
    }

    pub fn set_description(&mut self, description: &str) {
        self.draft.description = description.to_string();
        self.touch();
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.draft.difficulty = difficulty;
        self.touch();
    }

    // ── Whole-draft operations ───────────────────────────────────────

    /// Replace the draft with a preset. The draft comes back clean on step 1.
    pub fn load_preset(&mut self, preset: &WorkoutPlan) -> Result<(), WizardError> {
        preset.check_shape().map_err(WizardError::InvalidPreset)?;
        let prep = preset
            .timing
            .prep_seconds
            .unwrap_or(self.limits().default_prep_seconds);
        self.draft = DraftConfig {
            work_seconds: preset.timing.work_seconds,
            rest_seconds: preset.timing.rest_seconds,
            prep_seconds: prep,
            rounds: preset.timing.rounds,
            exercises: preset.exercises.clone(),
            difficulty: Some(preset.difficulty),
            name: preset.name.clone(),
            description: preset.description.clone(),
            ..DraftConfig::with_defaults(self.validator.limits())
        };
        self.revalidate();
        tracing::debug!(preset = %preset.id, "wizard loaded preset");
        Ok(())
    }

    /// Restore defaults, keeping the current step.
    pub fn reset_config(&mut self) {
        let step = self.draft.step;
        self.draft = DraftConfig::with_defaults(self.validator.limits());
        self.draft.step = step;
        self.revalidate();
    }

    pub fn mark_dirty(&mut self) {
        self.draft.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.draft.dirty = false;
    }

    /// Run full validation and produce a plan, or the blocking findings.
    pub fn finalize(&mut self) -> Result<WorkoutPlan, WizardError> {
        let report = self.validator.validate_full(&self.draft);
        self.draft.validation = report.clone();
        if !report.can_proceed {
            let blocking: Vec<Finding> = report.blocking().cloned().collect();
            return Err(WizardError::Blocked(blocking));
        }
        Ok(self.draft.to_plan())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn limits(&self) -> TimingLimits {
        self.validator.limits().clone()
    }

    fn touch(&mut self) {
        self.revalidate();
        self.draft.dirty = true;
    }

    fn revalidate(&mut self) {
        self.draft.recompute_estimate();
        self.draft.validation = self.validator.validate_full(&self.draft);
    }
}

/// Like `u32::clamp`, but an inverted range resolves to `min` instead of
/// panicking.
fn within(value: u32, min: u32, max: u32) -> u32 {
    value.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FindingCode;

    fn wizard() -> ConfigWizard {
        ConfigWizard::new(Arc::new(Catalog::builtin()), &Config::default())
    }

    #[test]
    fn starts_clean_on_timing_step() {
        let w = wizard();
        assert_eq!(w.step(), WizardStep::Timing);
        assert!(!w.is_dirty());
        assert!(w.draft().validation.has_code(FindingCode::NoExercises));
    }

    #[test]
    fn setters_clamp_and_mark_dirty() {
        let mut w = wizard();
        w.set_work_seconds(5);
        assert_eq!(w.draft().work_seconds, 15);
        w.set_work_seconds(1000);
        assert_eq!(w.draft().work_seconds, 300);
        w.set_rest_seconds(0);
        assert_eq!(w.draft().rest_seconds, 5);
        w.set_prep_seconds(500);
        assert_eq!(w.draft().prep_seconds, 60);
        w.set_rounds(0);
        assert_eq!(w.draft().rounds, 1);
        w.set_rounds(42);
        assert_eq!(w.draft().rounds, 10);
        assert!(w.is_dirty());
    }

    #[test]
    fn setters_update_estimate() {
        let mut w = wizard();
        w.add_exercise("squats");
        w.set_prep_seconds(0);
        w.set_work_seconds(30);
        w.set_rest_seconds(30);
        w.set_rounds(2);
        assert_eq!(w.draft().estimated_minutes, 2);
    }

    #[test]
    fn next_blocks_on_empty_exercises() {
        let mut w = wizard();
        assert_eq!(w.next().unwrap(), WizardStep::Exercises);
        let err = w.next().unwrap_err();
        assert!(matches!(err, WizardError::StepBlocked { step: 2, .. }));
        assert_eq!(w.step(), WizardStep::Exercises);
        assert_eq!(w.blocking_messages().len(), 1);

        w.add_exercise("plank");
        assert_eq!(w.next().unwrap(), WizardStep::Review);
        assert_eq!(w.next().unwrap(), WizardStep::Review);
    }

    #[test]
    fn next_blocks_on_unknown_exercise() {
        let mut w = wizard();
        w.go_to(WizardStep::Exercises).unwrap();
        w.add_exercise("moonwalk");
        assert!(w.next().is_err());
    }

    #[test]
    fn previous_floors_at_first_step() {
        let mut w = wizard();
        assert_eq!(w.previous(), WizardStep::Timing);
        w.next().unwrap();
        assert_eq!(w.previous(), WizardStep::Timing);
    }

    #[test]
    fn go_to_checks_forward_jumps_only() {
        let mut w = wizard();
        assert!(w.go_to(WizardStep::Review).is_err());
        assert_eq!(w.step(), WizardStep::Timing);
        w.add_exercise("squats");
        assert_eq!(w.go_to(WizardStep::Review).unwrap(), WizardStep::Review);
        w.remove_exercise("squats");
        assert_eq!(w.go_to(WizardStep::Timing).unwrap(), WizardStep::Timing);
    }

    #[test]
    fn duplicate_add_is_noop_with_message() {
        let mut w = wizard();
        assert!(w.add_exercise("plank"));
        assert!(!w.add_exercise("plank"));
        assert_eq!(w.draft().exercises.len(), 1);
        assert_eq!(w.blocking_messages().len(), 1);
    }

    #[test]
    fn reorder_moves_and_ignores_bad_input() {
        let mut w = wizard();
        for id in ["squats", "plank", "burpees"] {
            w.add_exercise(id);
        }
        assert!(w.reorder_exercise("burpees", 0));
        assert_eq!(w.draft().exercises, vec!["burpees", "squats", "plank"]);
        assert!(!w.reorder_exercise("burpees", 3));
        assert!(!w.reorder_exercise("nope", 0));
        assert_eq!(w.draft().exercises, vec!["burpees", "squats", "plank"]);
    }

    #[test]
    fn load_preset_replaces_draft_clean() {
        let catalog = Catalog::builtin();
        let preset = catalog.plan("core-crusher").unwrap().clone();
        let mut w = wizard();
        w.set_name("scratch");
        w.next().unwrap();
        w.load_preset(&preset).unwrap();
        assert_eq!(w.step(), WizardStep::Timing);
        assert!(!w.is_dirty());
        assert_eq!(w.draft().exercises, preset.exercises);
        assert_eq!(w.draft().work_seconds, 40);
        assert_eq!(w.draft().estimated_minutes, preset.estimated_minutes);
    }

    #[test]
    fn load_preset_rejects_malformed_preset() {
        let mut preset = Catalog::builtin().plan("quick-start").unwrap().clone();
        preset.exercises.clear();
        let mut w = wizard();
        w.set_name("keep me");
        assert!(matches!(
            w.load_preset(&preset),
            Err(WizardError::InvalidPreset(_))
        ));
        assert_eq!(w.draft().name, "keep me");
    }

    #[test]
    fn reset_keeps_step() {
        let mut w = wizard();
        w.add_exercise("plank");
        w.next().unwrap();
        w.set_work_seconds(45);
        w.reset_config();
        assert_eq!(w.step(), WizardStep::Exercises);
        assert_eq!(w.draft().work_seconds, 30);
        assert!(w.draft().exercises.is_empty());
    }

    #[test]
    fn dirty_tracking() {
        let mut w = wizard();
        w.mark_dirty();
        assert!(w.is_dirty());
        w.mark_clean();
        assert!(!w.is_dirty());
    }

    #[test]
    fn finalize_yields_plan_or_blocking_findings() {
        let mut w = wizard();
        assert!(matches!(w.finalize(), Err(WizardError::Blocked(ref f)) if !f.is_empty()));

        for id in ["squats", "push-ups", "plank"] {
            w.add_exercise(id);
        }
        w.set_name("Lunch Break Burner");
        let plan = w.finalize().unwrap();
        assert_eq!(plan.id, "lunch-break-burner");
        assert_eq!(plan.exercises.len(), 3);
        assert_eq!(plan.timing.prep_seconds, Some(10));
    }

    #[test]
    fn inverted_limits_do_not_panic() {
        let mut config = Config::default();
        config.timing.min_work_seconds = 400;
        config.timing.min_rounds = 12;
        let mut w = ConfigWizard::new(Arc::new(Catalog::builtin()), &config);
        w.set_work_seconds(30);
        assert_eq!(w.draft().work_seconds, 400);
        w.set_rounds(3);
        assert_eq!(w.draft().rounds, 12);
    }

    #[test]
    fn unknown_exercise_blocks_with_its_finding() {
        let mut w = wizard();
        w.next().unwrap();
        w.add_exercise("moon-walk");
        match w.next() {
            Err(WizardError::StepBlocked { step: 2, reason }) => {
                assert!(reason.contains("moon-walk"), "reason: {reason}");
            }
            other => panic!("expected blocked step, got {other:?}"),
        }
        assert_eq!(w.step(), WizardStep::Exercises);
    }
}
