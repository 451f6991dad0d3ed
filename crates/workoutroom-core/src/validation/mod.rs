//! Configuration validation.
//!
//! Rules are pure functions over a [`DraftConfig`] (see [`rules`]). The
//! [`Validator`] selects the rules for a scope, orders the findings by
//! priority and memoizes them in a bounded [`ValidationCache`] keyed by a
//! SHA-256 of the fields that scope reads. Identical inputs always produce
//! identical findings in identical order.

mod cache;
pub mod rules;

pub use cache::ValidationCache;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::TimingLimits;
use crate::draft::{DraftConfig, WizardStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Error,
    Warning,
    Info,
    Success,
}

/// Finding priority. Declaration order is sort order: Critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCode {
    WorkTimeTooLow,
    WorkTimeTooHigh,
    WorkTimeLong,
    RestTimeTooLow,
    InsufficientRecovery,
    RecoveryFocused,
    RoundsTooLow,
    RoundsHigh,
    PrepTimeLong,
    NoExercises,
    SingleExercise,
    TooManyExercises,
    UnknownExercise,
    SingleMuscleGroup,
    ConsecutiveMuscleGroup,
    DurationLong,
    DurationShort,
    BeginnerWorkTooLong,
    BeginnerRestTooShort,
    AdvancedWorkShort,
    NameMissing,
    NameShort,
    NameLong,
    DescriptionLong,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub priority: Priority,
    pub field: String,
    pub message: String,
    #[serde(default)]
    pub suggestion: Option<String>,
    pub code: FindingCode,
}

impl Finding {
    pub fn new(
        kind: FindingKind,
        priority: Priority,
        field: impl Into<String>,
        code: FindingCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            priority,
            field: field.into(),
            message: message.into(),
            suggestion: None,
            code,
        }
    }

    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Errors at High or Critical priority stop the user from moving on.
    pub fn is_blocking(&self) -> bool {
        self.kind == FindingKind::Error && self.priority <= Priority::High
    }
}

/// Which rule groups to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "scope", content = "step")]
pub enum ValidationScope {
    Step(WizardStep),
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub is_valid: bool,
    pub can_proceed: bool,
    /// 0-100 checklist score for progress display.
    pub completion_score: u8,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            findings: Vec::new(),
            is_valid: true,
            can_proceed: true,
            completion_score: 0,
        }
    }
}

impl ValidationReport {
    pub fn from_findings(findings: Vec<Finding>, completion_score: u8) -> Self {
        let is_valid = !findings.iter().any(|f| f.kind == FindingKind::Error);
        let can_proceed = !findings.iter().any(Finding::is_blocking);
        Self {
            findings,
            is_valid,
            can_proceed,
            completion_score,
        }
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }

    pub fn blocking(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_blocking())
    }

    pub fn has_code(&self, code: FindingCode) -> bool {
        self.findings.iter().any(|f| f.code == code)
    }
}

/// Weighted checklist: timing 30, exercises 20 (+20 at three or more),
/// name 20, description 10.
pub fn completion_score(draft: &DraftConfig) -> u8 {
    let mut score = 0u8;
    if draft.work_seconds > 0 && draft.rounds > 0 {
        score += 30;
    }
    if !draft.exercises.is_empty() {
        score += 20;
    }
    if draft.exercises.len() >= 3 {
        score += 20;
    }
    if !draft.name.trim().is_empty() {
        score += 20;
    }
    if !draft.description.trim().is_empty() {
        score += 10;
    }
    score
}

pub struct Validator {
    catalog: Arc<Catalog>,
    limits: TimingLimits,
    cache: ValidationCache,
}

impl Validator {
    pub fn new(catalog: Arc<Catalog>, limits: TimingLimits, cache_capacity: usize) -> Self {
        Self {
            catalog,
            limits,
            cache: ValidationCache::new(cache_capacity),
        }
    }

    pub fn limits(&self) -> &TimingLimits {
        &self.limits
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cache(&self) -> &ValidationCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn validate_full(&mut self, draft: &DraftConfig) -> ValidationReport {
        self.validate(draft, ValidationScope::Full)
    }

    pub fn validate_step(&mut self, draft: &DraftConfig, step: WizardStep) -> ValidationReport {
        self.validate(draft, ValidationScope::Step(step))
    }

    pub fn validate(&mut self, draft: &DraftConfig, scope: ValidationScope) -> ValidationReport {
        let key = cache_key(draft, scope);
        let findings = match self.cache.get(&key) {
            Some(findings) => findings,
            None => {
                let findings = self.run_rules(draft, scope);
                tracing::debug!(?scope, count = findings.len(), "validated draft");
                self.cache.insert(key, findings.clone());
                findings
            }
        };
        ValidationReport::from_findings(findings, completion_score(draft))
    }

    fn run_rules(&self, draft: &DraftConfig, scope: ValidationScope) -> Vec<Finding> {
        let mut findings = match scope {
            ValidationScope::Step(WizardStep::Timing) => rules::timing(draft, &self.limits),
            ValidationScope::Step(WizardStep::Exercises) => {
                rules::exercises(&draft.exercises, &self.catalog)
            }
            ValidationScope::Step(WizardStep::Review) => {
                let mut f = rules::metadata(&draft.name, &draft.description);
                f.extend(rules::consistency(draft));
                f
            }
            ValidationScope::Full => {
                let mut f = rules::timing(draft, &self.limits);
                f.extend(rules::exercises(&draft.exercises, &self.catalog));
                f.extend(rules::metadata(&draft.name, &draft.description));
                f.extend(rules::consistency(draft));
                if !f
                    .iter()
                    .any(|x| matches!(x.kind, FindingKind::Error | FindingKind::Warning))
                {
                    f.push(Finding::new(
                        FindingKind::Success,
                        Priority::Low,
                        "config",
                        FindingCode::Ready,
                        "Workout is ready to go",
                    ));
                }
                f
            }
        };
        // Stable: rule order is kept within a priority.
        findings.sort_by_key(|f| f.priority);
        findings
    }
}

fn cache_key(draft: &DraftConfig, scope: ValidationScope) -> String {
    let payload = match scope {
        ValidationScope::Step(WizardStep::Timing) => serde_json::json!({
            "scope": scope,
            "work": draft.work_seconds,
            "rest": draft.rest_seconds,
            "prep": draft.prep_seconds,
            "rounds": draft.rounds,
        }),
        ValidationScope::Step(WizardStep::Exercises) => serde_json::json!({
            "scope": scope,
            "exercises": draft.exercises,
        }),
        ValidationScope::Step(WizardStep::Review) | ValidationScope::Full => serde_json::json!({
            "scope": scope,
            "work": draft.work_seconds,
            "rest": draft.rest_seconds,
            "prep": draft.prep_seconds,
            "rounds": draft.rounds,
            "exercises": draft.exercises,
            "difficulty": draft.difficulty,
            "name": draft.name,
            "description": draft.description,
            "estimated": draft.estimated_minutes,
        }),
    };
    let mut hasher = Sha256::new();
    hasher.update(payload.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(Arc::new(Catalog::builtin()), TimingLimits::default(), 16)
    }

    fn draft() -> DraftConfig {
        let mut d = DraftConfig::with_defaults(&TimingLimits::default());
        d.exercises = vec!["squats".into(), "push-ups".into(), "plank".into()];
        d.name = "Evening Circuit".into();
        d.description = "Quick mixed circuit".into();
        d.recompute_estimate();
        d
    }

    #[test]
    fn findings_sorted_by_priority() {
        let mut v = validator();
        let mut d = draft();
        d.work_seconds = 10;
        d.rounds = 11;
        d.name.clear();
        let report = v.validate_full(&d);
        let priorities: Vec<Priority> = report.findings.iter().map(|f| f.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(report.findings[0].code, FindingCode::WorkTimeTooLow);
    }

    #[test]
    fn clean_draft_is_ready() {
        let mut v = validator();
        let report = v.validate_full(&draft());
        assert!(report.is_valid);
        assert!(report.can_proceed);
        assert_eq!(report.completion_score, 100);
        assert!(report.has_code(FindingCode::Ready));
    }

    #[test]
    fn step_scope_only_runs_its_rules() {
        let mut v = validator();
        let mut d = draft();
        d.exercises.clear();
        d.name.clear();
        let report = v.validate_step(&d, WizardStep::Timing);
        assert!(report.findings.is_empty());
        let report = v.validate_step(&d, WizardStep::Exercises);
        assert!(report.has_code(FindingCode::NoExercises));
        assert!(!report.has_code(FindingCode::NameMissing));
    }

    #[test]
    fn repeated_validation_hits_cache() {
        let mut v = validator();
        let d = draft();
        let first = v.validate_full(&d);
        let second = v.validate_full(&d);
        assert_eq!(first, second);
        assert_eq!(v.cache().hits(), 1);
        assert_eq!(v.cache().len(), 1);
        v.clear_cache();
        assert!(v.cache().is_empty());
    }

    #[test]
    fn timing_key_ignores_metadata() {
        let mut v = validator();
        let mut d = draft();
        v.validate_step(&d, WizardStep::Timing);
        d.name = "Renamed".into();
        v.validate_step(&d, WizardStep::Timing);
        assert_eq!(v.cache().hits(), 1);
    }

    #[test]
    fn medium_error_does_not_block() {
        let f = Finding::new(
            FindingKind::Error,
            Priority::Medium,
            "x",
            FindingCode::Ready,
            "m",
        );
        let report = ValidationReport::from_findings(vec![f], 0);
        assert!(!report.is_valid);
        assert!(report.can_proceed);
    }
}
