//! Integration tests for configuration validation and the wizard flow.

use std::sync::Arc;

use workoutroom_core::config::TimingLimits;
use workoutroom_core::{
    Catalog, Config, ConfigWizard, DraftConfig, FindingCode, FindingKind, Phase, Validator,
    WizardError, WizardStep, WorkoutSession,
};

fn draft_with(work: u32) -> DraftConfig {
    let mut draft = DraftConfig::with_defaults(&TimingLimits::default());
    draft.work_seconds = work;
    draft.exercises = vec!["squats".into(), "plank".into(), "burpees".into()];
    draft.name = "Lunch Break".into();
    draft.recompute_estimate();
    draft
}

#[test]
fn test_work_time_round_trip() {
    let mut validator = Validator::new(Arc::new(Catalog::builtin()), TimingLimits::default(), 8);

    let report = validator.validate_full(&draft_with(10));
    let errors: Vec<_> = report.of_kind(FindingKind::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, FindingCode::WorkTimeTooLow);
    assert!(!report.can_proceed);
    assert!(!report.is_valid);

    let report = validator.validate_full(&draft_with(30));
    assert!(!report.has_code(FindingCode::WorkTimeTooLow));
    assert!(report.is_valid);
    assert!(report.can_proceed);
}

#[test]
fn test_validation_is_deterministic() {
    let mut a = Validator::new(Arc::new(Catalog::builtin()), TimingLimits::default(), 8);
    let mut b = Validator::new(Arc::new(Catalog::builtin()), TimingLimits::default(), 0);
    let mut draft = draft_with(200);
    draft.rounds = 10;
    draft.exercises = vec!["plank".into(), "bicycle-crunches".into(), "unknown".into()];
    assert_eq!(a.validate_full(&draft), b.validate_full(&draft));
    assert_eq!(a.validate_full(&draft), b.validate_full(&draft));
}

#[test]
fn test_wizard_to_running_session() {
    let catalog = Arc::new(Catalog::builtin());
    let config = Config::default();
    let mut wizard = ConfigWizard::new(Arc::clone(&catalog), &config);

    wizard.set_work_seconds(30);
    wizard.set_rest_seconds(15);
    wizard.set_prep_seconds(5);
    wizard.set_rounds(2);
    assert_eq!(wizard.next().unwrap(), WizardStep::Exercises);

    // Empty exercise list blocks the step.
    assert!(matches!(
        wizard.next(),
        Err(WizardError::StepBlocked { step: 2, .. })
    ));
    assert_eq!(wizard.blocking_messages().len(), 1);

    for id in ["jumping-jacks", "push-ups", "lunges"] {
        assert!(wizard.add_exercise(id));
    }
    assert!(!wizard.add_exercise("push-ups"));
    assert_eq!(wizard.next().unwrap(), WizardStep::Review);

    wizard.set_name("Morning Mover");
    wizard.set_description("Three moves, two rounds");
    let plan = wizard.finalize().unwrap();
    assert_eq!(plan.id, "morning-mover");
    assert_eq!(plan.timing.prep_seconds, Some(5));

    let mut session = WorkoutSession::new(catalog, &config);
    session.load_custom_plan(plan).unwrap();
    session.start().unwrap();
    assert_eq!(session.phase(), Phase::Preparing);
    assert_eq!(session.state().time_remaining, 5);
    assert_eq!(session.state().total_exercise_count, 6);
}

#[test]
fn test_finalize_blocked_without_exercises() {
    let mut wizard = ConfigWizard::new(Arc::new(Catalog::builtin()), &Config::default());
    wizard.set_name("Empty");
    match wizard.finalize() {
        Err(WizardError::Blocked(findings)) => {
            assert!(findings.iter().any(|f| f.code == FindingCode::NoExercises));
        }
        other => panic!("expected blocked finalize, got {other:?}"),
    }
}

#[test]
fn test_preset_loads_clean() {
    let catalog = Arc::new(Catalog::builtin());
    let mut wizard = ConfigWizard::new(Arc::clone(&catalog), &Config::default());
    wizard.set_rounds(5);
    assert!(wizard.is_dirty());
    wizard
        .load_preset(catalog.plan("full-body-burn").unwrap())
        .unwrap();
    assert!(!wizard.is_dirty());
    assert_eq!(wizard.step(), WizardStep::Timing);
    assert_eq!(wizard.draft().exercises.len(), 6);
    assert!(wizard.draft().validation.is_valid);
}
