//! Integration tests for feedback dispatch through a workout session.

use std::sync::Arc;
use std::time::{Duration, Instant};

use workoutroom_core::config::FeedbackConfig;
use workoutroom_core::{
    Catalog, Config, ContextTag, DispatchOutcome, FeedbackDispatcher, Intensity, WorkoutSession,
};

fn session() -> WorkoutSession {
    WorkoutSession::new(Arc::new(Catalog::builtin()), &Config::default())
}

#[test]
fn test_repeat_dispatch_is_suppressed_unless_forced() {
    let mut dispatcher = FeedbackDispatcher::new(FeedbackConfig::default());
    let t0 = Instant::now();
    let t1 = t0 + Duration::from_millis(500);

    let fired: Vec<_> = [t0, t1]
        .into_iter()
        .map(|t| dispatcher.dispatch(ContextTag::RoundTransition, Intensity::Sustain, t, false))
        .filter(DispatchOutcome::is_fired)
        .collect();
    assert_eq!(fired.len(), 1);

    let forced: Vec<_> = [t0, t1]
        .into_iter()
        .map(|t| dispatcher.dispatch(ContextTag::RoundTransition, Intensity::Sustain, t, true))
        .filter(DispatchOutcome::is_fired)
        .collect();
    assert_eq!(forced.len(), 2);
}

#[test]
fn test_manual_trigger_after_start() {
    let mut s = session();
    s.load_plan("quick-start").unwrap();
    s.start().unwrap();
    assert_eq!(s.feedback().fired_count(), 1);

    let again = s.trigger_feedback(false).unwrap();
    assert!(matches!(
        again,
        DispatchOutcome::Suppressed { context: ContextTag::WorkoutStart, .. }
    ));
    let forced = s.trigger_feedback(true).unwrap();
    assert!(forced.is_fired());
    assert_eq!(s.feedback().fired_count(), 2);
}

#[test]
fn test_full_workout_cue_sequence() {
    let mut s = session();
    s.load_plan("quick-start").unwrap();
    s.start().unwrap();
    let base = Instant::now();
    let mut second = 1;
    while s.is_running() {
        s.tick_at(base + Duration::from_secs(second));
        second += 1;
    }

    let contexts: Vec<ContextTag> = s.cues().map(|c| c.context).collect();
    assert_eq!(contexts.last(), Some(&ContextTag::WorkoutCompletion));
    assert!(contexts.windows(2).all(|w| w[0] != w[1]));
    let tail = &contexts[contexts.len() - 3..];
    assert_eq!(
        tail,
        &[
            ContextTag::FinalExercise,
            ContextTag::FinalRest,
            ContextTag::WorkoutCompletion
        ]
    );
    assert_eq!(s.feedback().suppressed_count(), 0);
    assert_eq!(s.latest_cue().unwrap().intensity, Intensity::Recovery);
}

#[test]
fn test_muted_feedback_records_nothing() {
    let mut config = Config::default();
    config.feedback.enabled = false;
    let mut s = WorkoutSession::new(Arc::new(Catalog::builtin()), &config);
    s.load_plan("classic-tabata").unwrap();
    s.start().unwrap();
    assert_eq!(s.cues().count(), 0);
    assert_eq!(s.trigger_feedback(true), Some(DispatchOutcome::Muted));
}
