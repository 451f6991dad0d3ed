//! Integration tests for the real-time tick source, on tokio's paused clock.

use std::sync::Arc;
use std::time::Duration;

use workoutroom_core::{
    Catalog, CommandError, Config, Difficulty, Phase, SessionRunner, Timing, WorkoutPlan,
};

fn runner() -> SessionRunner {
    SessionRunner::from_config(Arc::new(Catalog::builtin()), &Config::default())
}

fn elapsed(runner: &SessionRunner) -> u64 {
    runner.with(|s| s.state().total_elapsed_seconds).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_start_twice_keeps_one_timer() {
    let mut runner = runner();
    runner.load_plan("quick-start").unwrap();
    runner.start().unwrap();
    assert_eq!(runner.start().unwrap_err(), CommandError::AlreadyActive);
    assert!(runner.is_ticking());

    tokio::time::sleep(Duration::from_millis(5500)).await;
    assert_eq!(elapsed(&runner), 5);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_ticks_immediately() {
    let mut runner = runner();
    runner.load_plan("quick-start").unwrap();
    runner.start().unwrap();
    tokio::time::sleep(Duration::from_millis(3500)).await;
    runner.pause().unwrap();
    assert!(!runner.is_ticking());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(elapsed(&runner), 3);

    runner.resume().unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(elapsed(&runner), 5);
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent() {
    let mut runner = runner();
    runner.load_plan("quick-start").unwrap();
    runner.start().unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    runner.stop().unwrap();
    runner.stop().unwrap();
    assert!(!runner.is_ticking());
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(elapsed(&runner), 0);
    assert_eq!(runner.snapshot().unwrap().phase, Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_single_notification_for_prep_to_work() {
    let mut runner = runner();
    runner.load_plan("quick-start").unwrap();
    runner.start().unwrap();

    tokio::time::sleep(Duration::from_millis(9500)).await;
    assert_eq!(runner.with(|s| s.notifications().len()).unwrap(), 0);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let changes: Vec<_> = runner
        .with(|s| s.notifications().iter().cloned().collect())
        .unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].from, Phase::Preparing);
    assert_eq!(changes[0].to, Phase::Working);
    assert_eq!(changes[0].current_round, 1);
    assert_eq!(changes[0].total_rounds, 3);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(runner.with(|s| s.notifications().len()).unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_completion_stops_driver() {
    let mut runner = runner();
    let plan = WorkoutPlan {
        id: "tiny".into(),
        name: "Tiny".into(),
        description: String::new(),
        difficulty: Difficulty::Beginner,
        estimated_minutes: 1,
        exercises: vec!["plank".into()],
        timing: Timing {
            work_seconds: 2,
            rest_seconds: 1,
            rounds: 1,
            prep_seconds: Some(0),
        },
    };
    runner.with(|s| s.load_custom_plan(plan)).unwrap().unwrap();
    runner.start().unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;
    let snapshot = runner.snapshot().unwrap();
    assert_eq!(snapshot.phase, Phase::Completed);
    assert_eq!(elapsed(&runner), 3);
    assert!(!runner.is_ticking());
}
