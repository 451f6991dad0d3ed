//! Integration tests for the workout execution engine.

use proptest::prelude::*;
use workoutroom_core::{
    Catalog, Command, CommandError, Difficulty, Event, Phase, Timing, WorkoutEngine, WorkoutPlan,
};

fn single_exercise_plan(work: u32, rest: u32, prep: u32, rounds: u32) -> WorkoutPlan {
    WorkoutPlan {
        id: "single".into(),
        name: "Single".into(),
        description: String::new(),
        difficulty: Difficulty::Beginner,
        estimated_minutes: 1,
        exercises: vec!["squats".into()],
        timing: Timing {
            work_seconds: work,
            rest_seconds: rest,
            rounds,
            prep_seconds: Some(prep),
        },
    }
}

fn loaded(plan: WorkoutPlan) -> WorkoutEngine {
    let catalog = Catalog::builtin();
    let exercises = catalog.resolve_exercises(&plan).unwrap();
    let mut engine = WorkoutEngine::default();
    engine.load_plan(plan, exercises).unwrap();
    engine
}

#[test]
fn test_completion_boundary() {
    for prep in [0u32, 3, 10] {
        let mut engine = loaded(single_exercise_plan(5, 5, prep, 1));
        engine.start().unwrap();

        let expected = prep + 10;
        for i in 1..expected {
            engine.tick().unwrap();
            assert_ne!(engine.phase(), Phase::Completed, "completed early at tick {i}");
        }
        let last = engine.tick().unwrap();
        assert!(matches!(last, Some(Event::WorkoutCompleted { .. })));
        assert_eq!(engine.phase(), Phase::Completed);
        assert_eq!(engine.state().total_elapsed_seconds, expected as u64);
        assert_eq!(engine.state().time_remaining, 0);
        assert_eq!(engine.state().completed_exercise_count, 1);
        assert!(engine.state().ended_at.is_some());
        assert_eq!(engine.tick().unwrap_err(), CommandError::NotActive);
    }
}

#[test]
fn test_phase_sequence_across_rounds() {
    let mut engine = loaded(single_exercise_plan(2, 1, 1, 2));
    engine.start().unwrap();
    let mut phases = vec![engine.phase()];
    while engine.phase() != Phase::Completed {
        engine.tick().unwrap();
        if phases.last() != Some(&engine.phase()) {
            phases.push(engine.phase());
        }
    }
    assert_eq!(
        phases,
        vec![
            Phase::Preparing,
            Phase::Working,
            Phase::Resting,
            Phase::Working,
            Phase::Resting,
            Phase::Completed,
        ]
    );
}

#[test]
fn test_zero_rest_advances_straight_to_next_work() {
    let mut engine = loaded(single_exercise_plan(3, 0, 0, 2));
    engine.start().unwrap();
    for _ in 0..3 {
        engine.tick().unwrap();
    }
    assert_eq!(engine.phase(), Phase::Working);
    assert_eq!(engine.state().current_round, 2);
    for _ in 0..3 {
        engine.tick().unwrap();
    }
    assert_eq!(engine.phase(), Phase::Completed);
}

#[test]
fn test_pause_resume_fidelity() {
    let catalog = Catalog::builtin();
    let plan = catalog.plan("core-crusher").unwrap().clone();
    let mut engine = loaded(plan);
    engine.start().unwrap();
    // 10s default prep, then 28s into a 40s work phase.
    for _ in 0..38 {
        engine.tick().unwrap();
    }
    assert_eq!(engine.phase(), Phase::Working);
    assert_eq!(engine.state().time_remaining, 12);

    engine.pause().unwrap();
    for _ in 0..30 {
        assert!(engine.tick().is_err());
    }
    engine.resume().unwrap();
    assert_eq!(engine.phase(), Phase::Working);
    assert_eq!(engine.state().time_remaining, 12);
    assert_eq!(engine.state().total_elapsed_seconds, 38);
}

#[test]
fn test_start_failures_are_distinct() {
    let mut engine = WorkoutEngine::default();
    assert_eq!(engine.start().unwrap_err(), CommandError::NoPlanLoaded);

    let mut engine = loaded(single_exercise_plan(1, 0, 0, 1));
    engine.start().unwrap();
    assert_eq!(engine.start().unwrap_err(), CommandError::AlreadyActive);
    engine.tick().unwrap();
    assert_eq!(engine.phase(), Phase::Completed);
    assert_eq!(engine.start().unwrap_err(), CommandError::AlreadyCompleted);
}

#[test]
fn test_stop_then_restart() {
    let mut engine = loaded(single_exercise_plan(5, 5, 2, 2));
    engine.start().unwrap();
    for _ in 0..9 {
        engine.tick().unwrap();
    }
    engine.stop().unwrap();
    assert_eq!(engine.phase(), Phase::Idle);
    assert_eq!(engine.state().completed_exercise_count, 0);
    engine.start().unwrap();
    assert_eq!(engine.phase(), Phase::Preparing);
    assert_eq!(engine.state().current_round, 1);
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Start),
        Just(Command::Pause),
        Just(Command::Resume),
        Just(Command::Stop),
        Just(Command::NextExercise),
        Just(Command::Reset),
        // Weighted so sequences make progress.
        Just(Command::Tick),
        Just(Command::Tick),
        Just(Command::Tick),
        Just(Command::Tick),
        Just(Command::Tick),
    ]
}

fn plan_strategy() -> impl Strategy<Value = WorkoutPlan> {
    (1u32..6, 0u32..4, 0u32..3, 1u32..4, 1usize..4).prop_map(|(work, rest, prep, rounds, n)| {
        let ids = ["squats", "plank", "burpees"];
        WorkoutPlan {
            exercises: ids[..n].iter().map(|s| s.to_string()).collect(),
            ..single_exercise_plan(work, rest, prep, rounds)
        }
    })
}

/// Strip wall-clock fields so two runs can be compared.
fn comparable(engine: &WorkoutEngine) -> String {
    let mut state = engine.state().clone();
    state.started_at = None;
    state.ended_at = None;
    serde_json::to_string(&state).unwrap()
}

proptest! {
    #[test]
    fn prop_state_invariants(plan in plan_strategy(), commands in prop::collection::vec(command_strategy(), 0..200)) {
        let mut engine = loaded(plan);
        let mut completed = 0u32;
        for command in commands {
            let was_reset = command == Command::Reset;
            let was_stop = command == Command::Stop;
            let _ = engine.dispatch(command);
            let state = engine.state();

            if state.has_plan() {
                prop_assert!(state.current_exercise_index < state.exercises().len());
                prop_assert!(state.current_round >= 1);
                prop_assert!(state.current_round <= state.total_rounds);
            }
            prop_assert!(state.completed_exercise_count <= state.total_exercise_count);
            if was_reset || was_stop {
                completed = state.completed_exercise_count;
            } else {
                prop_assert!(state.completed_exercise_count >= completed);
                completed = state.completed_exercise_count;
            }
        }
    }

    #[test]
    fn prop_deterministic(plan in plan_strategy(), commands in prop::collection::vec(command_strategy(), 0..120)) {
        let mut a = loaded(plan.clone());
        let mut b = loaded(plan);
        for command in commands {
            let ra = a.dispatch(command).map(|e| e.map(|e| e.name()));
            let rb = b.dispatch(command).map(|e| e.map(|e| e.name()));
            prop_assert_eq!(ra, rb);
            prop_assert_eq!(comparable(&a), comparable(&b));
        }
    }
}
