//! Pure validation rules. None of these touch the input or any cache.

use crate::catalog::{Catalog, Difficulty, MuscleGroup};
use crate::config::TimingLimits;
use crate::draft::DraftConfig;

use super::{Finding, FindingCode, FindingKind, Priority};

const LONG_WORK_SECONDS: u32 = 60;
const HIGH_RATIO: f64 = 3.0;
const LOW_RATIO: f64 = 0.3;
const SINGLE_EXERCISE_GROUP_MIN: usize = 3;
const MAX_RECOMMENDED_EXERCISES: usize = 8;
const LONG_WORKOUT_MINUTES: u32 = 60;
const SHORT_WORKOUT_MINUTES: u32 = 5;
const BEGINNER_MAX_WORK_SECONDS: u32 = 30;
const ADVANCED_MIN_WORK_SECONDS: u32 = 30;
const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 50;
const DESCRIPTION_MAX_CHARS: usize = 200;

/// Work, rest, prep and rounds against the configured ranges.
pub fn timing(draft: &DraftConfig, limits: &TimingLimits) -> Vec<Finding> {
    let mut findings = Vec::new();
    let work = draft.work_seconds;
    let rest = draft.rest_seconds;

    if work < limits.min_work_seconds {
        findings.push(
            Finding::new(
                FindingKind::Error,
                Priority::Critical,
                "work_seconds",
                FindingCode::WorkTimeTooLow,
                format!("Work time must be at least {}s", limits.min_work_seconds),
            )
            .suggest(format!("Set work time to {}s or more", limits.min_work_seconds)),
        );
    } else if work > limits.max_work_seconds {
        findings.push(
            Finding::new(
                FindingKind::Error,
                Priority::High,
                "work_seconds",
                FindingCode::WorkTimeTooHigh,
                format!("Work time cannot exceed {}s", limits.max_work_seconds),
            )
            .suggest(format!("Keep work intervals at {}s or less", limits.max_work_seconds)),
        );
    } else if work >= LONG_WORK_SECONDS {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                Priority::Medium,
                "work_seconds",
                FindingCode::WorkTimeLong,
                "Work intervals of a minute or more are hard to sustain at high intensity",
            )
            .suggest("Consider 20-45s intervals for HIIT"),
        );
    }

    if rest < limits.min_rest_seconds {
        findings.push(
            Finding::new(
                FindingKind::Error,
                Priority::High,
                "rest_seconds",
                FindingCode::RestTimeTooLow,
                format!("Rest time must be at least {}s", limits.min_rest_seconds),
            )
            .suggest(format!("Set rest time to {}s or more", limits.min_rest_seconds)),
        );
    }

    if work > 0 {
        let ratio = if rest == 0 {
            f64::INFINITY
        } else {
            work as f64 / rest as f64
        };
        if ratio > HIGH_RATIO {
            findings.push(
                Finding::new(
                    FindingKind::Warning,
                    Priority::Medium,
                    "rest_seconds",
                    FindingCode::InsufficientRecovery,
                    "Rest is short relative to work; recovery may be insufficient",
                )
                .suggest("Aim for a work:rest ratio of 3:1 or lower"),
            );
        } else if ratio < LOW_RATIO {
            findings.push(Finding::new(
                FindingKind::Info,
                Priority::Low,
                "rest_seconds",
                FindingCode::RecoveryFocused,
                "Long rests make this a recovery-oriented session",
            ));
        }
    }

    if draft.rounds < 1 {
        findings.push(
            Finding::new(
                FindingKind::Error,
                Priority::Critical,
                "rounds",
                FindingCode::RoundsTooLow,
                "At least one round is required",
            )
            .suggest("Set rounds to 1 or more"),
        );
    } else if draft.rounds > limits.max_rounds {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                Priority::Medium,
                "rounds",
                FindingCode::RoundsHigh,
                format!("More than {} rounds is a very long session", limits.max_rounds),
            )
            .suggest("Reduce rounds or split the workout"),
        );
    }

    if draft.prep_seconds > limits.max_prep_seconds {
        findings.push(Finding::new(
            FindingKind::Warning,
            Priority::Low,
            "prep_seconds",
            FindingCode::PrepTimeLong,
            format!("Preparation longer than {}s", limits.max_prep_seconds),
        ));
    }

    findings
}

/// Exercise list checks. An empty list short-circuits everything else.
pub fn exercises(ids: &[String], catalog: &Catalog) -> Vec<Finding> {
    let mut findings = Vec::new();

    if ids.is_empty() {
        findings.push(
            Finding::new(
                FindingKind::Error,
                Priority::Critical,
                "exercises",
                FindingCode::NoExercises,
                "Select at least one exercise",
            )
            .suggest("Add exercises from the catalog"),
        );
        return findings;
    }

    if ids.len() == 1 {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                Priority::Medium,
                "exercises",
                FindingCode::SingleExercise,
                "Only one exercise selected",
            )
            .suggest("Add variety with 3-6 exercises"),
        );
    } else if ids.len() > MAX_RECOMMENDED_EXERCISES {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                Priority::Medium,
                "exercises",
                FindingCode::TooManyExercises,
                format!("More than {MAX_RECOMMENDED_EXERCISES} exercises per round"),
            )
            .suggest("Trim the list or split it across workouts"),
        );
    }

    for (i, id) in ids.iter().enumerate() {
        if !catalog.contains_exercise(id) {
            findings.push(
                Finding::new(
                    FindingKind::Error,
                    Priority::High,
                    format!("exercises[{i}]"),
                    FindingCode::UnknownExercise,
                    format!("Unknown exercise '{id}'"),
                )
                .suggest("Remove it or pick an exercise from the catalog"),
            );
        }
    }

    let groups: Vec<(usize, MuscleGroup)> = ids
        .iter()
        .enumerate()
        .filter_map(|(i, id)| catalog.exercise(id).map(|e| (i, e.muscle_group)))
        .collect();

    if ids.len() > SINGLE_EXERCISE_GROUP_MIN
        && !groups.is_empty()
        && groups.iter().all(|(_, g)| *g == groups[0].1)
    {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                Priority::Medium,
                "exercises",
                FindingCode::SingleMuscleGroup,
                format!("Every exercise targets {}", groups[0].1.as_str()),
            )
            .suggest("Mix in other muscle groups for balance"),
        );
    }

    for pair in groups.windows(2) {
        let ((_, a), (j, b)) = (pair[0], pair[1]);
        if pair[0].0 + 1 == j && a == b {
            findings.push(Finding::new(
                FindingKind::Info,
                Priority::Low,
                format!("exercises[{j}]"),
                FindingCode::ConsecutiveMuscleGroup,
                format!("Back-to-back {} exercises", a.as_str()),
            ));
        }
    }

    findings
}

/// Name and description.
pub fn metadata(name: &str, description: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let name_len = name.trim().chars().count();

    if name_len == 0 {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                Priority::Medium,
                "name",
                FindingCode::NameMissing,
                "Workout has no name",
            )
            .suggest("Give the workout a name so you can find it later"),
        );
    } else if name_len < NAME_MIN_CHARS {
        findings.push(Finding::new(
            FindingKind::Info,
            Priority::Low,
            "name",
            FindingCode::NameShort,
            "Workout name is very short",
        ));
    } else if name_len > NAME_MAX_CHARS {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                Priority::Low,
                "name",
                FindingCode::NameLong,
                format!("Workout name is longer than {NAME_MAX_CHARS} characters"),
            )
            .suggest("Shorten the name"),
        );
    }

    if description.trim().chars().count() > DESCRIPTION_MAX_CHARS {
        findings.push(Finding::new(
            FindingKind::Info,
            Priority::Low,
            "description",
            FindingCode::DescriptionLong,
            format!("Description is longer than {DESCRIPTION_MAX_CHARS} characters"),
        ));
    }

    findings
}

/// Estimated duration and difficulty/timing agreement.
pub fn consistency(draft: &DraftConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    if !draft.exercises.is_empty() {
        if draft.estimated_minutes > LONG_WORKOUT_MINUTES {
            findings.push(
                Finding::new(
                    FindingKind::Warning,
                    Priority::Medium,
                    "estimated_minutes",
                    FindingCode::DurationLong,
                    format!("Workout runs about {} minutes", draft.estimated_minutes),
                )
                .suggest("Reduce rounds or exercises to stay under an hour"),
            );
        } else if draft.estimated_minutes < SHORT_WORKOUT_MINUTES {
            findings.push(Finding::new(
                FindingKind::Info,
                Priority::Low,
                "estimated_minutes",
                FindingCode::DurationShort,
                "A quick session under 5 minutes",
            ));
        }
    }

    match draft.difficulty {
        Some(Difficulty::Beginner) => {
            if draft.work_seconds > BEGINNER_MAX_WORK_SECONDS {
                findings.push(
                    Finding::new(
                        FindingKind::Warning,
                        Priority::Medium,
                        "difficulty",
                        FindingCode::BeginnerWorkTooLong,
                        "Work intervals are long for a beginner workout",
                    )
                    .suggest(format!("Keep beginner work at {BEGINNER_MAX_WORK_SECONDS}s or less")),
                );
            }
            if draft.rest_seconds < draft.work_seconds {
                findings.push(
                    Finding::new(
                        FindingKind::Warning,
                        Priority::Medium,
                        "difficulty",
                        FindingCode::BeginnerRestTooShort,
                        "Beginners usually rest at least as long as they work",
                    )
                    .suggest("Match rest time to work time"),
                );
            }
        }
        Some(Difficulty::Advanced) if draft.work_seconds < ADVANCED_MIN_WORK_SECONDS => {
            findings.push(Finding::new(
                FindingKind::Info,
                Priority::Low,
                "difficulty",
                FindingCode::AdvancedWorkShort,
                "Short work intervals for an advanced workout",
            ));
        }
        _ => {}
    }

    findings
}
