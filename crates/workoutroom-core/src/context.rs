//! Phase context classification.
//!
//! Derives "where in the workout am I" from an [`ExecutionState`]:
//!
//! - a semantic [`ContextTag`] (first exercise, final round, round transition, ...)
//! - an [`Intensity`] level from overall progress
//! - a [`ContextMetadata`] bundle (progress percentages, flags, pace quality)
//!
//! Everything here is a pure function of the execution state. It is
//! recomputed on every change and used only to pick feedback.

use serde::{Deserialize, Serialize};

use crate::timer::{ExecutionState, Phase};

/// Semantic context of the current moment.
///
/// Declaration order is match priority: the first tag whose condition holds wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextTag {
    /// Preparing before the first exercise of round 1.
    WorkoutStart,
    /// Working on the first exercise of round 1.
    FirstExercise,
    /// Working on the last exercise of the last round.
    FinalExercise,
    /// Resting after the last exercise of the last round.
    FinalRest,
    WorkoutCompletion,
    /// Working on the last exercise of a non-final round.
    RoundTransition,
    /// Resting after the last exercise of a non-final round.
    NewRoundStart,
    ExerciseTransition,
    RestRecovery,
    MidWorkoutPrep,
}

impl ContextTag {
    pub const ALL: [ContextTag; 10] = [
        ContextTag::WorkoutStart,
        ContextTag::FirstExercise,
        ContextTag::FinalExercise,
        ContextTag::FinalRest,
        ContextTag::WorkoutCompletion,
        ContextTag::RoundTransition,
        ContextTag::NewRoundStart,
        ContextTag::ExerciseTransition,
        ContextTag::RestRecovery,
        ContextTag::MidWorkoutPrep,
    ];

    /// Classify an execution state. `None` without a plan, and while idle
    /// or paused.
    pub fn classify(state: &ExecutionState) -> Option<ContextTag> {
        if !state.has_plan() {
            return None;
        }
        let opening = state.current_round == 1 && state.current_exercise_index == 0;
        let final_slot = state.is_final_exercise();
        let round_end = state.is_last_exercise_in_round();

        let tag = match state.phase() {
            Phase::Preparing if opening => ContextTag::WorkoutStart,
            Phase::Working if opening => ContextTag::FirstExercise,
            Phase::Working if final_slot => ContextTag::FinalExercise,
            Phase::Resting if final_slot => ContextTag::FinalRest,
            Phase::Completed => ContextTag::WorkoutCompletion,
            Phase::Working if round_end => ContextTag::RoundTransition,
            Phase::Resting if round_end => ContextTag::NewRoundStart,
            Phase::Working => ContextTag::ExerciseTransition,
            Phase::Resting => ContextTag::RestRecovery,
            Phase::Preparing => ContextTag::MidWorkoutPrep,
            Phase::Idle | Phase::Paused => return None,
        };
        Some(tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContextTag::WorkoutStart => "workout_start",
            ContextTag::FirstExercise => "first_exercise",
            ContextTag::FinalExercise => "final_exercise",
            ContextTag::FinalRest => "final_rest",
            ContextTag::WorkoutCompletion => "workout_completion",
            ContextTag::RoundTransition => "round_transition",
            ContextTag::NewRoundStart => "new_round_start",
            ContextTag::ExerciseTransition => "exercise_transition",
            ContextTag::RestRecovery => "rest_recovery",
            ContextTag::MidWorkoutPrep => "mid_workout_prep",
        }
    }

    pub fn is_special_moment(self) -> bool {
        matches!(
            self,
            ContextTag::WorkoutStart
                | ContextTag::FinalExercise
                | ContextTag::WorkoutCompletion
                | ContextTag::RoundTransition
        )
    }

    pub fn requires_celebration(self) -> bool {
        matches!(
            self,
            ContextTag::WorkoutCompletion | ContextTag::RoundTransition
        )
    }
}

impl std::fmt::Display for ContextTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse effort level from overall progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    Building,
    Peak,
    Sustain,
    FinalPush,
    Recovery,
}

impl Intensity {
    /// <15 Low, <35 Building, <60 Peak, <85 Sustain, <100 FinalPush,
    /// 100 Recovery.
    pub fn from_progress(percent: f64) -> Self {
        if percent < 15.0 {
            Intensity::Low
        } else if percent < 35.0 {
            Intensity::Building
        } else if percent < 60.0 {
            Intensity::Peak
        } else if percent < 85.0 {
            Intensity::Sustain
        } else if percent < 100.0 {
            Intensity::FinalPush
        } else {
            Intensity::Recovery
        }
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }
}

/// Actual seconds per exercise against the plan's work + rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceQuality {
    Excellent,
    Good,
    Acceptable,
    Slow,
}

impl PaceQuality {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 1.1 {
            PaceQuality::Excellent
        } else if ratio < 1.3 {
            PaceQuality::Good
        } else if ratio < 1.5 {
            PaceQuality::Acceptable
        } else {
            PaceQuality::Slow
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMetadata {
    /// Current round over total rounds.
    pub round_progress: f64,
    /// Position of the current exercise within the round.
    pub exercise_progress: f64,
    /// Completed exercise slots over all slots.
    pub overall_progress: f64,
    pub is_first_exercise: bool,
    pub is_last_exercise: bool,
    pub is_first_round: bool,
    pub is_final_round: bool,
    pub is_mid_workout: bool,
    pub next_exercise: Option<String>,
    /// None until at least one exercise is done.
    pub pace_quality: Option<PaceQuality>,
    pub is_special_moment: bool,
    pub requires_celebration: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseContext {
    pub context: ContextTag,
    pub intensity: Intensity,
    pub metadata: ContextMetadata,
}

impl PhaseContext {
    pub fn derive(state: &ExecutionState) -> Option<Self> {
        let context = ContextTag::classify(state)?;
        let overall = overall_progress(state);
        let exercise_count = state.exercises().len().max(1) as f64;
        let is_first_exercise = state.current_round == 1 && state.current_exercise_index == 0;
        let is_last_exercise = state.is_final_exercise();

        let metadata = ContextMetadata {
            round_progress: percent(state.current_round as f64, state.total_rounds as f64),
            exercise_progress: percent(
                (state.current_exercise_index + 1) as f64,
                exercise_count,
            ),
            overall_progress: overall,
            is_first_exercise,
            is_last_exercise,
            is_first_round: state.current_round == 1,
            is_final_round: state.is_final_round(),
            is_mid_workout: !is_first_exercise && !is_last_exercise,
            next_exercise: state.next_exercise().map(|e| e.name.clone()),
            pace_quality: pace_quality(state),
            is_special_moment: context.is_special_moment(),
            requires_celebration: context.requires_celebration(),
        };
        Some(Self {
            context,
            intensity: Intensity::from_progress(overall),
            metadata,
        })
    }
}

/// Completed over total exercise slots, 0-100.
pub fn overall_progress(state: &ExecutionState) -> f64 {
    percent(
        state.completed_exercise_count as f64,
        state.total_exercise_count as f64,
    )
}

/// Seconds spent per finished exercise against work + rest. The prep
/// countdown is excluded; it is always over once an exercise is done.
pub fn pace_quality(state: &ExecutionState) -> Option<PaceQuality> {
    let loaded = state.plan.as_ref()?;
    let timing = loaded.plan.timing;
    let ideal = (timing.work_seconds + timing.rest_seconds) as f64;
    if state.completed_exercise_count == 0 || ideal == 0.0 {
        return None;
    }
    let exercising = state
        .total_elapsed_seconds
        .saturating_sub(loaded.prep_seconds as u64);
    let actual = exercising as f64 / state.completed_exercise_count as f64;
    Some(PaceQuality::from_ratio(actual / ideal))
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        (part / whole * 100.0).clamp(0.0, 100.0)
    }
}
