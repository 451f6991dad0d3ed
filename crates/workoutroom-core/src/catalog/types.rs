use serde::{Deserialize, Serialize};

/// Primary muscle group an exercise trains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Core,
    Legs,
    Glutes,
    FullBody,
    Cardio,
}

impl MuscleGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Arms => "arms",
            MuscleGroup::Core => "core",
            MuscleGroup::Legs => "legs",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::FullBody => "full_body",
            MuscleGroup::Cardio => "cardio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A catalog exercise. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub muscle_group: MuscleGroup,
    #[serde(default)]
    pub secondary_muscles: Vec<MuscleGroup>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Suggested work duration in seconds.
    pub default_duration: u32,
    #[serde(default)]
    pub start_glyph: String,
    #[serde(default)]
    pub end_glyph: String,
}

/// Work/rest/rounds block of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub work_seconds: u32,
    pub rest_seconds: u32,
    pub rounds: u32,
    /// Countdown before the first exercise. Falls back to the configured
    /// default when absent.
    #[serde(default)]
    pub prep_seconds: Option<u32>,
}

/// A workout plan: ordered exercise ids plus timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    /// Estimated duration in minutes.
    #[serde(default)]
    pub estimated_minutes: u32,
    pub exercises: Vec<String>,
    pub timing: Timing,
}

impl WorkoutPlan {
    /// Check the structural invariants every runnable plan must hold.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("plan name must not be empty".into());
        }
        if self.exercises.is_empty() {
            return Err("plan must contain at least one exercise".into());
        }
        if self.timing.work_seconds == 0 {
            return Err("work duration must be at least 1 second".into());
        }
        if self.timing.rounds == 0 {
            return Err("rounds must be at least 1".into());
        }
        Ok(())
    }

    /// Total number of exercise slots (`exercises x rounds`).
    pub fn total_exercise_count(&self) -> u32 {
        (self.exercises.len() as u32).saturating_mul(self.timing.rounds)
    }
}

/// Estimated workout length in whole minutes, rounded up.
///
/// Every exercise slot is followed by a rest, including the last one.
pub fn estimate_minutes(
    work_seconds: u32,
    rest_seconds: u32,
    prep_seconds: u32,
    rounds: u32,
    exercise_count: usize,
) -> u32 {
    let slots = (exercise_count as u64).saturating_mul(rounds as u64);
    let total = slots
        .saturating_mul(work_seconds as u64 + rest_seconds as u64)
        .saturating_add(prep_seconds as u64);
    total.div_ceil(60).min(u32::MAX as u64) as u32
}
