//! Exercise and workout-plan catalog.
//!
//! Read-only lookup tables. The engine and validator consult the catalog by
//! id; nothing in the crate mutates a catalog after it is built.

mod builtin;
mod types;

pub use types::{estimate_minutes, Difficulty, Exercise, MuscleGroup, Timing, WorkoutPlan};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CommandError, CoreError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    exercises: Vec<Exercise>,
    #[serde(default)]
    plans: Vec<WorkoutPlan>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    exercises: BTreeMap<String, Exercise>,
    plans: Vec<WorkoutPlan>,
}

impl Catalog {
    pub fn new(exercises: Vec<Exercise>, plans: Vec<WorkoutPlan>) -> Self {
        Self {
            exercises: exercises.into_iter().map(|e| (e.id.clone(), e)).collect(),
            plans,
        }
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        Self::new(builtin::exercises(), builtin::plans())
    }

    /// Parse a catalog from TOML (`[[exercises]]` and `[[plans]]` tables).
    ///
    /// Plans referencing exercises that are not in the same file are rejected.
    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        let file: CatalogFile = toml::from_str(content)?;
        let catalog = Self::new(file.exercises, file.plans);
        for plan in &catalog.plans {
            plan.check_shape()
                .map_err(|e| CoreError::Catalog(format!("plan '{}': {e}", plan.id)))?;
            catalog.resolve_exercises(plan)?;
        }
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.get(id)
    }

    pub fn contains_exercise(&self, id: &str) -> bool {
        self.exercises.contains_key(id)
    }

    pub fn exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.values()
    }

    pub fn plan(&self, id: &str) -> Option<&WorkoutPlan> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub fn plans(&self) -> &[WorkoutPlan] {
        &self.plans
    }

    /// Resolve a plan's exercise ids to records, in plan order.
    pub fn resolve_exercises(&self, plan: &WorkoutPlan) -> Result<Vec<Exercise>, CommandError> {
        plan.exercises
            .iter()
            .map(|id| {
                self.exercise(id)
                    .cloned()
                    .ok_or_else(|| CommandError::UnknownExercise {
                        plan_id: plan.id.clone(),
                        exercise_id: id.clone(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_plans_resolve() {
        let catalog = Catalog::builtin();
        assert!(!catalog.plans().is_empty());
        for plan in catalog.plans() {
            assert!(plan.check_shape().is_ok(), "{} malformed", plan.id);
            let exercises = catalog.resolve_exercises(plan).unwrap();
            assert_eq!(exercises.len(), plan.exercises.len());
        }
    }

    #[test]
    fn builtin_estimates_match_timing() {
        let catalog = Catalog::builtin();
        for plan in catalog.plans() {
            let t = plan.timing;
            let estimate = estimate_minutes(
                t.work_seconds,
                t.rest_seconds,
                10,
                t.rounds,
                plan.exercises.len(),
            );
            assert_eq!(plan.estimated_minutes, estimate, "{}", plan.id);
        }
    }

    #[test]
    fn resolve_reports_missing_exercise() {
        let catalog = Catalog::builtin();
        let mut plan = catalog.plan("quick-start").unwrap().clone();
        plan.exercises.push("moonwalk".into());
        let err = catalog.resolve_exercises(&plan).unwrap_err();
        assert_eq!(
            err,
            CommandError::UnknownExercise {
                plan_id: "quick-start".into(),
                exercise_id: "moonwalk".into(),
            }
        );
    }

    #[test]
    fn from_toml_parses_custom_catalog() {
        let toml_str = r#"
            [[exercises]]
            id = "skips"
            name = "Skips"
            muscle_group = "cardio"
            difficulty = "beginner"
            default_duration = 20

            [[plans]]
            id = "skip-it"
            name = "Skip It"
            difficulty = "beginner"
            exercises = ["skips"]
            timing = { work_seconds = 20, rest_seconds = 10, rounds = 2 }
        "#;
        let catalog = Catalog::from_toml_str(toml_str).unwrap();
        assert!(catalog.contains_exercise("skips"));
        assert_eq!(catalog.plan("skip-it").unwrap().timing.rounds, 2);
    }

    #[test]
    fn from_toml_rejects_dangling_plan() {
        let toml_str = r#"
            [[plans]]
            id = "ghost"
            name = "Ghost"
            difficulty = "beginner"
            exercises = ["nobody"]
            timing = { work_seconds = 20, rest_seconds = 10, rounds = 1 }
        "#;
        assert!(Catalog::from_toml_str(toml_str).is_err());
    }
}
