//! Draft workout configuration edited by the wizard.

use serde::{Deserialize, Serialize};

use crate::catalog::{estimate_minutes, Difficulty, Timing, WorkoutPlan};
use crate::config::TimingLimits;
use crate::validation::{FindingKind, ValidationReport};

/// Wizard step: timing, then exercises, then review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Timing,
    Exercises,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Timing, WizardStep::Exercises, WizardStep::Review];

    /// 1-based step number.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Timing => 1,
            WizardStep::Exercises => 2,
            WizardStep::Review => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(WizardStep::Timing),
            2 => Some(WizardStep::Exercises),
            3 => Some(WizardStep::Review),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number().saturating_sub(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftConfig {
    pub work_seconds: u32,
    pub rest_seconds: u32,
    pub prep_seconds: u32,
    pub rounds: u32,
    pub exercises: Vec<String>,
    pub difficulty: Option<Difficulty>,
    pub name: String,
    pub description: String,
    pub estimated_minutes: u32,
    /// Output of the last full validation run.
    #[serde(default)]
    pub validation: ValidationReport,
    pub step: WizardStep,
    pub dirty: bool,
}

impl DraftConfig {
    /// An empty draft seeded with the configured timing defaults.
    pub fn with_defaults(limits: &TimingLimits) -> Self {
        let mut draft = Self {
            work_seconds: limits.default_work_seconds,
            rest_seconds: limits.default_rest_seconds,
            prep_seconds: limits.default_prep_seconds,
            rounds: limits.default_rounds,
            exercises: Vec::new(),
            difficulty: None,
            name: String::new(),
            description: String::new(),
            estimated_minutes: 0,
            validation: ValidationReport::default(),
            step: WizardStep::Timing,
            dirty: false,
        };
        draft.recompute_estimate();
        draft
    }

    pub fn recompute_estimate(&mut self) {
        self.estimated_minutes = estimate_minutes(
            self.work_seconds,
            self.rest_seconds,
            self.prep_seconds,
            self.rounds,
            self.exercises.len(),
        );
    }

    pub fn errors(&self) -> impl Iterator<Item = &crate::validation::Finding> {
        self.validation.of_kind(FindingKind::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &crate::validation::Finding> {
        self.validation.of_kind(FindingKind::Warning)
    }

    pub fn infos(&self) -> impl Iterator<Item = &crate::validation::Finding> {
        self.validation.of_kind(FindingKind::Info)
    }

    /// Build the plan this draft describes. Does not validate.
    pub fn to_plan(&self) -> WorkoutPlan {
        WorkoutPlan {
            id: slugify(&self.name),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            difficulty: self.difficulty.unwrap_or(Difficulty::Intermediate),
            estimated_minutes: self.estimated_minutes,
            exercises: self.exercises.clone(),
            timing: Timing {
                work_seconds: self.work_seconds,
                rest_seconds: self.rest_seconds,
                rounds: self.rounds,
                prep_seconds: Some(self.prep_seconds),
            },
        }
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "custom-workout".to_string()
    } else {
        slug
    }
}
