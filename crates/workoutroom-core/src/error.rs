//! Core error types for workoutroom-core.
//!
//! Expected domain failures (starting without a plan, pausing an idle
//! session, a wizard step that is not ready) are returned as values from
//! this hierarchy. Validation findings are not errors; they live in
//! [`crate::validation`].

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::Finding;

/// Core error type for workoutroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Execution command failures
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration wizard failures
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog-related errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Structured failure of a workout command.
///
/// The engine state is left untouched whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("no workout plan loaded")]
    NoPlanLoaded,

    #[error("workout is already active")]
    AlreadyActive,

    #[error("workout is already completed")]
    AlreadyCompleted,

    #[error("workout is paused; resume it instead")]
    SessionPaused,

    #[error("workout is not active")]
    NotActive,

    #[error("workout is not paused")]
    NotPaused,

    #[error("a workout is in progress; stop it before loading another plan")]
    SessionInProgress,

    #[error("workout plan not found: {0}")]
    PlanNotFound(String),

    #[error("unknown exercise '{exercise_id}' in plan '{plan_id}'")]
    UnknownExercise { plan_id: String, exercise_id: String },

    #[error("invalid workout plan: {0}")]
    InvalidPlan(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("session lock poisoned")]
    LockPoisoned,
}

/// Configuration wizard failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    /// A forward step transition was refused.
    #[error("cannot leave step {step}: {reason}")]
    StepBlocked { step: u8, reason: String },

    /// A preset did not have the shape of a workout plan.
    #[error("invalid preset: {0}")]
    InvalidPreset(String),

    /// Full validation found blocking errors.
    #[error("configuration has {} blocking finding(s)", .0.len())]
    Blocked(Vec<Finding>),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Config directory could not be determined or created
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
