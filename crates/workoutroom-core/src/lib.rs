//! # Workoutroom Core Library
//!
//! Core logic for the Workoutroom interval-workout timer. The UI is an
//! external collaborator: it sends commands, renders the computed
//! snapshot, and receives phase-change notifications and feedback cues.
//! The `workoutroom-cli` binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Catalog**: exercise and plan lookup data, built in or loaded from TOML
//! - **Validation**: pure rules over a draft configuration, memoized in a
//!   bounded cache
//! - **Wizard**: the three-step configuration flow, gated by validation
//! - **Timer Engine**: a tick-driven state machine; the caller invokes
//!   `tick()` once per second
//! - **Scheduler**: drift guard, phase-change detection and the tokio tick task
//! - **Context / Feedback**: semantic classification of the current moment
//!   and the cue chosen for it
//!
//! ## Key Components
//!
//! - [`WorkoutEngine`]: execution state machine
//! - [`WorkoutSession`]: engine plus scheduler and feedback, with snapshots
//! - [`ConfigWizard`]: draft configuration state machine
//! - [`Validator`]: configuration rules and cache
//! - [`Config`]: application configuration management

pub mod catalog;
pub mod config;
pub mod context;
pub mod draft;
pub mod error;
pub mod events;
pub mod feedback;
pub mod scheduler;
pub mod session;
pub mod timer;
pub mod validation;
pub mod wizard;

pub use catalog::{Catalog, Difficulty, Exercise, MuscleGroup, Timing, WorkoutPlan};
pub use config::Config;
pub use context::{ContextTag, Intensity, PaceQuality, PhaseContext};
pub use draft::{DraftConfig, WizardStep};
pub use error::{CommandError, ConfigError, CoreError, WizardError};
pub use events::{Event, WorkoutSummary};
pub use feedback::{DispatchOutcome, FeedbackCue, FeedbackDispatcher};
pub use scheduler::{NotificationHistory, PhaseChange, TickDriver, TickOutcome, TickScheduler};
pub use session::{format_clock, Controls, SessionRunner, SessionSnapshot, WorkoutSession};
pub use timer::{ActivePhase, Command, ExecutionState, Phase, RunState, WorkoutEngine};
pub use validation::{Finding, FindingCode, FindingKind, Priority, ValidationReport, Validator};
pub use wizard::ConfigWizard;
