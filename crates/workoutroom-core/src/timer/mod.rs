mod engine;
mod phase;

pub use engine::{Command, ExecutionState, LoadedPlan, WorkoutEngine, DEFAULT_PREP_SECONDS};
pub use phase::{ActivePhase, Phase, RunState};
