use serde::{Deserialize, Serialize};

/// Externally visible phase of a workout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Preparing,
    Working,
    Resting,
    Paused,
    Completed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Preparing => "preparing",
            Phase::Working => "working",
            Phase::Resting => "resting",
            Phase::Paused => "paused",
            Phase::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A phase that has a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivePhase {
    Preparing,
    Working,
    Resting,
}

impl From<ActivePhase> for Phase {
    fn from(phase: ActivePhase) -> Self {
        match phase {
            ActivePhase::Preparing => Phase::Preparing,
            ActivePhase::Working => Phase::Working,
            ActivePhase::Resting => Phase::Resting,
        }
    }
}

/// Run state of the engine.
///
/// Paused keeps the interrupted phase so resume restores it exactly.
/// Active/paused flags are derived from this, so no combination such as
/// "active while idle" can be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "phase", rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running(ActivePhase),
    Paused(ActivePhase),
    Completed,
}

impl RunState {
    pub fn phase(self) -> Phase {
        match self {
            RunState::Idle => Phase::Idle,
            RunState::Running(p) => p.into(),
            RunState::Paused(_) => Phase::Paused,
            RunState::Completed => Phase::Completed,
        }
    }

    /// The countdown phase, whether running or paused.
    pub fn active_phase(self) -> Option<ActivePhase> {
        match self {
            RunState::Running(p) | RunState::Paused(p) => Some(p),
            RunState::Idle | RunState::Completed => None,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, RunState::Running(_))
    }

    pub fn is_paused(self) -> bool {
        matches!(self, RunState::Paused(_))
    }

    pub fn in_progress(self) -> bool {
        matches!(self, RunState::Running(_) | RunState::Paused(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_reports_paused_phase_but_keeps_underlying() {
        let state = RunState::Paused(ActivePhase::Working);
        assert_eq!(state.phase(), Phase::Paused);
        assert_eq!(state.active_phase(), Some(ActivePhase::Working));
        assert!(!state.is_active());
        assert!(state.is_paused());
    }

    #[test]
    fn serializes_tagged() {
        let json = serde_json::to_string(&RunState::Running(ActivePhase::Resting)).unwrap();
        assert_eq!(json, r#"{"status":"running","phase":"resting"}"#);
        let json = serde_json::to_string(&RunState::Idle).unwrap();
        assert_eq!(json, r#"{"status":"idle"}"#);
    }
}
