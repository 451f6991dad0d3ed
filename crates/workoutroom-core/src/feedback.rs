//! Feedback cue selection.
//!
//! Maps a (context, intensity) pair to a [`FeedbackCue`] from a static
//! table. Rendering the cue (sound, vibration, on-screen message) is left
//! to the caller. The dispatcher's only state is the last fired context,
//! used to drop repeats inside the suppression window.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::config::{FeedbackConfig, IntensityMultipliers};
use crate::context::{ContextTag, Intensity, PhaseContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCue {
    pub context: ContextTag,
    pub intensity: Intensity,
    pub sound_id: String,
    /// Vibration pulses in milliseconds. Empty when vibration is off.
    pub vibration_pattern: Vec<u32>,
    /// 0.0-1.0
    pub volume_hint: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Fired(FeedbackCue),
    Suppressed { context: ContextTag, elapsed_ms: u64 },
    Muted,
}

impl DispatchOutcome {
    pub fn cue(&self) -> Option<&FeedbackCue> {
        match self {
            DispatchOutcome::Fired(cue) => Some(cue),
            _ => None,
        }
    }

    pub fn is_fired(&self) -> bool {
        matches!(self, DispatchOutcome::Fired(_))
    }
}

struct CueRow {
    sound_id: &'static str,
    vibration: &'static [u32],
    base_volume: f64,
    messages: &'static [&'static str],
}

fn cue_row(context: ContextTag) -> CueRow {
    match context {
        ContextTag::WorkoutStart => CueRow {
            sound_id: "start_bell",
            vibration: &[200, 100, 200],
            base_volume: 0.9,
            messages: &["Get ready!", "Here we go!", "Let's do this!"],
        },
        ContextTag::FirstExercise => CueRow {
            sound_id: "go_whistle",
            vibration: &[300],
            base_volume: 1.0,
            messages: &["Go! Start strong.", "First one, find your rhythm."],
        },
        ContextTag::FinalExercise => CueRow {
            sound_id: "final_horn",
            vibration: &[150, 75, 150, 75, 300],
            base_volume: 1.0,
            messages: &["Last exercise, give it everything!", "Final push, empty the tank!"],
        },
        ContextTag::FinalRest => CueRow {
            sound_id: "soft_chime",
            vibration: &[100],
            base_volume: 0.6,
            messages: &["Almost there, breathe.", "One last breather."],
        },
        ContextTag::WorkoutCompletion => CueRow {
            sound_id: "victory_fanfare",
            vibration: &[400, 100, 400, 100, 400],
            base_volume: 1.0,
            messages: &["Workout complete!", "Done! Great work.", "You crushed it!"],
        },
        ContextTag::RoundTransition => CueRow {
            sound_id: "round_gong",
            vibration: &[250, 100, 250],
            base_volume: 0.95,
            messages: &["Last one this round!", "Finish the round strong!"],
        },
        ContextTag::NewRoundStart => CueRow {
            sound_id: "round_chime",
            vibration: &[150, 100],
            base_volume: 0.7,
            messages: &["Round done! Recover.", "Next round coming up."],
        },
        ContextTag::ExerciseTransition => CueRow {
            sound_id: "go_beep",
            vibration: &[200],
            base_volume: 0.85,
            messages: &["Work!", "Keep moving!", "Stay focused!", "Push through!"],
        },
        ContextTag::RestRecovery => CueRow {
            sound_id: "rest_tone",
            vibration: &[100, 50],
            base_volume: 0.6,
            messages: &["Rest.", "Shake it out.", "Breathe deep."],
        },
        ContextTag::MidWorkoutPrep => CueRow {
            sound_id: "prep_tick",
            vibration: &[100],
            base_volume: 0.7,
            messages: &["Get set.", "Reset your stance."],
        },
    }
}

pub fn intensity_multiplier(intensity: Intensity, table: &IntensityMultipliers) -> f64 {
    match intensity {
        Intensity::Low => table.low,
        Intensity::Building => table.building,
        Intensity::Peak => table.peak,
        Intensity::Sustain => table.sustain,
        Intensity::FinalPush => table.final_push,
        Intensity::Recovery => table.recovery,
    }
}

pub struct FeedbackDispatcher {
    config: FeedbackConfig,
    last_fired: Option<(ContextTag, Instant)>,
    fired_count: u64,
    suppressed_count: u64,
}

impl FeedbackDispatcher {
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            config,
            last_fired: None,
            fired_count: 0,
            suppressed_count: 0,
        }
    }

    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    pub fn fired_count(&self) -> u64 {
        self.fired_count
    }

    pub fn suppressed_count(&self) -> u64 {
        self.suppressed_count
    }

    /// Build the cue for a pair without touching suppression state.
    pub fn cue_for(&self, context: ContextTag, intensity: Intensity) -> FeedbackCue {
        let row = cue_row(context);
        let master = self.config.volume.min(100) as f64 / 100.0;
        let multiplier = intensity_multiplier(intensity, &self.config.intensity_multipliers);
        let volume_hint = (row.base_volume * master * multiplier).clamp(0.0, 1.0);
        let message = row.messages[intensity.ordinal() % row.messages.len()];

        FeedbackCue {
            context,
            intensity,
            sound_id: row.sound_id.to_string(),
            vibration_pattern: if self.config.vibration {
                row.vibration.to_vec()
            } else {
                Vec::new()
            },
            volume_hint,
            message: message.to_string(),
        }
    }

    pub fn dispatch_context(
        &mut self,
        context: &PhaseContext,
        now: Instant,
        force: bool,
    ) -> DispatchOutcome {
        self.dispatch(context.context, context.intensity, now, force)
    }

    /// Same context again inside the suppression window is dropped unless
    /// `force` is set.
    pub fn dispatch(
        &mut self,
        context: ContextTag,
        intensity: Intensity,
        now: Instant,
        force: bool,
    ) -> DispatchOutcome {
        if !self.config.enabled {
            return DispatchOutcome::Muted;
        }

        if !force {
            if let Some((last, at)) = self.last_fired {
                let elapsed = now.saturating_duration_since(at);
                if last == context && elapsed < self.window() {
                    self.suppressed_count += 1;
                    tracing::debug!(%context, elapsed_ms = elapsed.as_millis() as u64, "feedback suppressed");
                    return DispatchOutcome::Suppressed {
                        context,
                        elapsed_ms: elapsed.as_millis() as u64,
                    };
                }
            }
        }

        let cue = self.cue_for(context, intensity);
        self.last_fired = Some((context, now));
        self.fired_count += 1;
        tracing::debug!(%context, sound = %cue.sound_id, force, "feedback fired");
        DispatchOutcome::Fired(cue)
    }

    /// Forget the last fired context.
    pub fn reset(&mut self) {
        self.last_fired = None;
    }

    fn window(&self) -> Duration {
        Duration::from_millis(self.config.suppression_window_ms)
    }
}
