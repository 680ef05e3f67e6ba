//! Exercise session: the phase state machine and its timer.

mod phase;
mod session;

pub use phase::{Cue, Phase, Transition};
pub use session::{
    ExerciseSession, SessionSnapshot, BACKGROUND_PAUSE_THRESHOLD_MS, TICK_INTERVAL_MS,
};

use serde::{Deserialize, Serialize};

/// Whether cues should make sound and/or vibrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CueSettings {
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
}

/// Supplies the current cue settings to a session.
pub trait SettingsProvider {
    fn cue_settings(&self) -> CueSettings;
}

impl SettingsProvider for CueSettings {
    fn cue_settings(&self) -> CueSettings {
        *self
    }
}
