use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exercise::{Cue, Phase};

/// Every state change of an exercise session produces an Event.
/// The view renders them; nothing is acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        plan_name: String,
        planned_secs: u64,
        at: DateTime<Utc>,
    },
    /// Full snapshot, emitted whenever phase, set, rep or run state changes.
    StateChanged {
        active: bool,
        paused: bool,
        phase: Phase,
        current_set: u32,
        current_rep: u32,
        remaining_secs: u64,
        total_phase_secs: u64,
        at: DateTime<Utc>,
    },
    TimerTick {
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
    },
    /// Sound/vibration cue for the view to play.
    Cue {
        cue: Cue,
        sound: bool,
        vibration: bool,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The view was hidden long enough that the session paused itself.
    AutoPaused {
        hidden_ms: u64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        summary: SessionSummary,
        at: DateTime<Utc>,
    },
    SessionStopped {
        summary: SessionSummary,
        at: DateTime<Utc>,
    },
}

/// What a finished or abandoned session achieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub plan_name: String,
    pub duration_secs: u64,
    pub completed: bool,
    pub completed_sets: u32,
    pub completed_reps: u32,
    /// Id assigned by the store, if the record was persisted.
    pub record_id: Option<i64>,
}

/// Receives session events. Delivery is fire-and-forget.
pub trait Notifier {
    fn notify(&self, event: Event);
}

impl Notifier for std::sync::mpsc::Sender<Event> {
    fn notify(&self, event: Event) {
        // A dropped receiver just means nobody is watching.
        let _ = self.send(event);
    }
}

impl<F> Notifier for F
where
    F: Fn(Event),
{
    fn notify(&self, event: Event) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::sync::mpsc;

    #[test]
    fn channel_notifier_ignores_disconnected_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        tx.notify(Event::TimerTick {
            remaining_secs: 1,
            total_secs: 3,
            progress: 0.0,
        });
    }

    #[test]
    fn closure_notifier_receives_events() {
        let seen = RefCell::new(Vec::new());
        let notifier = |event: Event| seen.borrow_mut().push(event);
        notifier.notify(Event::Resumed {
            remaining_secs: 4,
            at: Utc::now(),
        });
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(Event::TimerTick {
            remaining_secs: 2,
            total_secs: 3,
            progress: 0.5,
        })
        .unwrap();
        assert_eq!(json["type"], "timer_tick");
        assert_eq!(json["remaining_secs"], 2);
    }
}
