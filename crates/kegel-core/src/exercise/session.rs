//! Exercise session state machine.
//!
//! Like the rest of the core this is wall-clock based and owns no thread:
//! the caller invokes `tick()` periodically (every [`TICK_INTERVAL_MS`]).
//! Remaining phase time is derived from timestamps on each tick, so the
//! tick period only bounds how late a phase boundary is noticed.
//!
//! ## Phases
//!
//! ```text
//! Prepare -> Contract -> Relax -> (Contract -> Relax)* -> Rest -> Contract -> ... -> Complete
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = ExerciseSession::new(SystemClock).with_store(db);
//! session.start("beginner");
//! // In a loop:
//! session.tick();
//! ```

use serde::{Deserialize, Serialize};

use super::phase::{Cue, Phase};
use super::{CueSettings, SettingsProvider};
use crate::clock::Clock;
use crate::events::{Event, Notifier, SessionSummary};
use crate::plan::{PlanChoice, TrainingPlan, PREPARE_SECS};
use crate::storage::{NewSessionRecord, SessionStore};

/// Suggested period between `tick()` calls.
pub const TICK_INTERVAL_MS: u64 = 100;

/// Hidden time after which the session pauses itself on becoming visible.
pub const BACKGROUND_PAUSE_THRESHOLD_MS: u64 = 5_000;

/// Point-in-time view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub active: bool,
    pub paused: bool,
    pub phase: Phase,
    pub current_set: u32,
    pub current_rep: u32,
    pub remaining_secs: u64,
    pub total_phase_secs: u64,
    pub progress: f64,
    pub plan_name: Option<String>,
}

#[derive(Debug, Clone)]
struct RunState {
    active: bool,
    paused: bool,
    phase: Phase,
    current_set: u32,
    current_rep: u32,
    plan: Option<TrainingPlan>,
    session_start_ms: u64,
    phase_start_ms: u64,
    pause_start_ms: Option<u64>,
    accumulated_paused_ms: u64,
    remaining_secs: u64,
    hidden_since_ms: Option<u64>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            active: false,
            paused: false,
            phase: Phase::Prepare,
            current_set: 1,
            current_rep: 1,
            plan: None,
            session_start_ms: 0,
            phase_start_ms: 0,
            pause_start_ms: None,
            accumulated_paused_ms: 0,
            remaining_secs: 0,
            hidden_since_ms: None,
        }
    }
}

/// One exercise session at a time.
///
/// Collaborators are optional; when one is missing the behavior depending
/// on it is skipped.
pub struct ExerciseSession {
    clock: Box<dyn Clock>,
    store: Option<Box<dyn SessionStore>>,
    notifier: Option<Box<dyn Notifier>>,
    settings: Option<Box<dyn SettingsProvider>>,
    cues: CueSettings,
    run: RunState,
}

impl ExerciseSession {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            store: None,
            notifier: None,
            settings: None,
            cues: CueSettings::default(),
            run: RunState::default(),
        }
    }

    pub fn with_store(mut self, store: impl SessionStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn with_settings(mut self, settings: impl SettingsProvider + 'static) -> Self {
        self.cues = settings.cue_settings();
        self.settings = Some(Box::new(settings));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.run.active
    }

    pub fn is_paused(&self) -> bool {
        self.run.paused
    }

    /// Active and not paused: the only state in which ticks do anything.
    pub fn is_running(&self) -> bool {
        self.run.active && !self.run.paused
    }

    pub fn phase(&self) -> Phase {
        self.run.phase
    }

    pub fn current_set(&self) -> u32 {
        self.run.current_set
    }

    pub fn current_rep(&self) -> u32 {
        self.run.current_rep
    }

    pub fn plan(&self) -> Option<&TrainingPlan> {
        self.run.plan.as_ref()
    }

    pub fn cue_settings(&self) -> CueSettings {
        self.cues
    }

    /// Whole seconds left in the current phase, as of the last tick.
    pub fn phase_time_remaining_secs(&self) -> u64 {
        self.run.remaining_secs
    }

    pub fn phase_duration_secs(&self) -> u64 {
        match (&self.run.plan, self.run.phase) {
            (_, Phase::Prepare) => PREPARE_SECS,
            (Some(plan), phase) => phase.duration_secs(plan),
            (None, _) => 0,
        }
    }

    pub fn accumulated_paused_ms(&self) -> u64 {
        self.run.accumulated_paused_ms
    }

    /// Session time so far, excluding every paused interval.
    pub fn elapsed_active_ms(&self) -> u64 {
        if self.run.plan.is_none() {
            return 0;
        }
        self.elapsed_active_ms_at(self.clock.now_ms())
    }

    /// Reps fully done: both contract and relax finished.
    pub fn completed_reps(&self) -> u32 {
        let Some(plan) = &self.run.plan else {
            return 0;
        };
        if self.run.phase == Phase::Complete {
            return plan.total_reps();
        }
        (self.run.current_set - 1) * plan.reps_per_set + (self.run.current_rep - 1)
    }

    /// 0.0 ..= 1.0 progress across the whole plan.
    pub fn progress(&self) -> f64 {
        let Some(plan) = &self.run.plan else {
            return 0.0;
        };
        if self.run.phase == Phase::Complete {
            return 1.0;
        }
        let total = plan.total_reps();
        if total == 0 {
            return 0.0;
        }
        let duration = self.phase_duration_secs();
        let fraction = if self.run.phase.is_rep_phase() && duration > 0 {
            duration.saturating_sub(self.run.remaining_secs) as f64 / duration as f64
        } else {
            0.0
        };
        ((self.completed_reps() as f64 + fraction) / total as f64).clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active: self.run.active,
            paused: self.run.paused,
            phase: self.run.phase,
            current_set: self.run.current_set,
            current_rep: self.run.current_rep,
            remaining_secs: self.run.remaining_secs,
            total_phase_secs: self.phase_duration_secs(),
            progress: self.progress(),
            plan_name: self.run.plan.as_ref().map(|p| p.name.clone()),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a session. Fails if one is already active or the plan is invalid.
    pub fn start(&mut self, choice: impl Into<PlanChoice>) -> bool {
        if self.run.active {
            tracing::debug!("start ignored: session already active");
            return false;
        }
        let plan = match choice.into().resolve() {
            Ok(plan) => plan,
            Err(e) => {
                tracing::debug!("start refused: {e}");
                return false;
            }
        };
        if let Some(settings) = &self.settings {
            self.cues = settings.cue_settings();
        }

        let now = self.clock.now_ms();
        let planned_secs = plan.duration_secs();
        let plan_name = plan.name.clone();
        self.run = RunState {
            active: true,
            plan: Some(plan),
            session_start_ms: now,
            phase_start_ms: now,
            remaining_secs: PREPARE_SECS,
            ..RunState::default()
        };
        tracing::info!(plan = %plan_name, "exercise session started");

        self.emit(Event::SessionStarted {
            plan_name,
            planned_secs,
            at: self.clock.now(),
        });
        self.emit_state();
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let now = self.clock.now_ms();
        self.refresh_remaining(now);
        self.pause_at(now);
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.run.active || !self.run.paused {
            return false;
        }
        let now = self.clock.now_ms();
        if let Some(paused_at) = self.run.pause_start_ms.take() {
            self.run.accumulated_paused_ms += now.saturating_sub(paused_at);
        }
        // Rebase so the time already spent in this phase is preserved.
        let spent_secs = self
            .phase_duration_secs()
            .saturating_sub(self.run.remaining_secs);
        self.run.phase_start_ms = now.saturating_sub(spent_secs.saturating_mul(1000));
        self.run.paused = false;

        self.emit(Event::Resumed {
            remaining_secs: self.run.remaining_secs,
            at: self.clock.now(),
        });
        self.emit_state();
        true
    }

    /// Abandon the active session.
    ///
    /// A record is kept only when progress went past the first rep of the
    /// first set.
    pub fn stop(&mut self) -> bool {
        if !self.run.active {
            return false;
        }
        let now = self.clock.now_ms();
        let made_progress = self.run.current_set > 1 || self.run.current_rep > 1;
        let mut summary = self.summary(now, false);

        if made_progress {
            summary.record_id = self.persist(&summary);
        }
        tracing::info!(
            completed_reps = summary.completed_reps,
            saved = summary.record_id.is_some(),
            "exercise session stopped"
        );

        self.run = RunState::default();
        self.emit(Event::SessionStopped {
            summary,
            at: self.clock.now(),
        });
        self.emit_state();
        true
    }

    /// Call periodically. No-op while inactive or paused.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }
        let now = self.clock.now_ms();
        self.refresh_remaining(now);
        self.emit(Event::TimerTick {
            remaining_secs: self.run.remaining_secs,
            total_secs: self.phase_duration_secs(),
            progress: self.progress(),
        });
        if self.run.remaining_secs == 0 {
            self.advance(now);
        }
    }

    /// Host view visibility changed. Returns `true` if this auto-paused
    /// the session.
    ///
    /// Periodic ticks are unreliable while hidden, so a session that was
    /// hidden longer than [`BACKGROUND_PAUSE_THRESHOLD_MS`] is paused at
    /// its last observed remaining time rather than fast-forwarded.
    pub fn on_visibility_changed(&mut self, hidden: bool) -> bool {
        let now = self.clock.now_ms();
        if hidden {
            self.run.hidden_since_ms = self.is_running().then_some(now);
            return false;
        }
        let Some(since) = self.run.hidden_since_ms.take() else {
            return false;
        };
        if !self.is_running() {
            return false;
        }
        let hidden_ms = now.saturating_sub(since);
        if hidden_ms <= BACKGROUND_PAUSE_THRESHOLD_MS {
            return false;
        }
        tracing::info!(hidden_ms, "auto-pausing after background period");
        self.pause_at(now);
        self.emit(Event::AutoPaused {
            hidden_ms,
            at: self.clock.now(),
        });
        true
    }

    /// Settings changed: take the new cue preferences.
    pub fn apply_settings(&mut self, cues: CueSettings) {
        self.cues = cues;
    }

    /// Re-read cue preferences from the attached provider, if any.
    pub fn on_settings_changed(&mut self) {
        if let Some(settings) = &self.settings {
            self.cues = settings.cue_settings();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn refresh_remaining(&mut self, now: u64) {
        let elapsed_secs = now.saturating_sub(self.run.phase_start_ms) / 1000;
        self.run.remaining_secs = self.phase_duration_secs().saturating_sub(elapsed_secs);
    }

    fn pause_at(&mut self, now: u64) {
        self.run.pause_start_ms = Some(now);
        self.run.paused = true;
        self.run.hidden_since_ms = None;
        self.emit(Event::Paused {
            remaining_secs: self.run.remaining_secs,
            at: self.clock.now(),
        });
        self.emit_state();
    }

    fn advance(&mut self, now: u64) {
        let Some(plan) = &self.run.plan else {
            return;
        };
        let Some(transition) = self
            .run
            .phase
            .next(self.run.current_set, self.run.current_rep, plan)
        else {
            return;
        };
        let next_duration = transition.to.duration_secs(plan);
        tracing::debug!(
            from = %self.run.phase,
            to = %transition.to,
            set = transition.set,
            rep = transition.rep,
            "phase transition"
        );

        self.run.current_set = transition.set;
        self.run.current_rep = transition.rep;
        self.play_cue(transition.cue);

        if transition.to == Phase::Complete {
            self.complete(now);
            return;
        }
        self.run.phase = transition.to;
        self.run.phase_start_ms = now;
        self.run.remaining_secs = next_duration;
        self.emit_state();
    }

    fn complete(&mut self, now: u64) {
        self.run.phase = Phase::Complete;
        self.run.active = false;
        self.run.paused = false;
        self.run.remaining_secs = 0;
        self.run.hidden_since_ms = None;

        let mut summary = self.summary(now, true);
        summary.record_id = self.persist(&summary);
        tracing::info!(
            plan = %summary.plan_name,
            duration_secs = summary.duration_secs,
            "exercise session completed"
        );

        self.emit_state();
        self.emit(Event::SessionCompleted {
            summary,
            at: self.clock.now(),
        });
    }

    fn summary(&self, now: u64, completed: bool) -> SessionSummary {
        let (plan_name, sets, reps) = match &self.run.plan {
            Some(plan) if completed => (plan.name.clone(), plan.sets, plan.total_reps()),
            Some(plan) => (
                plan.name.clone(),
                self.run.current_set - 1,
                self.completed_reps(),
            ),
            None => (String::new(), 0, 0),
        };
        SessionSummary {
            plan_name,
            duration_secs: self.elapsed_active_ms_at(now) / 1000,
            completed,
            completed_sets: sets,
            completed_reps: reps,
            record_id: None,
        }
    }

    fn persist(&self, summary: &SessionSummary) -> Option<i64> {
        let store = self.store.as_ref()?;
        let record = NewSessionRecord {
            date: self.clock.now(),
            plan_name: summary.plan_name.clone(),
            duration_secs: summary.duration_secs,
            completed: summary.completed,
            completed_sets: summary.completed_sets,
            completed_reps: summary.completed_reps,
        };
        match store.save_session_record(record) {
            Ok(saved) => Some(saved.id),
            Err(e) => {
                tracing::warn!("failed to save session record: {e}");
                None
            }
        }
    }

    fn elapsed_active_ms_at(&self, now: u64) -> u64 {
        let ongoing_pause = self
            .run
            .pause_start_ms
            .map(|paused_at| now.saturating_sub(paused_at))
            .unwrap_or(0);
        now.saturating_sub(self.run.session_start_ms)
            .saturating_sub(self.run.accumulated_paused_ms)
            .saturating_sub(ongoing_pause)
    }

    fn play_cue(&self, cue: Cue) {
        self.emit(Event::Cue {
            cue,
            sound: self.cues.sound_enabled,
            vibration: self.cues.vibration_enabled,
            at: self.clock.now(),
        });
    }

    fn emit_state(&self) {
        let snap = self.snapshot();
        self.emit(Event::StateChanged {
            active: snap.active,
            paused: snap.paused,
            phase: snap.phase,
            current_set: snap.current_set,
            current_rep: snap.current_rep,
            remaining_secs: snap.remaining_secs,
            total_phase_secs: snap.total_phase_secs,
            at: self.clock.now(),
        });
    }

    fn emit(&self, event: Event) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::DatabaseError;
    use crate::storage::{Database, SessionRecord};
    use std::rc::Rc;
    use std::sync::mpsc;

    fn session() -> (ExerciseSession, ManualClock) {
        let clock = ManualClock::new(1_700_000_000_000);
        (ExerciseSession::new(clock.clone()), clock)
    }

    /// Advance one second at a time until the phase changes.
    fn run_phase(session: &mut ExerciseSession, clock: &ManualClock) {
        let phase = session.phase();
        let (set, rep) = (session.current_set(), session.current_rep());
        for _ in 0..1_000 {
            clock.advance_secs(1);
            session.tick();
            if session.phase() != phase
                || session.current_set() != set
                || session.current_rep() != rep
            {
                return;
            }
        }
        panic!("phase {phase} never ended");
    }

    /// A store whose writes always fail.
    struct FailingStore;

    impl SessionStore for FailingStore {
        fn save_session_record(
            &self,
            _record: NewSessionRecord,
        ) -> crate::error::Result<SessionRecord> {
            Err(DatabaseError::Locked.into())
        }
    }

    #[test]
    fn start_enters_prepare() {
        let (mut s, _) = session();
        assert!(s.start("beginner"));
        assert!(s.is_active());
        assert_eq!(s.phase(), Phase::Prepare);
        assert_eq!(s.current_set(), 1);
        assert_eq!(s.current_rep(), 1);
        assert_eq!(s.phase_time_remaining_secs(), 3);
    }

    #[test]
    fn start_while_active_fails_and_keeps_state() {
        let (mut s, clock) = session();
        s.start("beginner");
        clock.advance_secs(1);
        s.tick();
        let before = s.snapshot();
        assert!(!s.start("advanced"));
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn start_rejects_invalid_plans() {
        let (mut s, _) = session();
        assert!(!s.start("expert"));
        let mut plan = TrainingPlan::preset("beginner").unwrap();
        plan.contract_secs = 0;
        assert!(!s.start(plan));
        assert!(!s.is_active());
    }

    #[test]
    fn pause_and_resume_preconditions() {
        let (mut s, _) = session();
        assert!(!s.pause());
        assert!(!s.resume());
        s.start("beginner");
        assert!(!s.resume());
        assert!(s.pause());
        assert!(!s.pause());
        assert!(s.resume());
    }

    #[test]
    fn paused_interval_does_not_consume_phase_time() {
        let (mut s, clock) = session();
        s.start("intermediate");
        run_phase(&mut s, &clock);
        assert_eq!(s.phase(), Phase::Contract);
        clock.advance_secs(2);
        s.tick();
        assert_eq!(s.phase_time_remaining_secs(), 3);

        assert!(s.pause());
        clock.advance_secs(600);
        s.tick();
        assert_eq!(s.phase_time_remaining_secs(), 3);
        assert!(s.resume());
        s.tick();
        assert_eq!(s.phase_time_remaining_secs(), 3);
        assert_eq!(s.accumulated_paused_ms(), 600_000);

        clock.advance_secs(1);
        s.tick();
        assert_eq!(s.phase_time_remaining_secs(), 2);
    }

    #[test]
    fn elapsed_time_excludes_all_pauses() {
        let (mut s, clock) = session();
        s.start("beginner");
        clock.advance_secs(2);
        s.pause();
        clock.advance_secs(30);
        s.resume();
        clock.advance_secs(1);
        s.pause();
        clock.advance_secs(7);
        assert_eq!(s.elapsed_active_ms(), 3_000);
        s.resume();
        assert_eq!(s.accumulated_paused_ms(), 37_000);
        assert_eq!(s.elapsed_active_ms(), 3_000);
    }

    #[test]
    fn beginner_run_passes_through_every_phase() {
        let (tx, rx) = mpsc::channel();
        let (s, clock) = session();
        let mut s = s.with_notifier(tx);
        s.start("beginner");

        let mut segments = 1; // prepare
        while s.phase() != Phase::Complete {
            run_phase(&mut s, &clock);
            if s.phase() != Phase::Complete {
                segments += 1;
            }
        }
        assert_eq!(segments, 1 + 3 * 10 * 2 + 2);
        assert!(!s.is_active());
        assert_eq!(s.current_set(), 3);
        assert_eq!(s.current_rep(), 10);
        assert_eq!(s.progress(), 1.0);

        let events: Vec<Event> = rx.try_iter().collect();
        let rests = events
            .iter()
            .filter(|e| matches!(e, Event::Cue { cue: Cue::Rest, .. }))
            .count();
        assert_eq!(rests, 2);
        assert!(matches!(
            events.last(),
            Some(Event::SessionCompleted { summary, .. }) if summary.completed && summary.completed_reps == 30
        ));
    }

    #[test]
    fn tick_is_noop_when_idle() {
        let (tx, rx) = mpsc::channel();
        let (s, _) = session();
        let mut s = s.with_notifier(tx);
        s.tick();
        assert!(rx.try_iter().next().is_none());
    }

    #[test]
    fn late_tick_does_not_skip_phases() {
        let (mut s, clock) = session();
        s.start("beginner");
        clock.advance_secs(120);
        s.tick();
        assert_eq!(s.phase(), Phase::Contract);
        assert_eq!(s.phase_time_remaining_secs(), 3);
    }

    #[test]
    fn stop_during_first_rep_saves_nothing() {
        let db = Rc::new(Database::open_in_memory().unwrap());
        let (s, clock) = session();
        let mut s = s.with_store(Rc::clone(&db));
        s.start("beginner");
        run_phase(&mut s, &clock);
        clock.advance_secs(1);
        s.tick();
        assert!(s.stop());
        assert!(!s.is_active());
        assert_eq!(s.phase(), Phase::Prepare);
        assert!(db.list_sessions(10).unwrap().is_empty());
        assert!(!s.stop());
    }

    #[test]
    fn stop_after_progress_saves_incomplete_record() {
        let db = Rc::new(Database::open_in_memory().unwrap());
        let (s, clock) = session();
        let mut s = s.with_store(Rc::clone(&db));
        s.start("beginner");
        // prepare + 10 reps of set 1 -> rest, then contract + relax of set 2 rep 1
        for _ in 0..(1 + 20 + 1 + 2) {
            run_phase(&mut s, &clock);
        }
        assert_eq!((s.current_set(), s.current_rep()), (2, 2));
        assert!(s.stop());

        let records = db.list_sessions(10).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert!(!record.completed);
        assert_eq!(record.completed_sets, 1);
        assert_eq!(record.completed_reps, 11);
        assert_eq!(record.plan_name, "beginner");
    }

    #[test]
    fn save_failure_still_completes_session() {
        let (s, clock) = session();
        let (tx, rx) = mpsc::channel();
        let mut s = s.with_store(FailingStore).with_notifier(tx);
        s.start(TrainingPlan::custom(1, 1, 2, 2, 1).unwrap());
        while s.is_active() {
            run_phase(&mut s, &clock);
        }

        assert_eq!(s.phase(), Phase::Complete);
        assert!(!s.is_active());
        let summary = rx
            .try_iter()
            .find_map(|e| match e {
                Event::SessionCompleted { summary, .. } => Some(summary),
                _ => None,
            })
            .expect("completion event");
        assert!(summary.completed);
        assert_eq!(summary.completed_reps, 4);
        assert_eq!(summary.record_id, None);
    }

    #[test]
    fn save_failure_still_stops_session() {
        let (s, clock) = session();
        let (tx, rx) = mpsc::channel();
        let mut s = s.with_store(FailingStore).with_notifier(tx);
        s.start("beginner");
        // prepare, then contract + relax of rep 1
        for _ in 0..3 {
            run_phase(&mut s, &clock);
        }
        assert_eq!(s.current_rep(), 2);
        assert!(s.stop());

        assert!(!s.is_active());
        assert_eq!(s.phase(), Phase::Prepare);
        let summary = rx
            .try_iter()
            .find_map(|e| match e {
                Event::SessionStopped { summary, .. } => Some(summary),
                _ => None,
            })
            .expect("stop event");
        assert!(!summary.completed);
        assert_eq!(summary.completed_reps, 1);
        assert_eq!(summary.record_id, None);
    }

    #[test]
    fn progress_counts_partial_rep() {
        let (mut s, clock) = session();
        s.start(TrainingPlan::custom(4, 4, 1, 2, 0).unwrap());
        assert_eq!(s.progress(), 0.0);
        run_phase(&mut s, &clock);
        clock.advance_secs(2);
        s.tick();
        assert!((s.progress() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn short_background_never_pauses() {
        let (mut s, clock) = session();
        s.start("beginner");
        s.on_visibility_changed(true);
        clock.advance_ms(5_000);
        assert!(!s.on_visibility_changed(false));
        assert!(s.is_running());
    }

    #[test]
    fn long_background_auto_pauses() {
        let (mut s, clock) = session();
        s.start("beginner");
        s.on_visibility_changed(true);
        clock.advance_ms(5_001);
        assert!(s.on_visibility_changed(false));
        assert!(s.is_paused());
        // Remaining time is the last value observed before hiding.
        assert_eq!(s.phase_time_remaining_secs(), 3);
    }

    #[test]
    fn background_ignored_when_paused_or_idle() {
        let (mut s, clock) = session();
        s.on_visibility_changed(true);
        clock.advance_secs(60);
        assert!(!s.on_visibility_changed(false));

        s.start("beginner");
        s.pause();
        s.on_visibility_changed(true);
        clock.advance_secs(60);
        assert!(!s.on_visibility_changed(false));
        assert!(s.is_paused());
    }

    #[test]
    fn cues_follow_settings() {
        let (tx, rx) = mpsc::channel();
        let (s, clock) = session();
        let mut s = s.with_notifier(tx).with_settings(CueSettings {
            sound_enabled: true,
            vibration_enabled: false,
        });
        s.start("beginner");
        run_phase(&mut s, &clock);
        let cue = rx.try_iter().find_map(|e| match e {
            Event::Cue { cue, sound, vibration, .. } => Some((cue, sound, vibration)),
            _ => None,
        });
        assert_eq!(cue, Some((Cue::Contract, true, false)));

        s.apply_settings(CueSettings::default());
        assert_eq!(s.cue_settings(), CueSettings::default());
    }
}
