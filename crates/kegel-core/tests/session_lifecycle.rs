//! End-to-end tests: a session driven by a manual clock, persisted to an
//! on-disk database, then reflected in stats and exports.

use std::rc::Rc;
use std::sync::mpsc;

use kegel_core::storage::Snapshot;
use kegel_core::{
    Config, Database, Event, ExerciseSession, ManualClock, Phase, TrainingPlan,
};
use proptest::prelude::*;

fn drive_to_completion(session: &mut ExerciseSession, clock: &ManualClock) -> usize {
    let mut ticks = 0;
    while session.is_active() {
        clock.advance_ms(100);
        session.tick();
        ticks += 1;
        assert!(ticks < 100_000, "session never completed");
    }
    ticks
}

#[test]
fn completed_session_is_saved_and_counted() {
    let dir = tempfile::tempdir().unwrap();
    let db = Rc::new(Database::open_at(&dir.path().join("kegel.db")).unwrap());
    let clock = ManualClock::new(1_780_000_000_000);
    let (tx, rx) = mpsc::channel();

    let mut session = ExerciseSession::new(clock.clone())
        .with_store(Rc::clone(&db))
        .with_notifier(tx)
        .with_settings(Config::default());
    let plan = TrainingPlan::custom(2, 2, 2, 3, 5).unwrap();
    let planned = plan.duration_secs();
    assert!(session.start(plan));

    drive_to_completion(&mut session, &clock);
    assert_eq!(session.phase(), Phase::Complete);

    let records = db.list_sessions(10).unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].completed);
    assert_eq!(records[0].completed_sets, 2);
    assert_eq!(records[0].completed_reps, 6);
    // Each boundary is noticed on the first tick at or past it.
    assert!(records[0].duration_secs >= planned);
    assert!(records[0].duration_secs <= planned + 1);

    let stats = db.stats().unwrap();
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.current_streak, 1);

    let completed = rx
        .try_iter()
        .filter_map(|e| match e {
            Event::SessionCompleted { summary, .. } => Some(summary),
            _ => None,
        })
        .next()
        .unwrap();
    assert_eq!(completed.record_id, Some(records[0].id));
}

#[test]
fn pauses_do_not_count_toward_recorded_duration() {
    let db = Rc::new(Database::open_in_memory().unwrap());
    let clock = ManualClock::new(1_780_000_000_000);
    let mut session = ExerciseSession::new(clock.clone()).with_store(Rc::clone(&db));
    session.start(TrainingPlan::custom(3, 3, 1, 2, 0).unwrap());

    for _ in 0..3 {
        clock.advance_secs(2);
        session.tick();
        assert!(session.pause());
        clock.advance_secs(45);
        assert!(session.resume());
    }
    drive_to_completion(&mut session, &clock);

    let record = &db.list_sessions(1).unwrap()[0];
    assert!(record.duration_secs < 30, "recorded {}s", record.duration_secs);
    assert_eq!(session.accumulated_paused_ms(), 135_000);
}

#[test]
fn session_restarts_after_completion() {
    let clock = ManualClock::new(0);
    let mut session = ExerciseSession::new(clock.clone());
    session.start(TrainingPlan::custom(1, 1, 1, 1, 0).unwrap());
    drive_to_completion(&mut session, &clock);
    assert!(session.start("beginner"));
    assert_eq!(session.phase(), Phase::Prepare);
}

#[test]
fn export_includes_saved_history() {
    let db = Rc::new(Database::open_in_memory().unwrap());
    let clock = ManualClock::new(1_780_000_000_000);
    let mut session = ExerciseSession::new(clock.clone()).with_store(Rc::clone(&db));
    session.start("beginner");
    drive_to_completion(&mut session, &clock);

    let snapshot = Snapshot::capture(&db, &Config::default()).unwrap();
    assert_eq!(snapshot.sessions.len(), 1);
    assert_eq!(snapshot.stats.total_sessions, 1);
    assert_eq!(snapshot.sessions[0].plan_name, "beginner");
}

proptest! {
    #[test]
    fn progress_stays_in_unit_interval(
        contract in 1u64..6,
        relax in 1u64..6,
        sets in 1u32..4,
        reps in 1u32..5,
        rest in 0u64..6,
        step_ms in 100u64..2_500,
    ) {
        let clock = ManualClock::new(0);
        let mut session = ExerciseSession::new(clock.clone());
        session.start(TrainingPlan::custom(contract, relax, sets, reps, rest).unwrap());
        let mut last = 0.0;
        while session.is_active() {
            clock.advance_ms(step_ms);
            session.tick();
            let progress = session.progress();
            prop_assert!((0.0..=1.0).contains(&progress));
            last = progress;
        }
        prop_assert_eq!(last, 1.0);
        prop_assert_eq!(session.current_set(), sets);
    }
}
