//! End-to-end scheduling scenarios against the engine, driven by a manual
//! clock and an in-memory sink.

use chrono::{DateTime, Duration, TimeZone, Utc};
use medkeeper_core::{
    Config, CoreError, ManualClock, MarkOutcome, MemorySink, Notice, ReminderEngine, SnapshotStore,
};
use tempfile::TempDir;

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// 08:00 on an arbitrary morning, UTC timezone, midnight rollover.
fn morning() -> DateTime<Utc> {
    utc(2026, 3, 10, 8, 0)
}

fn engine_at(dir: &TempDir, start: DateTime<Utc>) -> (ReminderEngine, ManualClock, MemorySink) {
    let clock = ManualClock::new(start);
    let sink = MemorySink::new();
    let store = SnapshotStore::with_path(dir.path().join("roster.json"));
    let engine = ReminderEngine::bootstrap(
        &Config::default(),
        store,
        Box::new(clock.clone()),
        Box::new(sink.clone()),
    )
    .unwrap();
    (engine, clock, sink)
}

fn reminders_in(notices: &[Notice]) -> usize {
    notices
        .iter()
        .filter(|n| matches!(n, Notice::ReminderDue { .. }))
        .count()
}

#[test]
fn reminder_fires_once_then_stays_quiet() {
    let dir = TempDir::new().unwrap();
    let (mut engine, clock, sink) = engine_at(&dir, morning());

    let next = engine.set_reminder("alice", "09:00 AM").unwrap();
    assert_eq!(next, utc(2026, 3, 10, 9, 0));

    clock.set(utc(2026, 3, 10, 9, 1));
    let outcome = engine.tick();
    assert_eq!(outcome.reminders_sent, 1);
    assert_eq!(reminders_in(&sink.take()), 1);

    clock.set(utc(2026, 3, 10, 9, 2));
    let outcome = engine.tick();
    assert_eq!(outcome.reminders_sent, 0);
    assert_eq!(reminders_in(&sink.take()), 0);
}

#[test]
fn overdue_by_many_cadences_still_fires_once() {
    let dir = TempDir::new().unwrap();
    let (mut engine, clock, sink) = engine_at(&dir, morning());

    engine.set_reminder("alice", "09:00 AM").unwrap();

    // The process stalled; the first observation is an hour late, and
    // several more ticks follow in quick succession.
    for minutes in [60, 61, 62, 90] {
        clock.set(utc(2026, 3, 10, 9, 0) + Duration::minutes(minutes));
        engine.tick();
    }
    assert_eq!(reminders_in(&sink.take()), 1);
}

#[test]
fn completing_the_day_suppresses_the_reminder() {
    let dir = TempDir::new().unwrap();
    let (mut engine, clock, sink) = engine_at(&dir, morning());

    engine.set_reminder("alice", "09:00 AM").unwrap();
    engine.mark_done("alice").unwrap();
    sink.take();

    clock.set(utc(2026, 3, 10, 9, 5));
    let outcome = engine.tick();
    assert_eq!(outcome.reminders_sent, 0);
    assert_eq!(reminders_in(&sink.take()), 0);

    // The due instant still advanced to tomorrow.
    let alice = engine.roster().get("alice").unwrap();
    assert_eq!(alice.next_reminder_at, Some(utc(2026, 3, 11, 9, 0)));
}

#[test]
fn missed_day_breaks_the_streak_exactly_once() {
    let dir = TempDir::new().unwrap();
    let (mut engine, clock, sink) = engine_at(&dir, morning());

    // Build a five-day streak.
    for day in 0..5 {
        engine.mark_done("bob").unwrap();
        clock.set(utc(2026, 3, 11 + day, 0, 1));
        engine.tick();
    }
    assert_eq!(engine.roster().get("bob").map(|u| u.streak), Some(5));
    sink.take();

    // Day six passes without a dose.
    clock.set(utc(2026, 3, 16, 0, 1));
    let outcome = engine.tick();
    assert!(outcome.rolled_over);

    let notices = sink.take();
    let broken: Vec<_> = notices
        .iter()
        .filter(|n| matches!(n, Notice::StreakBroken { .. }))
        .collect();
    assert_eq!(broken.len(), 1);
    assert!(matches!(
        broken[0],
        Notice::StreakBroken { user, streak: 5, .. } if user == "bob"
    ));
    assert_eq!(engine.roster().get("bob").map(|u| u.streak), Some(0));

    // The next tick does not repeat the break.
    clock.set(utc(2026, 3, 16, 0, 2));
    engine.tick();
    assert!(sink.take().is_empty());
}

#[test]
fn completed_day_survives_rollover_silently() {
    let dir = TempDir::new().unwrap();
    let (mut engine, clock, sink) = engine_at(&dir, morning());

    engine.mark_done("carol").unwrap();
    sink.take();

    clock.set(utc(2026, 3, 11, 0, 1));
    let outcome = engine.tick();
    assert!(outcome.rolled_over);
    assert_eq!(outcome.streaks_broken, 0);
    assert!(sink.take().is_empty());

    let carol = engine.roster().get("carol").unwrap();
    assert_eq!(carol.streak, 1);
    assert!(!carol.completed_today);
    assert!(!carol.already_reminded);
}

#[test]
fn invalid_time_is_rejected_without_side_effects() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _, sink) = engine_at(&dir, morning());

    let err = engine.set_reminder("dave", "25:99").unwrap_err();
    assert!(matches!(err, CoreError::InvalidTimeFormat { .. }));
    assert!(engine.roster().get("dave").is_none());
    assert!(sink.take().is_empty());
}

#[test]
fn fresh_start_writes_an_empty_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roster.json");
    assert!(!path.exists());

    let (engine, _, _) = engine_at(&dir, morning());
    assert!(engine.roster().is_empty());
    assert!(path.exists());

    let reloaded = SnapshotStore::with_path(&path).load().unwrap().unwrap();
    assert!(reloaded.is_empty());
}

#[test]
fn rollover_precedes_reminders_within_one_tick() {
    let dir = TempDir::new().unwrap();
    let (mut engine, clock, sink) = engine_at(&dir, morning());

    // Eve completed today and has a late reminder; the clock next observes
    // a point past both midnight and the (yesterday) reminder instant.
    engine.set_reminder("eve", "11:50 PM").unwrap();
    engine.mark_done("eve").unwrap();
    sink.take();

    clock.set(utc(2026, 3, 11, 0, 5));
    let outcome = engine.tick();
    assert!(outcome.rolled_over);

    // Streak was judged against the completed pre-rollover day, so nothing
    // broke -- but the day is fresh again and the 11:50 PM instant is now
    // overdue, so the reminder fires in the same tick.
    assert_eq!(outcome.streaks_broken, 0);
    assert_eq!(outcome.reminders_sent, 1);

    let notices = sink.take();
    assert_eq!(reminders_in(&notices), 1);
    assert!(notices
        .iter()
        .all(|n| !matches!(n, Notice::StreakBroken { .. })));

    let eve = engine.roster().get("eve").unwrap();
    assert_eq!(eve.streak, 1);
    assert!(eve.already_reminded);
    assert_eq!(eve.next_reminder_at, Some(utc(2026, 3, 11, 23, 50)));
}

#[test]
fn rearming_later_the_same_day_schedules_tomorrow() {
    let dir = TempDir::new().unwrap();
    let (mut engine, clock, _) = engine_at(&dir, morning());

    let first = engine.set_reminder("frank", "09:00 AM").unwrap();
    assert_eq!(first, utc(2026, 3, 10, 9, 0));

    engine.clear_reminder("frank").unwrap();
    assert!(engine.roster().get("frank").unwrap().next_reminder_at.is_none());

    // 09:00 already passed by the time the reminder comes back.
    clock.set(utc(2026, 3, 10, 10, 0));
    let second = engine.set_reminder("frank", "09:00 AM").unwrap();
    assert_eq!(second, utc(2026, 3, 11, 9, 0));
}

#[test]
fn state_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roster.json");

    {
        let (mut engine, _, _) = engine_at(&dir, morning());
        engine.mark_done("gail").unwrap();
        engine.set_reminder("gail", "08:30 PM").unwrap();
    }

    let clock = ManualClock::new(utc(2026, 3, 10, 12, 0));
    let engine = ReminderEngine::bootstrap(
        &Config::default(),
        SnapshotStore::with_path(&path),
        Box::new(clock),
        Box::new(MemorySink::new()),
    )
    .unwrap();

    let gail = engine.roster().get("gail").unwrap();
    assert!(gail.completed_today);
    assert_eq!(gail.streak, 1);
    assert_eq!(gail.next_reminder_at, Some(utc(2026, 3, 10, 20, 30)));
}

#[test]
fn milestones_follow_the_ladder_day_by_day() {
    let dir = TempDir::new().unwrap();
    let (mut engine, clock, sink) = engine_at(&dir, morning());

    let mut titles = Vec::new();
    for day in 0..7 {
        engine.mark_done("hank").unwrap();
        for notice in sink.take() {
            if let Notice::MilestoneReached { rank, .. } = notice {
                titles.push(rank);
            }
        }
        clock.set(utc(2026, 3, 11 + day, 0, 1));
        engine.tick();
        sink.take();
    }

    assert_eq!(
        titles,
        [
            "Barely Medicated Mess",
            "Pill Buddy",
            "Triple Piller",
            "Medication Sensation"
        ]
    );
}

#[test]
fn double_mark_done_counts_one_day() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _, _) = engine_at(&dir, morning());

    assert_eq!(
        engine.mark_done("iris").unwrap(),
        MarkOutcome::Completed { streak: 1 }
    );
    assert_eq!(
        engine.mark_done("iris").unwrap(),
        MarkOutcome::AlreadyDone { streak: 1 }
    );
}
