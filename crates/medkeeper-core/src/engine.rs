//! Reminder/reset engine.
//!
//! A wall-clock-driven state machine with no internal threads: the caller
//! invokes [`ReminderEngine::tick`] on a fixed cadence (see
//! [`crate::runtime`]) and sends commands in between. Within one tick,
//! day-rollover evaluation strictly precedes reminder evaluation, so a user
//! crossing the boundary has their streak judged against the pre-rollover
//! completion flag before the per-day flags are cleared -- and an overdue
//! reminder can then fire for the freshly started day.
//!
//! ## State transitions (per user)
//!
//! ```text
//! NoReminder --set_reminder--> ReminderArmed --tick(due, not done)--> ReminderFired
//! ReminderFired --rollover--> ReminderArmed
//! any --clear_reminder--> NoReminder
//! ```

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::clock::{self, Clock};
use crate::error::{CoreError, Result};
use crate::events::Notice;
use crate::milestones;
use crate::roster::{MarkOutcome, Roster};
use crate::sink::NotificationSink;
use crate::storage::{Config, SnapshotStore};

/// What one tick did. Returned for logging and test assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub rolled_over: bool,
    /// Users whose streak was evaluated as broken during rollover.
    pub streaks_broken: u32,
    pub reminders_sent: u32,
    /// Whether the end-of-tick snapshot write happened and succeeded.
    pub persisted: bool,
}

/// Snapshot write retry state. After a failed write the engine skips a
/// doubling number of ticks before retrying, capped.
#[derive(Debug, Default)]
struct WriteBackoff {
    failures: u32,
    skip_left: u32,
}

impl WriteBackoff {
    const MAX_SKIP: u32 = 64;

    fn should_attempt(&mut self) -> bool {
        if self.skip_left > 0 {
            self.skip_left -= 1;
            return false;
        }
        true
    }

    fn succeeded(&mut self) {
        *self = Self::default();
    }

    fn failed(&mut self) {
        self.failures += 1;
        self.skip_left = (1u32 << self.failures.min(6)).min(Self::MAX_SKIP);
    }
}

/// The scheduling engine: owns the roster, the next rollover instant, and
/// the collaborator seams (clock, sink, snapshot store).
pub struct ReminderEngine {
    clock: Box<dyn Clock>,
    sink: Box<dyn NotificationSink>,
    store: SnapshotStore,
    tz: FixedOffset,
    next_rollover: DateTime<Utc>,
    roster: Roster,
    backoff: WriteBackoff,
    dirty: bool,
}

impl ReminderEngine {
    /// Load (or initialize) state and arm the next rollover.
    ///
    /// A missing snapshot is not an error: the engine starts with an empty
    /// roster and writes a fresh snapshot immediately. A snapshot that
    /// exists but cannot be parsed is fatal.
    pub fn bootstrap(
        config: &Config,
        store: SnapshotStore,
        clock: Box<dyn Clock>,
        sink: Box<dyn NotificationSink>,
    ) -> Result<Self> {
        config.validate()?;
        let tz = config.timezone();
        let roster = match store.load()? {
            Some(roster) => roster,
            None => {
                let roster = Roster::new();
                store.save(&roster)?;
                roster
            }
        };

        let next_rollover = clock::next_rollover_after(clock.now(), config.rollover_offset_min, tz);
        log::info!(
            "engine online: {} users, next rollover at {next_rollover}",
            roster.len()
        );

        Ok(Self {
            clock,
            sink,
            store,
            tz,
            next_rollover,
            roster,
            backoff: WriteBackoff::default(),
            dirty: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn next_rollover(&self) -> DateTime<Utc> {
        self.next_rollover
    }

    /// Whether in-memory state is ahead of the last successful snapshot.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record today's dose for `name`. Idempotent within a day-cycle; a
    /// first completion that crosses a rank threshold also emits a
    /// milestone notice.
    pub fn mark_done(&mut self, name: &str) -> Result<MarkOutcome> {
        let user = self.roster.get_or_create(name);
        let before = user.streak;
        let outcome = user.mark_done();

        if let MarkOutcome::Completed { streak } = outcome {
            log::info!("{name} completed today's dose, streak {streak}");
            if let Some(rank) = milestones::crossed_rank(before, streak) {
                self.notify(Notice::MilestoneReached {
                    user: name.to_string(),
                    streak,
                    rank: rank.title.to_string(),
                    at: self.clock.now(),
                });
            }
        }

        self.persist_after_command();
        Ok(outcome)
    }

    /// Arm (or re-arm) the daily reminder from input like "7:12 PM".
    ///
    /// Parsing happens before any state is touched, so bad input leaves the
    /// roster untouched -- the record is not even created. Returns the
    /// computed next-fire instant: today if the time is still ahead on the
    /// local clock, else tomorrow.
    pub fn set_reminder(&mut self, name: &str, input: &str) -> Result<DateTime<Utc>> {
        let time_of_day = clock::parse_clock_time(input).ok_or_else(|| {
            CoreError::InvalidTimeFormat {
                input: input.to_string(),
            }
        })?;

        let next = clock::next_occurrence(self.clock.now(), time_of_day, self.tz);
        let user = self.roster.get_or_create(name);
        user.reminder_time = Some(time_of_day);
        user.next_reminder_at = Some(next);
        log::info!("{name} armed reminder for {}, next fire {next}", input.trim());

        self.persist_after_command();
        Ok(next)
    }

    /// Disarm the reminder entirely.
    pub fn clear_reminder(&mut self, name: &str) -> Result<()> {
        let user = self.roster.get_or_create(name);
        user.reminder_time = None;
        user.next_reminder_at = None;
        log::info!("{name} cleared their reminder");

        self.persist_after_command();
        Ok(())
    }

    /// Run the rollover sweep immediately without moving the scheduled
    /// boundary. Administrative escape hatch; returns the number of streaks
    /// evaluated as broken.
    pub fn force_rollover(&mut self) -> u32 {
        let broken = self.roll_over(self.clock.now());
        self.persist_after_command();
        broken
    }

    // ── Tick ─────────────────────────────────────────────────────────

    /// One scheduler pass: rollover first, then per-user reminders, then a
    /// single snapshot write.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();
        let mut outcome = TickOutcome::default();

        if now > self.next_rollover {
            outcome.rolled_over = true;
            outcome.streaks_broken = self.roll_over(now);
            self.next_rollover += Duration::days(1);
            log::info!("day rolled over, next rollover at {}", self.next_rollover);
        }

        outcome.reminders_sent = self.fire_due_reminders(now);
        outcome.persisted = self.persist_after_tick();
        outcome
    }

    /// The rollover sweep: judge every streak against the pre-rollover
    /// completion flag, then clear the per-day flags for everyone.
    fn roll_over(&mut self, now: DateTime<Utc>) -> u32 {
        let mut notices = Vec::new();
        for user in self.roster.iter_mut() {
            if !user.completed_today {
                if user.streak > 0 {
                    log::info!("{} broke their streak at {}", user.name, user.streak);
                }
                notices.push(Notice::StreakBroken {
                    user: user.name.clone(),
                    streak: user.streak,
                    at: now,
                });
                user.streak = 0;
            }
        }
        for user in self.roster.iter_mut() {
            user.begin_new_day();
        }

        let broken = notices.len() as u32;
        for notice in notices {
            self.notify(notice);
        }
        broken
    }

    fn fire_due_reminders(&mut self, now: DateTime<Utc>) -> u32 {
        let mut notices = Vec::new();
        for user in self.roster.iter_mut() {
            let Some(due) = user.next_reminder_at else {
                continue;
            };
            if now <= due {
                continue;
            }
            if !user.completed_today && !user.already_reminded {
                notices.push(Notice::ReminderDue {
                    user: user.name.clone(),
                    at: now,
                });
                user.already_reminded = true;
            }
            // Advance a whole day whether or not anything fired, keeping the
            // reminder anchored to the same wall-clock time.
            user.next_reminder_at = Some(due + Duration::days(1));
        }

        let sent = notices.len() as u32;
        for notice in notices {
            self.notify(notice);
        }
        sent
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn notify(&self, notice: Notice) {
        if let Err(e) = self.sink.deliver(&notice) {
            log::warn!("notification delivery failed for {}: {e}", notice.user());
        }
    }

    /// Command handlers write through unconditionally; the command result
    /// reflects the domain outcome even when the write fails (memory stays
    /// authoritative, retried on later ticks).
    fn persist_after_command(&mut self) {
        self.try_persist(true);
    }

    fn persist_after_tick(&mut self) -> bool {
        self.try_persist(false)
    }

    fn try_persist(&mut self, force: bool) -> bool {
        if !force && !self.backoff.should_attempt() {
            return false;
        }
        match self.store.save(&self.roster) {
            Ok(()) => {
                self.backoff.succeeded();
                self.dirty = false;
                true
            }
            Err(e) => {
                self.dirty = true;
                self.backoff.failed();
                log::warn!(
                    "snapshot write failed ({} so far): {e}",
                    self.backoff.failures
                );
                false
            }
        }
    }
}
