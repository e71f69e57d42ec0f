//! User records and the in-memory roster.
//!
//! A [`UserState`] tracks one user's daily completion, streak, and reminder
//! schedule. The [`Roster`] is the full mapping; records are created lazily
//! on first contact and never deleted. Write-through persistence is enforced
//! one layer up, in the engine command handlers.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user habit state.
///
/// Every field carries a serde default so snapshots written before a field
/// existed keep loading as the schema grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default)]
    pub name: String,
    /// Whether today's dose has been recorded.
    #[serde(default)]
    pub completed_today: bool,
    /// Consecutive completed days.
    #[serde(default)]
    pub streak: u32,
    /// Local wall-clock reminder time; `None` means reminders are off.
    #[serde(default)]
    pub reminder_time: Option<NaiveTime>,
    /// Absolute next-fire instant, derived from `reminder_time` and advanced
    /// by whole days. Never moves backwards.
    #[serde(default)]
    pub next_reminder_at: Option<DateTime<Utc>>,
    /// At-most-once-per-day guard; cleared at rollover with
    /// `completed_today`.
    #[serde(default)]
    pub already_reminded: bool,
}

impl UserState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Record today's dose. Idempotent within a day-cycle: the streak moves
    /// only on the first call.
    pub fn mark_done(&mut self) -> MarkOutcome {
        if self.completed_today {
            return MarkOutcome::AlreadyDone { streak: self.streak };
        }
        self.completed_today = true;
        self.streak += 1;
        MarkOutcome::Completed { streak: self.streak }
    }

    /// Clear the per-day flags at rollover. Streak continuation is judged by
    /// the engine before this runs.
    pub fn begin_new_day(&mut self) {
        self.completed_today = false;
        self.already_reminded = false;
    }

    /// Whether a reminder is armed.
    pub fn reminder_armed(&self) -> bool {
        self.next_reminder_at.is_some()
    }
}

/// Outcome of a mark-done command, for the caller to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// First completion of the day; `streak` is the updated value.
    Completed { streak: u32 },
    /// The day was already complete; nothing changed.
    AlreadyDone { streak: u32 },
}

/// All known users, keyed by name. A `BTreeMap` keeps iteration order
/// deterministic for tests and stable on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    users: BTreeMap<String, UserState>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&UserState> {
        self.users.get(name)
    }

    /// Fetch a record, creating it with defaults on first contact.
    pub fn get_or_create(&mut self, name: &str) -> &mut UserState {
        self.users
            .entry(name.to_string())
            .or_insert_with(|| UserState::new(name))
    }

    /// Insert a fully-formed record, keyed by its name.
    pub fn insert(&mut self, user: UserState) {
        self.users.insert(user.name.clone(), user);
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserState> {
        self.users.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut UserState> {
        self.users.values_mut()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
