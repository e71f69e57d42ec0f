//! # Medkeeper Core Library
//!
//! Core business logic for Medkeeper, a daily-dose habit tracker. Users
//! record one completion per day, optionally get reminded at a wall-clock
//! time of their choosing, and keep a streak that resets when a day is
//! missed. It implements a CLI-first philosophy: every operation is
//! available through the standalone `medkeeper` binary, with richer front
//! ends staying thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Reminder engine**: a wall-clock-based state machine that requires
//!   the caller to periodically invoke `tick()`; rollover evaluation always
//!   precedes reminder evaluation within a tick
//! - **Roster**: per-user habit records, created lazily and never deleted
//! - **Storage**: JSON snapshot persistence with write-through on every
//!   mutation, plus TOML-based configuration
//! - **Sinks**: fire-and-forget notification seam; transports live outside
//!   this crate
//!
//! ## Key Components
//!
//! - [`ReminderEngine`]: scheduling state machine (commands + tick)
//! - [`Roster`] / [`UserState`]: the user record store
//! - [`SnapshotStore`]: durable roster snapshots
//! - [`Clock`]: injectable time source ([`SystemClock`], [`ManualClock`])
//! - [`NotificationSink`]: notice delivery seam

pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod milestones;
pub mod roster;
pub mod runtime;
pub mod sink;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{ReminderEngine, TickOutcome};
pub use error::{ConfigError, CoreError, Result, SnapshotError};
pub use events::Notice;
pub use roster::{MarkOutcome, Roster, UserState};
pub use sink::{LogSink, MemorySink, NotificationSink};
pub use storage::{data_dir, Config, SnapshotStore};
