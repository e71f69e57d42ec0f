//! Notification delivery seam.
//!
//! The engine hands finished [`Notice`]s to a sink and moves on. Delivery is
//! best-effort: a sink error is logged and dropped, never allowed to roll
//! back engine state or block a tick.

use std::sync::{Arc, Mutex};

use crate::events::Notice;

/// Receives engine notices. Implementations own their transport entirely.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notice: &Notice) -> Result<(), Box<dyn std::error::Error>>;
}

/// Sink that records notices in memory. Clones share one buffer, so a test
/// can keep a handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink(Arc<Mutex<Vec<Notice>>>);

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return everything delivered so far.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.lock())
    }

    /// Copy of everything delivered so far, without draining.
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl NotificationSink for MemorySink {
    fn deliver(&self, notice: &Notice) -> Result<(), Box<dyn std::error::Error>> {
        self.lock().push(notice.clone());
        Ok(())
    }
}

/// Sink that forwards notices to the log facade. Useful as a default when
/// no real transport is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, notice: &Notice) -> Result<(), Box<dyn std::error::Error>> {
        match notice {
            Notice::ReminderDue { user, .. } => log::info!("reminder due for {user}"),
            Notice::StreakBroken { user, streak, .. } => {
                log::info!("{user} broke a streak of {streak}")
            }
            Notice::MilestoneReached { user, rank, .. } => {
                log::info!("{user} reached rank '{rank}'")
            }
        }
        Ok(())
    }
}
