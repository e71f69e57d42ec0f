//! Engine-emitted notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every user-facing engine decision produces a Notice. Sinks deliver them;
/// the command surface renders them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notice {
    /// The user's reminder time passed without a recorded dose today.
    ReminderDue { user: String, at: DateTime<Utc> },
    /// Day rolled over with no dose recorded; `streak` is the run that was
    /// lost.
    StreakBroken {
        user: String,
        streak: u32,
        at: DateTime<Utc>,
    },
    /// A recorded dose pushed the user across a rank threshold.
    MilestoneReached {
        user: String,
        streak: u32,
        rank: String,
        at: DateTime<Utc>,
    },
}

impl Notice {
    /// The user this notice is addressed to.
    pub fn user(&self) -> &str {
        match self {
            Notice::ReminderDue { user, .. }
            | Notice::StreakBroken { user, .. }
            | Notice::MilestoneReached { user, .. } => user,
        }
    }
}
