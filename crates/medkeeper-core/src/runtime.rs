//! Periodic tick driver.
//!
//! Wraps the engine in a tokio interval task. Missed ticks are skipped, not
//! queued -- rollover and reminder instants are absolute, so the next tick
//! catches up on its own. Commands and ticks serialize on the same mutex:
//! the engine never sees overlapping mutations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

use crate::engine::ReminderEngine;

/// Drive `tick()` forever at the given cadence. Callers embed this in their
/// own task and decide when to stop (drop the task, or race it against a
/// shutdown signal).
pub async fn run_forever(engine: Arc<Mutex<ReminderEngine>>, cadence: Duration) {
    let mut ticker = tokio::time::interval(cadence);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let outcome = engine.lock().await.tick();
        if outcome.rolled_over {
            log::debug!(
                "tick: rolled over, {} streaks broken, {} reminders sent",
                outcome.streaks_broken,
                outcome.reminders_sent
            );
        } else if outcome.reminders_sent > 0 {
            log::debug!("tick: {} reminders sent", outcome.reminders_sent);
        }
    }
}
