use medkeeper_core::{Config, Notice, NotificationSink, ReminderEngine, SnapshotStore, SystemClock};

/// Build an engine over the configured snapshot location, with the system
/// clock and a stdout sink.
pub fn open_engine(config: &Config) -> Result<ReminderEngine, Box<dyn std::error::Error>> {
    let store = match &config.snapshot_file {
        Some(path) => SnapshotStore::with_path(path),
        None => SnapshotStore::open()?,
    };
    let engine = ReminderEngine::bootstrap(
        config,
        store,
        Box::new(SystemClock),
        Box::new(TextSink),
    )?;
    Ok(engine)
}

/// Renders notices as human-readable lines on stdout. Stands in for a real
/// chat transport.
pub struct TextSink;

impl NotificationSink for TextSink {
    fn deliver(&self, notice: &Notice) -> Result<(), Box<dyn std::error::Error>> {
        match notice {
            Notice::ReminderDue { user, .. } => {
                println!("Time for {user} to take their meds!");
            }
            Notice::StreakBroken { user, streak, .. } => {
                println!("{user} broke their streak at {streak}. Back to zero :(");
            }
            Notice::MilestoneReached { user, rank, .. } => {
                println!("CONGRATS! {user} is now a {rank}!");
            }
        }
        Ok(())
    }
}
