use clap::Subcommand;
use medkeeper_core::Config;

use super::common;

#[derive(Subcommand)]
pub enum RemindAction {
    /// Set the daily reminder time
    Set {
        #[arg(long)]
        user: String,
        /// Wall-clock time like "7:12 PM"
        #[arg(long)]
        time: String,
    },
    /// Turn the reminder off
    Clear {
        #[arg(long)]
        user: String,
    },
}

pub fn run(config: &Config, action: RemindAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = common::open_engine(config)?;
    match action {
        RemindAction::Set { user, time } => {
            let next = engine.set_reminder(&user, &time)?;
            let local = next.with_timezone(&config.timezone());
            println!(
                "Reminder for {user} set to {} (next fire {})",
                time.trim(),
                local.format("%Y-%m-%d %I:%M %p")
            );
        }
        RemindAction::Clear { user } => {
            engine.clear_reminder(&user)?;
            println!("Reminder for {user} turned off.");
        }
    }
    Ok(())
}
