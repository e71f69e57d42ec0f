use medkeeper_core::{Config, MarkOutcome, UserState};

use super::common;

pub fn done(config: &Config, user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = common::open_engine(config)?;
    match engine.mark_done(user)? {
        MarkOutcome::Completed { streak } => {
            println!("{user} now has a streak of {streak}!");
        }
        MarkOutcome::AlreadyDone { .. } => {
            println!("{user} already logged today's dose.");
        }
    }
    Ok(())
}

pub fn status(config: &Config, user: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let engine = common::open_engine(config)?;
    match user {
        Some(name) => match engine.roster().get(name) {
            Some(record) => println!("{}", serde_json::to_string_pretty(record)?),
            None => println!("no record for {name}"),
        },
        None => {
            let users: Vec<&UserState> = engine.roster().iter().collect();
            println!("{}", serde_json::to_string_pretty(&users)?);
        }
    }
    Ok(())
}

pub fn rollover(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = common::open_engine(config)?;
    let broken = engine.force_rollover();
    println!("rollover complete, {broken} streaks reset");
    Ok(())
}
