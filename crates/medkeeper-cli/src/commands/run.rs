use std::sync::Arc;
use std::time::Duration;

use medkeeper_core::{runtime, Config};

use super::common;

/// Host the polling scheduler until interrupted.
pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let engine = common::open_engine(config)?;
    let cadence = Duration::from_secs(config.tick_interval_secs.max(1));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let engine = Arc::new(tokio::sync::Mutex::new(engine));
        log::info!("scheduler running every {}s, ctrl-c to stop", cadence.as_secs());
        tokio::select! {
            _ = runtime::run_forever(engine, cadence) => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("shutting down");
            }
        }
    });
    Ok(())
}
