use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::{
    daemon::accumulation::tick_event::TickEvent,
    utils::time::{date_to_key, learning_minutes},
};

use super::module::TickObserver;

/// Observer used by the daemon, which has no view attached. Reports the refreshed day into logs.
pub struct LoggingObserver {
    unit: Duration,
}

impl LoggingObserver {
    pub fn new(unit: Duration) -> Self {
        Self { unit }
    }
}

impl TickObserver for LoggingObserver {
    fn on_tick(&mut self, event: &TickEvent) -> Result<()> {
        info!(
            "Learning time for {} is {} units ({} min)",
            date_to_key(event.date),
            event.count,
            learning_minutes(event.count, self.unit)
        );
        Ok(())
    }
}
