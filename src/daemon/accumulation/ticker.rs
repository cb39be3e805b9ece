use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info_span, warn, Instrument};

use crate::{
    daemon::storage::{counter_storage::CounterStorage, entities::DayCounts},
    utils::clock::Clock,
};

use super::{tick_event::TickEvent, Accumulator};

/// Owns the day counters for the lifetime of the daemon. Every tick updates today's entry, persists
/// the whole store and notifies listeners.
pub struct TickModule<S: CounterStorage> {
    next: mpsc::Sender<TickEvent>,
    storage: S,
    counts: DayCounts,
    accumulator: Accumulator,
    shutdown: CancellationToken,
    tick_interval: Duration,
    time_provider: Box<dyn Clock>,
}

impl<S: CounterStorage> TickModule<S> {
    pub fn new(
        next: mpsc::Sender<TickEvent>,
        storage: S,
        counts: DayCounts,
        shutdown: CancellationToken,
        unit: Duration,
        tick_interval: Duration,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        let accumulator = Accumulator::new(time_provider.instant(), unit);
        Self {
            next,
            storage,
            counts,
            accumulator,
            shutdown,
            tick_interval,
            time_provider,
        }
    }

    async fn tick(&mut self) -> Result<()> {
        let event = self.accumulator.tick(
            self.time_provider.today(),
            self.time_provider.instant(),
            &mut self.counts,
        );
        debug!("Tick produced {:?}", event);

        self.storage
            .flush(&self.counts)
            .instrument(info_span!("Flushing day counts"))
            .await
            .inspect_err(|e| error!("Failed to persist day counts {e:?}"))?;

        if let Err(e) = self.next.send(event).await {
            warn!("Nobody is listening for tick events {e}");
        }
        Ok(())
    }

    /// Executes the tick loop. Stops on cancellation after one last tick, or on the first failed
    /// flush.
    pub async fn run(mut self) -> Result<()> {
        let mut tick_point = self.time_provider.instant();
        loop {
            tick_point += self.tick_interval;

            self.tick().await?;

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    // Time since the previous tick would be lost otherwise.
                    return self.tick().await;
                }
                _ = self.time_provider.sleep_until(tick_point) => ()
            }
        }
    }
}
