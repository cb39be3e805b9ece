use module::TickObserver;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error};

use super::accumulation::tick_event::TickEvent;

pub mod log_observer;
pub mod module;

/// Represents consumer of tick results. This module forwards every [TickEvent] to an observer
/// until the tick loop drops its sender.
pub struct ProcessingModule<Observer> {
    receiver: Receiver<TickEvent>,
    observer: Observer,
}

impl<O: TickObserver> ProcessingModule<O> {
    pub fn new(receiver: Receiver<TickEvent>, observer: O) -> Self {
        Self { receiver, observer }
    }

    /// Observer failures are logged. They never stop accumulation.
    pub async fn run(mut self) {
        while let Some(event) = self.receiver.recv().await {
            debug!("Processing event {:?}", event);
            if let Err(e) = self.observer.on_tick(&event) {
                error!("Error processing event {:?}: {e:?}", event)
            }
        }
        self.receiver.close();
    }
}
