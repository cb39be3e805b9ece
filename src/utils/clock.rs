use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tokio::time::Instant;

/// Represents an entity responsible for providing dates and monotonic time across application.
/// This allows elapsed time and day changes to be simulated during testing.
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    /// Calendar day according to the local timezone. Must be queried each time it's needed, a
    /// long running daemon will cross midnight.
    fn today(&self) -> NaiveDate;

    fn instant(&self) -> Instant;

    async fn sleep_until(&self, instant: Instant);
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}
