use anyhow::Result;

use crate::daemon::accumulation::tick_event::TickEvent;

/// Represents a consumer of tick results. This is the seam a calendar view plugs into to refresh the
/// cell of [TickEvent::date].
#[cfg_attr(test, mockall::automock)]
pub trait TickObserver {
    fn on_tick(&mut self, event: &TickEvent) -> Result<()>;
}
