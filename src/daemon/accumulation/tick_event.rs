use chrono::NaiveDate;

use crate::daemon::storage::entities::ActivityCount;

/// Result of a single tick: the day that was updated and its new count. This is what a calendar
/// view needs to refresh one cell.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct TickEvent {
    pub date: NaiveDate,
    pub count: ActivityCount,
}
