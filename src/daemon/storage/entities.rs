use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of activity units accrued on a day. One unit is [AccumulatorConfig::unit] of learning
/// time, 10 minutes by default.
///
/// [AccumulatorConfig::unit]: crate::daemon::config::AccumulatorConfig::unit
pub type ActivityCount = u64;

/// In-memory store of activity per calendar day. Absent days are treated as 0. On disk it's a
/// flat JSON object `{"2024-01-01": 3}`.
#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayCounts {
    counts: BTreeMap<NaiveDate, ActivityCount>,
}

impl DayCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> ActivityCount {
        self.counts.get(&date).copied().unwrap_or(0)
    }

    pub fn set(&mut self, date: NaiveDate, count: ActivityCount) {
        self.counts.insert(date, count);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(NaiveDate, ActivityCount)> for DayCounts {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, ActivityCount)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}
