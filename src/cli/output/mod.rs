use std::{future, time::Duration};

use ansi_term::Colour;
use chrono::NaiveDate;
use futures::{stream, Stream, StreamExt};

use crate::{
    daemon::storage::entities::{ActivityCount, DayCounts},
    utils::time::learning_minutes,
};

/// Learning time of a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub count: ActivityCount,
    pub minutes: u64,
}

/// Returns usage for every day between `start` and `end` (both inclusive). Days without data are
/// present with a count of 0.
pub fn daily_usage(
    counts: &DayCounts,
    start: NaiveDate,
    end: NaiveDate,
    unit: Duration,
) -> impl Stream<Item = DailyUsage> + '_ {
    date_range(start, end).map(move |date| {
        let count = counts.get(date);
        DailyUsage {
            date,
            count,
            minutes: learning_minutes(count, unit),
        }
    })
}

/// Returns a stream of dates between start (inclusive) and end (inclusive).
fn date_range(start: NaiveDate, end: NaiveDate) -> impl Stream<Item = NaiveDate> {
    stream::unfold(Some(start), move |current| {
        future::ready(match current {
            Some(current) if current <= end => Some((current, current.succ_opt())),
            _ => None,
        })
    })
}

pub fn format_minutes(minutes: u64) -> String {
    if minutes >= 60 {
        format!("{}h{}m", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}m")
    }
}

/// Number of bar cells for `count` relative to the biggest count shown. Any activity gets at
/// least one cell.
pub fn bar_width(count: ActivityCount, max: ActivityCount, width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let scaled = (count as u128 * width as u128).div_ceil(max as u128);
    scaled.min(width as u128) as usize
}

pub fn intensity_bar(count: ActivityCount, max: ActivityCount, width: usize) -> String {
    Colour::Green
        .paint("■".repeat(bar_width(count, max, width)))
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use tokio_stream::StreamExt;

    use crate::daemon::storage::entities::DayCounts;

    use super::{bar_width, daily_usage, format_minutes, DailyUsage};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[tokio::test]
    async fn test_daily_usage_fills_missing_days() {
        let counts: DayCounts = [(date(1, 30), 2), (date(2, 1), 7), (date(2, 5), 1)]
            .into_iter()
            .collect();

        let usage = daily_usage(&counts, date(1, 30), date(2, 2), Duration::from_secs(600))
            .collect::<Vec<_>>()
            .await;

        assert_eq!(
            usage,
            vec![
                DailyUsage { date: date(1, 30), count: 2, minutes: 20 },
                DailyUsage { date: date(1, 31), count: 0, minutes: 0 },
                DailyUsage { date: date(2, 1), count: 7, minutes: 70 },
                DailyUsage { date: date(2, 2), count: 0, minutes: 0 },
            ]
        );
    }

    #[tokio::test]
    async fn test_daily_usage_single_day_and_empty_range() {
        let counts: DayCounts = [(date(2, 29), 3)].into_iter().collect();
        let unit = Duration::from_secs(600);

        let single = daily_usage(&counts, date(2, 29), date(2, 29), unit)
            .collect::<Vec<_>>()
            .await;
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].count, 3);

        let empty = daily_usage(&counts, date(3, 1), date(2, 29), unit)
            .collect::<Vec<_>>()
            .await;
        assert!(empty.is_empty());
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(59), "59m");
        assert_eq!(format_minutes(60), "1h0m");
        assert_eq!(format_minutes(130), "2h10m");
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(0, 10, 20), 0);
        assert_eq!(bar_width(10, 10, 20), 20);
        assert_eq!(bar_width(5, 10, 20), 10);
        assert_eq!(bar_width(1, 1000, 20), 1);
        assert_eq!(bar_width(u64::MAX, u64::MAX, 20), 20);
    }
}
