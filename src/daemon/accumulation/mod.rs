//! Converts time elapsed since the daemon started into activity units of the current day.

pub mod tick_event;
pub mod ticker;

use std::time::Duration;

use chrono::NaiveDate;
use tick_event::TickEvent;
use tokio::time::Instant;

use super::storage::entities::{ActivityCount, DayCounts};

/// Date touched by the latest tick with the count it had before this run.
#[derive(Debug, Clone, Copy)]
struct DayBaseline {
    date: NaiveDate,
    count: ActivityCount,
}

pub struct Accumulator {
    program_start: Instant,
    unit: Duration,
    baseline: Option<DayBaseline>,
    units_seen: u64,
}

impl Accumulator {
    pub fn new(program_start: Instant, unit: Duration) -> Self {
        Self {
            program_start,
            unit,
            baseline: None,
            units_seen: 0,
        }
    }

    /// Writes `baseline + units since start` into the entry for `today`. The baseline is read from
    /// `counts` once per date, so the entry of a previous date is left as its last tick wrote it.
    pub fn tick(&mut self, today: NaiveDate, now: Instant, counts: &mut DayCounts) -> TickEvent {
        let elapsed = now.saturating_duration_since(self.program_start);
        self.tick_elapsed(today, elapsed, counts)
    }

    fn tick_elapsed(
        &mut self,
        today: NaiveDate,
        elapsed: Duration,
        counts: &mut DayCounts,
    ) -> TickEvent {
        self.units_seen = elapsed_units(elapsed, self.unit).max(self.units_seen);

        let baseline = match self.baseline {
            Some(baseline) if baseline.date == today => baseline,
            _ => DayBaseline {
                date: today,
                count: counts.get(today),
            },
        };
        self.baseline = Some(baseline);

        let count = baseline.count.saturating_add(self.units_seen);
        counts.set(today, count);

        TickEvent { date: today, count }
    }
}

/// Number of whole units in `elapsed`.
pub fn elapsed_units(elapsed: Duration, unit: Duration) -> u64 {
    (elapsed.as_millis() / unit.as_millis().max(1)) as u64
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use tokio::time::Instant;

    use crate::daemon::storage::entities::DayCounts;

    use super::{elapsed_units, tick_event::TickEvent, Accumulator};

    const TEN_MINUTES: Duration = Duration::from_secs(600);

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn accumulator(unit: Duration) -> Accumulator {
        Accumulator::new(Instant::now(), unit)
    }

    #[test]
    fn test_elapsed_units_floor() {
        assert_eq!(elapsed_units(Duration::from_millis(599_999), TEN_MINUTES), 0);
        assert_eq!(elapsed_units(Duration::from_secs(600), TEN_MINUTES), 1);
        assert_eq!(elapsed_units(Duration::from_secs(1195), TEN_MINUTES), 1);
        assert_eq!(elapsed_units(Duration::from_secs(1205), TEN_MINUTES), 2);
        assert_eq!(elapsed_units(Duration::from_secs(25), Duration::from_secs(10)), 2);
    }

    #[test]
    fn test_baseline_is_added_to_elapsed_units() {
        let mut counts: DayCounts = [(date(1), 5)].into_iter().collect();
        let mut accumulator = accumulator(TEN_MINUTES);

        let first = accumulator.tick_elapsed(date(1), Duration::from_secs(1195), &mut counts);
        assert_eq!(first, TickEvent { date: date(1), count: 6 });
        assert_eq!(counts.get(date(1)), 6);

        let second = accumulator.tick_elapsed(date(1), Duration::from_secs(1205), &mut counts);
        assert_eq!(second.count, 7);
        assert_eq!(counts.get(date(1)), 7);
    }

    #[test]
    fn test_baseline_is_captured_once() {
        let mut counts: DayCounts = [(date(1), 5)].into_iter().collect();
        let mut accumulator = accumulator(TEN_MINUTES);

        for (seconds, expected) in [(0, 5), (600, 6), (1200, 7), (1800, 8)] {
            let event = accumulator.tick_elapsed(date(1), Duration::from_secs(seconds), &mut counts);
            assert_eq!(event.count, expected);
        }
    }

    #[test]
    fn test_counts_are_monotonic() {
        let unit = Duration::from_secs(10);
        let mut counts = DayCounts::new();
        let mut accumulator = accumulator(unit);
        let mut previous = 0;

        for seconds in [0u64, 3, 9, 10, 19, 20, 47, 100, 101, 999] {
            let event = accumulator.tick_elapsed(date(1), Duration::from_secs(seconds), &mut counts);
            assert!(event.count >= previous);
            assert_eq!(event.count, seconds / 10);
            previous = event.count;
        }
    }

    #[test]
    fn test_day_rollover_moves_to_new_entry() {
        let mut counts: DayCounts = [(date(1), 5)].into_iter().collect();
        let mut accumulator = accumulator(TEN_MINUTES);

        accumulator.tick_elapsed(date(1), Duration::from_secs(1800), &mut counts);
        assert_eq!(counts.get(date(1)), 8);

        // Elapsed time keeps counting from program start.
        let event = accumulator.tick_elapsed(date(2), Duration::from_secs(1820), &mut counts);
        assert_eq!(event, TickEvent { date: date(2), count: 3 });
        assert_eq!(counts.get(date(1)), 8);

        accumulator.tick_elapsed(date(2), Duration::from_secs(3000), &mut counts);
        assert_eq!(counts.get(date(1)), 8);
        assert_eq!(counts.get(date(2)), 5);
    }

    #[test]
    fn test_day_rollover_uses_stored_baseline_of_new_day() {
        let mut counts: DayCounts = [(date(1), 1), (date(2), 4)].into_iter().collect();
        let mut accumulator = accumulator(TEN_MINUTES);

        accumulator.tick_elapsed(date(1), Duration::from_secs(600), &mut counts);
        let event = accumulator.tick_elapsed(date(2), Duration::from_secs(1300), &mut counts);

        assert_eq!(counts.get(date(1)), 2);
        assert_eq!(event.count, 6);

        // Baseline of the new day is not re-read from the count written by this run.
        let event = accumulator.tick_elapsed(date(2), Duration::from_secs(1900), &mut counts);
        assert_eq!(event.count, 7);
    }

    #[test]
    fn test_tick_uses_instants() {
        let start = Instant::now();
        let mut counts = DayCounts::new();
        let mut accumulator = Accumulator::new(start, Duration::from_secs(10));

        let event = accumulator.tick(date(1), start + Duration::from_secs(35), &mut counts);
        assert_eq!(event.count, 3);

        // An earlier instant never lowers the count.
        let event = accumulator.tick(date(1), start, &mut counts);
        assert_eq!(event.count, 3);
    }
}
