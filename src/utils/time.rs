use std::time::Duration;

use chrono::{NaiveDate, ParseResult};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// This is the standard way of converting a date to a key of the data file.
pub fn date_to_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn date_from_key(key: &str) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
}

/// Whole minutes of learning time represented by `count` units of `unit` length.
pub fn learning_minutes(count: u64, unit: Duration) -> u64 {
    count.saturating_mul(unit.as_secs()) / 60
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::{date_from_key, date_to_key, learning_minutes};

    #[test]
    fn test_learning_minutes() {
        assert_eq!(learning_minutes(7, Duration::from_secs(600)), 70);
        assert_eq!(learning_minutes(5, Duration::from_secs(10)), 0);
        assert_eq!(learning_minutes(6, Duration::from_secs(10)), 1);
        assert_eq!(learning_minutes(u64::MAX, Duration::from_secs(600)), u64::MAX / 60);
    }

    #[test]
    fn test_date_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(date_to_key(date), "2024-01-05");
        assert_eq!(date_from_key("2024-01-05").unwrap(), date);
    }

    #[test]
    fn test_date_key_rejects_garbage() {
        assert!(date_from_key("yesterday").is_err());
        assert!(date_from_key("2024-13-01").is_err());
        assert!(date_from_key("2024-01-01T10:00:00").is_err());
    }
}
