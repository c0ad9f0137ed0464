use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub const DAY_MS: i64 = 24 * 60 * 60 * 1_000;

/// Rows are placed at UTC midnight of their calendar day.
pub fn date_to_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

pub fn ms_to_datetime(time_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(time_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_days_are_one_day_apart() {
        let a = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2020, 3, 2).unwrap();
        assert_eq!(date_to_ms(b) - date_to_ms(a), DAY_MS);
        assert_eq!(date_to_ms(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0);
    }

    #[test]
    fn round_trips_through_datetime() {
        let day = NaiveDate::from_ymd_opt(2020, 5, 17).unwrap();
        let dt = ms_to_datetime(date_to_ms(day)).unwrap();
        assert_eq!(dt.date_naive(), day);
    }
}
