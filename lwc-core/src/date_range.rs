use crate::error::{CollageError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An inclusive range of UTC instants used to query the event store.
#[derive(Clone, Eq, PartialEq, Copy, Debug, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(CollageError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(DateRange { start, end })
    }

    /// Whole days from the start of `first` through the last second of `last`.
    pub fn from_dates(first: NaiveDate, last: NaiveDate) -> Result<Self> {
        let invalid = || CollageError::InvalidDateRange {
            start: first.to_string(),
            end: last.to_string(),
        };
        let start = first.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc();
        let end = last.and_hms_opt(23, 59, 59).ok_or_else(invalid)?.and_utc();
        DateRange::new(start, end)
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.start <= *timestamp && *timestamp <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::DateRange;
    use crate::error::CollageError;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_date_range_covers_whole_days() {
        let first = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        let range = DateRange::from_dates(first, last).unwrap();
        assert!(range.contains(&Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()));
        assert!(range.contains(&Utc.with_ymd_and_hms(2020, 12, 31, 23, 59, 59).unwrap()));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_date_range_single_day() {
        let day = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap();
        let range = DateRange::from_dates(day, day).unwrap();
        assert!(range.contains(&Utc.with_ymd_and_hms(2022, 3, 15, 12, 0, 0).unwrap()));
    }

    #[test]
    fn test_date_range_rejects_reversed_bounds() {
        let start = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 3, 14).unwrap();
        assert!(matches!(
            DateRange::from_dates(start, end),
            Err(CollageError::InvalidDateRange { .. })
        ));
    }
}
