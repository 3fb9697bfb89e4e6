//! Shared utility functions for LWC crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    /// Format used for timestamps in the events table and in exports.
    ///
    /// Fractional seconds are written only when present.
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

    /// Timestamp layouts accepted by [`parse_timestamp`], tried in order.
    const TIMESTAMP_LAYOUTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y%m%d %H%M",
    ];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Format a UTC timestamp as "YYYY-MM-DD HH:MM:SS", with a fraction
    /// such as ".250" only for sub-second timestamps.
    ///
    /// The output sorts lexically in chronological order, which the
    /// events table relies on for range queries.
    pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
        timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Parse a timestamp into UTC.
    ///
    /// RFC 3339 input is converted from its offset; naive layouts are
    /// taken to be UTC already. A bare "YYYY-MM-DD" means midnight.
    pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        for layout in TIMESTAMP_LAYOUTS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
                return Ok(naive.and_utc());
            }
        }
        let date = parse_date(s).map_err(|_| anyhow::anyhow!("Unrecognised timestamp: {s}"))?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid date: {s}"))?;
        Ok(midnight.and_utc())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{Datelike, NaiveDate, TimeZone, Timelike};

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_parse_timestamp_layouts() {
            let expected = Utc.with_ymd_and_hms(2020, 1, 15, 5, 30, 0).unwrap();
            assert_eq!(parse_timestamp("2020-01-15 05:30:00").unwrap(), expected);
            assert_eq!(parse_timestamp("2020-01-15T05:30:00").unwrap(), expected);
            assert_eq!(parse_timestamp("2020-01-15 05:30").unwrap(), expected);
            assert_eq!(parse_timestamp("20200115 0530").unwrap(), expected);
        }

        #[test]
        fn test_parse_timestamp_rfc3339_converts_offset() {
            let parsed = parse_timestamp("2020-01-15T07:30:00+02:00").unwrap();
            assert_eq!(parsed.hour(), 5);
            assert_eq!(parsed.day(), 15);
        }

        #[test]
        fn test_parse_timestamp_bare_date_is_midnight() {
            let parsed = parse_timestamp("2020-11-01").unwrap();
            assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 11, 1, 0, 0, 0).unwrap());
        }

        #[test]
        fn test_parse_timestamp_rejects_garbage() {
            assert!(parse_timestamp("yesterday").is_err());
            assert!(parse_timestamp("2020-13-01 00:00:00").is_err());
        }

        #[test]
        fn test_format_timestamp_sorts_chronologically() {
            let a = Utc.with_ymd_and_hms(2020, 9, 30, 23, 0, 0).unwrap();
            let b = Utc.with_ymd_and_hms(2020, 10, 1, 1, 0, 0).unwrap();
            assert!(format_timestamp(&a) < format_timestamp(&b));
            assert_eq!(format_timestamp(&a), "2020-09-30 23:00:00");
        }

        #[test]
        fn test_sub_second_timestamps_stay_distinct() {
            let whole = Utc.with_ymd_and_hms(2020, 9, 30, 23, 0, 0).unwrap();
            let later = whole + chrono::Duration::milliseconds(250);
            let next = Utc.with_ymd_and_hms(2020, 9, 30, 23, 0, 1).unwrap();
            assert_eq!(format_timestamp(&later), "2020-09-30 23:00:00.250");
            assert!(format_timestamp(&whole) < format_timestamp(&later));
            assert!(format_timestamp(&later) < format_timestamp(&next));
            assert_eq!(parse_timestamp(&format_timestamp(&later)).unwrap(), later);
        }
    }
}
