//! Temporal inclusion filters shared by every item of a collage.

use crate::error::{CollageError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Season restriction.
///
/// Summer covers April through September; winter is the complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummerOrWinter {
    #[default]
    All,
    Summer,
    Winter,
}

/// Time-of-day restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOrNight {
    #[default]
    All,
    Day,
    Night,
}

/// Conjunctive set of temporal filters applied before statistics are computed.
///
/// The default value restricts nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PeriodSpec {
    pub summer_or_winter: SummerOrWinter,
    /// Calendar month, 1-12.
    pub restrict_to_month: Option<u32>,
    /// Weekday index, 0 = Monday through 6 = Sunday.
    pub day_of_week: Option<u32>,
    pub day_or_night: DayOrNight,
}

impl PeriodSpec {
    /// Reject month and weekday values outside their calendar ranges.
    pub fn validate(&self) -> Result<()> {
        if let Some(month) = self.restrict_to_month {
            if !(1..=12).contains(&month) {
                return Err(CollageError::InvalidPeriodSpec(format!(
                    "month {month} is outside 1-12"
                )));
            }
        }
        if let Some(weekday) = self.day_of_week {
            if weekday > 6 {
                return Err(CollageError::InvalidPeriodSpec(format!(
                    "day of week {weekday} is outside 0-6"
                )));
            }
        }
        Ok(())
    }

    /// True if no filter is active.
    pub fn is_unrestricted(&self) -> bool {
        *self == PeriodSpec::default()
    }
}

impl fmt::Display for PeriodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.restrict_to_month.map(|m| m.to_string());
        let weekday = self.day_of_week.map(|d| d.to_string());
        write!(
            f,
            "season={};month={};weekday={};daynight={}",
            self.summer_or_winter,
            month.as_deref().unwrap_or("-"),
            weekday.as_deref().unwrap_or("-"),
            self.day_or_night,
        )
    }
}

impl fmt::Display for SummerOrWinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SummerOrWinter::All => "all",
            SummerOrWinter::Summer => "summer",
            SummerOrWinter::Winter => "winter",
        };
        f.write_str(s)
    }
}

impl FromStr for SummerOrWinter {
    type Err = CollageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(SummerOrWinter::All),
            "summer" => Ok(SummerOrWinter::Summer),
            "winter" => Ok(SummerOrWinter::Winter),
            other => Err(CollageError::InvalidPeriodSpec(format!(
                "unknown season '{other}'"
            ))),
        }
    }
}

impl fmt::Display for DayOrNight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayOrNight::All => "all",
            DayOrNight::Day => "day",
            DayOrNight::Night => "night",
        };
        f.write_str(s)
    }
}

impl FromStr for DayOrNight {
    type Err = CollageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(DayOrNight::All),
            "day" => Ok(DayOrNight::Day),
            "night" => Ok(DayOrNight::Night),
            other => Err(CollageError::InvalidPeriodSpec(format!(
                "unknown time of day '{other}'"
            ))),
        }
    }
}
