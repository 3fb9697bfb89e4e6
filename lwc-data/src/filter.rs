//! Temporal predicate filter.
//!
//! Each active field of a [`PeriodSpec`] becomes one [`Predicate`]; an event
//! is kept when every predicate accepts its timestamp.

use chrono::{DateTime, Datelike, Timelike, Utc};
use lwc_core::event::Event;
use lwc_core::period::{DayOrNight, PeriodSpec, SummerOrWinter};
use std::ops::{Range, RangeInclusive};

/// April through September.
pub const SUMMER_MONTHS: RangeInclusive<u32> = 4..=9;

/// Hours counted as "day". Only the 05:00 hour qualifies; this matches the
/// reports produced so far and is kept as is until the intended window is
/// confirmed.
pub const DAY_HOURS: Range<u32> = 5..6;

/// First hour counted as "night"; night runs to the end of the day.
pub const NIGHT_START_HOUR: u32 = 6;

/// A single temporal inclusion test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Summer,
    Winter,
    Month(u32),
    Day,
    Night,
    /// Weekday index, Monday = 0.
    Weekday(u32),
}

impl Predicate {
    pub fn matches(&self, timestamp: &DateTime<Utc>) -> bool {
        match *self {
            Predicate::Summer => SUMMER_MONTHS.contains(&timestamp.month()),
            Predicate::Winter => !SUMMER_MONTHS.contains(&timestamp.month()),
            Predicate::Month(month) => timestamp.month() == month,
            Predicate::Day => DAY_HOURS.contains(&timestamp.hour()),
            Predicate::Night => timestamp.hour() >= NIGHT_START_HOUR,
            Predicate::Weekday(index) => timestamp.weekday().num_days_from_monday() == index,
        }
    }
}

/// The predicates a period spec switches on. Empty when nothing is restricted.
pub fn predicates(spec: &PeriodSpec) -> Vec<Predicate> {
    let mut result = Vec::new();
    match spec.summer_or_winter {
        SummerOrWinter::All => {}
        SummerOrWinter::Summer => result.push(Predicate::Summer),
        SummerOrWinter::Winter => result.push(Predicate::Winter),
    }
    if let Some(month) = spec.restrict_to_month {
        result.push(Predicate::Month(month));
    }
    match spec.day_or_night {
        DayOrNight::All => {}
        DayOrNight::Day => result.push(Predicate::Day),
        DayOrNight::Night => result.push(Predicate::Night),
    }
    if let Some(weekday) = spec.day_of_week {
        result.push(Predicate::Weekday(weekday));
    }
    result
}

/// Events that satisfy every active filter of `spec`, in input order.
///
/// Builds a new vector; `events` is left untouched.
pub fn filter(events: &[Event], spec: &PeriodSpec) -> Vec<Event> {
    let active = predicates(spec);
    events
        .iter()
        .filter(|event| active.iter().all(|p| p.matches(&event.timestamp)))
        .cloned()
        .collect()
}
