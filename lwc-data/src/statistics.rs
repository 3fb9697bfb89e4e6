//! Summary statistics over a filtered series.
//!
//! Percentiles use the rank index `floor(fraction * n)` into the values
//! sorted ascending, without interpolation. Existing reports depend on
//! these exact numbers.

use chrono::{DateTime, Utc};
use lwc_core::event::Event;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const MEDIAN_FRACTION: f64 = 0.5;
pub const P90_FRACTION: f64 = 0.9;

/// A value together with the time it was measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventPoint {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<&Event> for EventPoint {
    fn from(event: &Event) -> Self {
        EventPoint {
            value: event.value,
            timestamp: event.timestamp,
        }
    }
}

/// Statistics for one collage item over one query range.
///
/// `item_count` is `Some(0)` when the item had no events left after
/// filtering and `None` when statistics were skipped because of `error`.
/// Every other numeric field is absent when there are no events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub name: String,
    pub grouping_hint: String,
    pub item_count: Option<usize>,
    pub min_event: Option<EventPoint>,
    pub max_event: Option<EventPoint>,
    pub sum: Option<f64>,
    pub average: Option<f64>,
    /// The item's boundary value, echoed when the counts are present.
    pub threshold: Option<f64>,
    pub count_at_or_below: Option<usize>,
    pub count_above: Option<usize>,
    /// The item's percentile setting, echoed when percentiles are present.
    pub percentile_value: Option<f64>,
    pub median: Option<f64>,
    pub p90: Option<f64>,
    pub user_percentile: Option<f64>,
    pub error: Option<String>,
}

impl StatisticsResult {
    /// A row with every statistic absent and the failure recorded.
    pub fn skipped(error: impl Into<String>) -> Self {
        StatisticsResult {
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Compute statistics for `events`.
///
/// Never fails: an empty slice gives `item_count == Some(0)` and nothing
/// else, and an unusable `percentile_value` leaves `user_percentile` absent.
/// Min, max and percentiles order values by `f64::total_cmp`, so a NaN
/// value ranks above positive infinity.
pub fn compute(
    events: &[Event],
    boundary_value: Option<f64>,
    percentile_value: Option<f64>,
) -> StatisticsResult {
    let n = events.len();
    let mut result = StatisticsResult {
        item_count: Some(n),
        ..Default::default()
    };
    let Some(first) = events.first() else {
        return result;
    };

    let mut min = first;
    let mut max = first;
    let mut sum = 0.0;
    for event in events {
        if event.value.total_cmp(&min.value) == Ordering::Less {
            min = event;
        }
        if event.value.total_cmp(&max.value) == Ordering::Greater {
            max = event;
        }
        sum += event.value;
    }
    result.min_event = Some(min.into());
    result.max_event = Some(max.into());
    result.sum = Some(sum);
    result.average = Some(sum / n as f64);

    if let Some(boundary) = boundary_value {
        let at_or_below = events.iter().filter(|e| e.value <= boundary).count();
        result.threshold = Some(boundary);
        result.count_at_or_below = Some(at_or_below);
        result.count_above = Some(n - at_or_below);
    }

    let mut sorted: Vec<f64> = events.iter().map(|e| e.value).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let at = |fraction: f64| rank_index(fraction, n).map(|i| sorted[i]);
    result.percentile_value = percentile_value;
    result.median = at(MEDIAN_FRACTION);
    result.p90 = at(P90_FRACTION);
    result.user_percentile = percentile_value.and_then(|p| at(p / 100.0));

    result
}

/// `floor(fraction * n)` if that is a valid index into `n` elements.
pub fn rank_index(fraction: f64, n: usize) -> Option<usize> {
    let rank = (fraction * n as f64).floor();
    if !rank.is_finite() || rank < 0.0 || rank >= n as f64 {
        return None;
    }
    Some(rank as usize)
}
