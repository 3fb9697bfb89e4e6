//! Cache keys and the key-value cache seam used by the series fetchers.
//!
//! Values are stored as JSON strings. Writes are best-effort and the last
//! write for a key wins; every value is a deterministic function of its
//! key, so concurrent writers cannot disagree.

use crate::date_range::DateRange;
use crate::period::PeriodSpec;
use crate::series::SeriesIdentifier;
use chrono::SecondsFormat;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// Identifies one cached computation.
///
/// The `Display` form is the string stored in the cache and is stable
/// across processes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Raw series as returned by the event store.
    Series {
        identifier: SeriesIdentifier,
        range: DateRange,
    },
    /// Events left after applying a period filter to the raw series.
    Filtered {
        identifier: SeriesIdentifier,
        range: DateRange,
        period: PeriodSpec,
    },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stamp = |range: &DateRange| {
            (
                range.start.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                range.end.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )
        };
        match self {
            CacheKey::Series { identifier, range } => {
                let (start, end) = stamp(range);
                write!(f, "series:{identifier}:{start}:{end}")
            }
            CacheKey::Filtered {
                identifier,
                range,
                period,
            } => {
                let (start, end) = stamp(range);
                write!(f, "filtered:{identifier}:{start}:{end}:{period}")
            }
        }
    }
}

/// A string key-value cache.
pub trait Cache {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// Process-local cache, used in tests and for one-off CLI runs.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries.borrow_mut().insert(key.to_string(), value);
    }
}
