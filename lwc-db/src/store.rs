//! [`EventStore`] and [`Cache`] on top of the SQLite tables.

use crate::Database;
use lwc_core::cache::Cache;
use lwc_core::date_range::DateRange;
use lwc_core::error::{CollageError, Result};
use lwc_core::series::{SeriesIdentifier, TimeSeries};
use lwc_core::store::{Deadline, EventStore};

impl EventStore for Database {
    /// The deadline is checked before and after the query; SQLite itself
    /// is not interrupted.
    fn query(
        &self,
        identifier: &SeriesIdentifier,
        range: &DateRange,
        deadline: Deadline,
    ) -> Result<TimeSeries> {
        deadline.check(identifier)?;
        let series = self
            .query_events(identifier, range)
            .map_err(|e| CollageError::UpstreamFetch {
                identifier: identifier.to_string(),
                message: e.to_string(),
            })?;
        deadline.check(identifier)?;
        Ok(series)
    }
}

impl Cache for Database {
    fn get(&self, key: &str) -> Option<String> {
        match self.cache_get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("cache: read of {} failed: {}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: String) {
        if let Err(e) = self.cache_set(key, &value) {
            log::warn!("cache: write of {} failed: {}", key, e);
        }
    }
}
