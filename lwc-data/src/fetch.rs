//! Cached retrieval of raw and period-filtered series.
//!
//! Raw and filtered series are cached under separate keys, so one raw
//! fetch serves every period filter applied to it.

use crate::filter;
use log::{debug, warn};
use lwc_core::cache::{Cache, CacheKey};
use lwc_core::date_range::DateRange;
use lwc_core::error::Result;
use lwc_core::event::Event;
use lwc_core::period::PeriodSpec;
use lwc_core::series::{SeriesIdentifier, TimeSeries};
use lwc_core::store::{Deadline, EventStore};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Fetches series through a cache in front of an event store.
pub struct SeriesFetcher<'a> {
    store: &'a dyn EventStore,
    cache: &'a dyn Cache,
}

impl<'a> SeriesFetcher<'a> {
    pub fn new(store: &'a dyn EventStore, cache: &'a dyn Cache) -> Self {
        SeriesFetcher { store, cache }
    }

    /// The raw series for `identifier` within `range`.
    ///
    /// Fails with `MissingIdentifier` before touching the cache or the
    /// store when a required identifier field is blank.
    pub fn fetch(
        &self,
        identifier: &SeriesIdentifier,
        range: &DateRange,
        deadline: Deadline,
    ) -> Result<TimeSeries> {
        identifier.validate()?;
        let key = CacheKey::Series {
            identifier: identifier.clone(),
            range: *range,
        }
        .to_string();
        if let Some(series) = self.lookup::<TimeSeries>(&key) {
            return Ok(series);
        }
        let series = self.store.query(identifier, range, deadline)?;
        self.store_value(&key, &series);
        Ok(series)
    }

    /// `raw_events` reduced by `spec`, cached per identifier, range and spec.
    pub fn fetch_filtered(
        &self,
        identifier: &SeriesIdentifier,
        range: &DateRange,
        spec: &PeriodSpec,
        raw_events: &[Event],
    ) -> Result<Vec<Event>> {
        identifier.validate()?;
        let key = CacheKey::Filtered {
            identifier: identifier.clone(),
            range: *range,
            period: *spec,
        }
        .to_string();
        if let Some(events) = self.lookup::<Vec<Event>>(&key) {
            return Ok(events);
        }
        let events = filter::filter(raw_events, spec);
        self.store_value(&key, &events);
        Ok(events)
    }

    fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.cache.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!("cache hit: {key}");
                Some(value)
            }
            Err(e) => {
                warn!("Discarding unreadable cache entry {key}: {e}");
                None
            }
        }
    }

    fn store_value<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => {
                debug!("cache store: {key}");
                self.cache.set(key, json);
            }
            Err(e) => warn!("Could not serialise cache entry {key}: {e}"),
        }
    }
}
