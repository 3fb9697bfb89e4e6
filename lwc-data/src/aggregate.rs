//! Statistics for every item of a collage.

use crate::fetch::SeriesFetcher;
use crate::statistics::{self, StatisticsResult};
use log::{info, warn};
use lwc_core::cache::Cache;
use lwc_core::collage::{Collage, CollageItem};
use lwc_core::date_range::DateRange;
use lwc_core::error::Result;
use lwc_core::period::PeriodSpec;
use lwc_core::store::{Deadline, EventStore};
use std::time::Duration;

/// Runs fetch, filter and statistics for each item of a collage.
pub struct Aggregator<'a> {
    fetcher: SeriesFetcher<'a>,
    timeout: Option<Duration>,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a dyn EventStore, cache: &'a dyn Cache) -> Self {
        Aggregator {
            fetcher: SeriesFetcher::new(store, cache),
            timeout: None,
        }
    }

    /// Bound each item's event store query to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// One row per item, in `(index, name)` order.
    ///
    /// An invalid period filter aborts the run, as does any other error
    /// that is not specific to one item. Failures of a single item are
    /// logged and reported in that item's row instead.
    pub fn aggregate(&self, collage: &Collage, range: &DateRange) -> Result<Vec<StatisticsResult>> {
        collage.period.validate()?;
        info!(
            "Aggregating {} items of collage {} ({}) for {} to {}",
            collage.items.len(),
            collage.id,
            collage.name,
            range.start,
            range.end
        );

        let rows = collage
            .ordered_items()
            .into_iter()
            .map(|item| {
                let row = match self.item_statistics(item, range, &collage.period) {
                    Ok(row) => row,
                    Err(e) if e.is_per_item() => {
                        warn!("Skipping statistics for item {} ({}): {}", item.id, item.name, e);
                        StatisticsResult::skipped(e.to_string())
                    }
                    Err(e) => return Err(e),
                };
                Ok(StatisticsResult {
                    name: item.name.clone(),
                    grouping_hint: item.grouping_hint.clone(),
                    ..row
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let failed = rows.iter().filter(|r| r.error.is_some()).count();
        info!("Aggregated {} rows, {} without statistics", rows.len(), failed);
        Ok(rows)
    }

    fn item_statistics(
        &self,
        item: &CollageItem,
        range: &DateRange,
        period: &PeriodSpec,
    ) -> Result<StatisticsResult> {
        let deadline = Deadline::from_timeout(self.timeout);
        let series = self.fetcher.fetch(&item.identifier, range, deadline)?;
        let raw = series.single(&item.identifier)?;
        let events = self
            .fetcher
            .fetch_filtered(&item.identifier, range, period, raw)?;
        Ok(statistics::compute(
            &events,
            item.boundary_value,
            item.percentile_value,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::{winter_sample, year_2020, FakeStore};
    use chrono::{TimeZone, Utc};
    use lwc_core::cache::MemoryCache;
    use lwc_core::collage::CollageItem;
    use lwc_core::error::CollageError;
    use lwc_core::event::Event;
    use lwc_core::period::{DayOrNight, SummerOrWinter};
    use lwc_core::series::{SeriesIdentifier, TimeSeries};

    fn winter_collage(identifier: SeriesIdentifier) -> Collage {
        let mut collage = Collage::new(1, "Winter levels");
        collage.period = PeriodSpec {
            summer_or_winter: SummerOrWinter::Winter,
            day_or_night: DayOrNight::All,
            ..Default::default()
        };
        let mut item = CollageItem::new(10, "Waterlevel LOC1", identifier);
        item.grouping_hint = "levels".to_string();
        collage.items.push(item);
        collage
    }

    #[test]
    fn winter_collage_end_to_end() {
        let (identifier, series) = winter_sample();
        let store = FakeStore::new(series);
        let cache = MemoryCache::new();
        let collage = winter_collage(identifier);

        let rows = Aggregator::new(&store, &cache)
            .aggregate(&collage, &year_2020())
            .unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.name, "Waterlevel LOC1");
        assert_eq!(row.grouping_hint, "levels");
        assert_eq!(row.item_count, Some(2));
        assert!((row.sum.unwrap() - 8.0).abs() < 0.01);
        assert!((row.average.unwrap() - 4.0).abs() < 0.01);
        assert_eq!(row.min_event.unwrap().value, 3.0);
        assert_eq!(row.max_event.unwrap().value, 5.0);
        assert!(row.error.is_none());
    }

    #[test]
    fn series_without_events_in_range_yields_empty_row() {
        let (identifier, series) = winter_sample();
        let store = FakeStore::new(series);
        let cache = MemoryCache::new();
        let collage = winter_collage(identifier);
        let year_2019 = DateRange::from_dates(
            chrono::NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2019, 12, 31).unwrap(),
        )
        .unwrap();

        let rows = Aggregator::new(&store, &cache)
            .aggregate(&collage, &year_2019)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_count, Some(0));
        assert!(rows[0].sum.is_none());
        assert!(rows[0].min_event.is_none());
        assert!(rows[0].error.is_none());
    }

    #[test]
    fn upstream_failure_becomes_error_row() {
        let (identifier, series) = winter_sample();
        let mut store = FakeStore::new(series);
        store.fail_with = Some(CollageError::UpstreamFetch {
            identifier: identifier.to_string(),
            message: "connection refused".to_string(),
        });
        let cache = MemoryCache::new();
        let collage = winter_collage(identifier);

        let rows = Aggregator::new(&store, &cache)
            .aggregate(&collage, &year_2020())
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Waterlevel LOC1");
        assert!(rows[0].item_count.is_none());
        assert!(rows[0].error.as_deref().unwrap().contains("connection refused"));
        assert!(cache.is_empty());
    }

    #[test]
    fn errors_beyond_one_item_abort_the_run() {
        let (identifier, series) = winter_sample();
        let mut store = FakeStore::new(series);
        store.fail_with = Some(CollageError::InvalidDateRange {
            start: "2020-12-31".to_string(),
            end: "2020-01-01".to_string(),
        });
        let cache = MemoryCache::new();
        let collage = winter_collage(identifier);

        let err = Aggregator::new(&store, &cache)
            .aggregate(&collage, &year_2020())
            .unwrap_err();
        assert!(matches!(err, CollageError::InvalidDateRange { .. }));
    }

    #[test]
    fn item_without_series_is_skipped() {
        let store = FakeStore::new(TimeSeries::default());
        let cache = MemoryCache::new();
        let collage = winter_collage(SeriesIdentifier::new("fews", "NOWHERE", "H"));

        let rows = Aggregator::new(&store, &cache)
            .aggregate(&collage, &year_2020())
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Waterlevel LOC1");
        assert!(rows[0].item_count.is_none());
        assert!(rows[0].sum.is_none());
        assert!(rows[0].median.is_none());
        assert!(rows[0].error.as_deref().unwrap().contains("resolved to 0 series"));
    }

    #[test]
    fn ambiguous_item_does_not_stop_the_others() {
        let ts = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
        let base = SeriesIdentifier::new("fews", "LOC2", "Q");
        let mut series = TimeSeries::default();
        series.push(&base.clone().with_module("a"), Event::new(ts, 1.0));
        series.push(&base.clone().with_module("b"), Event::new(ts, 2.0));
        let store = FakeStore::new(series);
        let cache = MemoryCache::new();

        let mut collage = Collage::new(2, "Discharge");
        let mut ambiguous = CollageItem::new(1, "Both modules", base.clone());
        ambiguous.index = 1;
        let mut precise = CollageItem::new(2, "Module a", base.clone().with_module("a"));
        precise.index = 2;
        let mut broken = CollageItem::new(3, "No location", SeriesIdentifier::new("fews", "", "Q"));
        broken.index = 3;
        collage.items = vec![broken, precise, ambiguous];

        let rows = Aggregator::new(&store, &cache)
            .aggregate(&collage, &year_2020())
            .unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Both modules", "Module a", "No location"]);
        assert!(rows[0].error.is_some());
        assert_eq!(rows[1].item_count, Some(1));
        assert_eq!(rows[1].sum, Some(1.0));
        assert!(rows[2].error.as_deref().unwrap().contains("location"));
    }

    #[test]
    fn invalid_period_aborts() {
        let (identifier, series) = winter_sample();
        let store = FakeStore::new(series);
        let cache = MemoryCache::new();
        let mut collage = winter_collage(identifier);
        collage.period.restrict_to_month = Some(13);

        let err = Aggregator::new(&store, &cache)
            .aggregate(&collage, &year_2020())
            .unwrap_err();
        assert!(matches!(err, CollageError::InvalidPeriodSpec(_)));
        assert_eq!(store.queries.get(), 0);
    }

    #[test]
    fn timeout_fails_the_item_only() {
        let (identifier, series) = winter_sample();
        let store = FakeStore::new(series);
        let cache = MemoryCache::new();
        let collage = winter_collage(identifier);

        let rows = Aggregator::new(&store, &cache)
            .with_timeout(Duration::ZERO)
            .aggregate(&collage, &year_2020())
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].error.as_deref().unwrap().contains("Timed out"));
        assert!(cache.is_empty());
    }

    #[test]
    fn repeated_runs_hit_the_cache() {
        let (identifier, series) = winter_sample();
        let store = FakeStore::new(series);
        let cache = MemoryCache::new();
        let collage = winter_collage(identifier);
        let aggregator = Aggregator::new(&store, &cache);

        let first = aggregator.aggregate(&collage, &year_2020()).unwrap();
        let second = aggregator.aggregate(&collage, &year_2020()).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.queries.get(), 1);
        // raw series plus one filtered entry
        assert_eq!(cache.len(), 2);
    }
}
