//! Period filtering, statistics and export for collage time series.
//!
//! Data flow per collage item:
//! [`fetch::SeriesFetcher::fetch`] (raw series, cached) →
//! [`fetch::SeriesFetcher::fetch_filtered`] (period filter, cached) →
//! [`statistics::compute`] → one [`statistics::StatisticsResult`] row.
//! [`aggregate::Aggregator`] drives this for every item and
//! [`export`] renders the rows as CSV or JSON.

pub mod aggregate;
pub mod export;
pub mod fetch;
pub mod filter;
pub mod statistics;
