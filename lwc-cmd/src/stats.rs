//! Collage statistics: aggregate one collage over a date range and export.

use clap::ValueEnum;
use log::info;
use lwc_core::cache::{Cache, MemoryCache};
use lwc_core::date_range::DateRange;
use lwc_data::aggregate::Aggregator;
use lwc_data::export;
use lwc_data::statistics::StatisticsResult;
use lwc_db::Database;
use lwc_utils::dates::{format_date, parse_date};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Knobs for a statistics run.
#[derive(Debug, Clone, Default)]
pub struct StatsOptions {
    /// Per-item bound on the event store query.
    pub timeout: Option<Duration>,
    /// Use a throwaway in-memory cache instead of the database cache table.
    pub memory_cache: bool,
}

/// Compute statistics for collage `collage_id` between `start` and `end`
/// (inclusive days, YYYY-MM-DD) and write them as CSV or JSON.
pub fn run_stats(
    database: &str,
    collage_id: i64,
    start: &str,
    end: &str,
    format: OutputFormat,
    output: Option<&str>,
    options: &StatsOptions,
) -> anyhow::Result<()> {
    let (first, last) = (parse_date(start)?, parse_date(end)?);
    let range = DateRange::from_dates(first, last)?;
    info!(
        "Computing statistics for collage {} from {} to {}",
        collage_id,
        format_date(&first),
        format_date(&last)
    );
    let db = Database::open(database)?;
    let rows = collage_statistics(&db, collage_id, &range, options)?;
    let rendered = render(&rows, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!("Statistics for {} items written to {}", rows.len(), path);
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Aggregate one collage using `db` as the event store.
pub fn collage_statistics(
    db: &Database,
    collage_id: i64,
    range: &DateRange,
    options: &StatsOptions,
) -> anyhow::Result<Vec<StatisticsResult>> {
    let collage = db
        .query_collage(collage_id)?
        .ok_or_else(|| anyhow::anyhow!("Collage {} not found", collage_id))?;

    let memory = MemoryCache::new();
    let cache: &dyn Cache = if options.memory_cache { &memory } else { db };
    let mut aggregator = Aggregator::new(db, cache);
    if let Some(timeout) = options.timeout {
        aggregator = aggregator.with_timeout(timeout);
    }
    Ok(aggregator.aggregate(&collage, range)?)
}

/// Render rows in the requested format.
pub fn render(rows: &[StatisticsResult], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            export::write_csv(rows, &mut buf)?;
            Ok(String::from_utf8(buf)?)
        }
        OutputFormat::Json => export::to_json(rows),
    }
}
