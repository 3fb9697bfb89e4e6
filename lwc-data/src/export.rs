//! CSV and JSON export of collage statistics.

use crate::statistics::{EventPoint, StatisticsResult};
use lwc_utils::dates::format_timestamp;
use std::io::Write;

/// Column headers of the CSV export.
pub const CSV_HEADERS: [&str; 17] = [
    "name",
    "grouping_hint",
    "item_count",
    "min_value",
    "min_date",
    "max_value",
    "max_date",
    "average",
    "sum",
    "threshold",
    "count_at_or_below",
    "count_above",
    "median",
    "p90",
    "percentile_value",
    "user_percentile",
    "error",
];

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn point_cells(point: Option<EventPoint>) -> (String, String) {
    match point {
        Some(p) => (p.value.to_string(), format_timestamp(&p.timestamp)),
        None => (String::new(), String::new()),
    }
}

/// Write one CSV row per result, absent values as empty cells.
pub fn write_csv<W: Write>(rows: &[StatisticsResult], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;
    for row in rows {
        let (min_value, min_date) = point_cells(row.min_event);
        let (max_value, max_date) = point_cells(row.max_event);
        wtr.write_record([
            row.name.clone(),
            row.grouping_hint.clone(),
            cell(row.item_count),
            min_value,
            min_date,
            max_value,
            max_date,
            cell(row.average),
            cell(row.sum),
            cell(row.threshold),
            cell(row.count_at_or_below),
            cell(row.count_above),
            cell(row.median),
            cell(row.p90),
            cell(row.percentile_value),
            cell(row.user_percentile),
            cell(row.error.as_deref()),
        ])?;
    }
    wtr.flush()?;
    log::info!("export: wrote {} CSV rows", rows.len());
    Ok(())
}

/// Render the results as a pretty-printed JSON array.
pub fn to_json(rows: &[StatisticsResult]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
