//! CSV data loading functions for populating the collage database.
//!
//! Each loader method parses CSV data from a string slice and inserts rows
//! into the corresponding table.
//!
//! # CSV Formats
//!
//! - **Collages** (has headers): `ID,NAME,OWNER,TEMPORARY,SUMMER_OR_WINTER,RESTRICT_TO_MONTH,DAY_OF_WEEK,DAY_OR_NIGHT`
//! - **Collage items** (has headers): `ID,COLLAGE_ID,NAME,GROUPING_HINT,SOURCE,LOCATION,PARAMETER,MODULE,QUALIFIER,TIMESTEP,BOUNDARY_VALUE,PERCENTILE_VALUE,INDEX`
//! - **Events** (no headers): `source,location,parameter,module,qualifier,timestep,timestamp,value,flag,comment`

use crate::Database;
use lwc_core::collage::DEFAULT_ITEM_INDEX;
use lwc_core::period::{DayOrNight, SummerOrWinter};
use lwc_utils::dates::{format_timestamp, parse_timestamp};
use rusqlite::params;
use std::str::FromStr;

/// Empty cells become `None`.
fn optional(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an optional numeric cell, failing on text that is not a number.
fn optional_number<T: FromStr>(cell: Option<&str>, column: &str) -> anyhow::Result<Option<T>> {
    match optional(cell) {
        None => Ok(None),
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("Invalid {column} value: {s}")),
    }
}

fn parse_bool(cell: Option<&str>) -> bool {
    matches!(
        optional(cell).map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "y")
    )
}

impl Database {
    /// Load collage metadata from CSV string.
    ///
    /// Expected format (with headers):
    /// `ID,NAME,OWNER,TEMPORARY,SUMMER_OR_WINTER,RESTRICT_TO_MONTH,DAY_OF_WEEK,DAY_OR_NIGHT`
    ///
    /// Season and time of day must be `all`, `summer`/`winter` and
    /// `day`/`night` (empty means `all`). Month and weekday are stored as
    /// given and validated when statistics are computed.
    ///
    /// # Example CSV
    /// ```text
    /// ID,NAME,OWNER,TEMPORARY,SUMMER_OR_WINTER,RESTRICT_TO_MONTH,DAY_OF_WEEK,DAY_OR_NIGHT
    /// 1,Winter levels,alice,0,winter,,,all
    /// ```
    pub fn load_collages(&self, csv_data: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut count = 0u32;
        for result in rdr.records() {
            let r = result?;
            let id: i64 = r.get(0).unwrap_or("").trim().parse()?;
            let name = r.get(1).unwrap_or("").trim();
            let owner = optional(r.get(2));
            let temporary = parse_bool(r.get(3));
            let season = SummerOrWinter::from_str(r.get(4).unwrap_or(""))?;
            let month: Option<i64> = optional_number(r.get(5), "RESTRICT_TO_MONTH")?;
            let weekday: Option<i64> = optional_number(r.get(6), "DAY_OF_WEEK")?;
            let day_or_night = DayOrNight::from_str(r.get(7).unwrap_or(""))?;

            conn.execute(
                "INSERT OR REPLACE INTO collages
                 (id, name, owner, temporary, summer_or_winter, restrict_to_month, day_of_week, day_or_night)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    id,
                    name,
                    owner,
                    temporary,
                    season.to_string(),
                    month,
                    weekday,
                    day_or_night.to_string()
                ],
            )?;
            count += 1;
        }
        log::info!("loader: Loaded {} collages", count);
        Ok(())
    }

    /// Load collage items from CSV string.
    ///
    /// Expected format (with headers):
    /// `ID,COLLAGE_ID,NAME,GROUPING_HINT,SOURCE,LOCATION,PARAMETER,MODULE,QUALIFIER,TIMESTEP,BOUNDARY_VALUE,PERCENTILE_VALUE,INDEX`
    ///
    /// Empty module/qualifier/timestep cells leave that identifier part
    /// unset. An empty INDEX gets the default ordering index (100). The
    /// owning collage must already be loaded.
    ///
    /// # Example CSV
    /// ```text
    /// ID,COLLAGE_ID,NAME,GROUPING_HINT,SOURCE,LOCATION,PARAMETER,MODULE,QUALIFIER,TIMESTEP,BOUNDARY_VALUE,PERCENTILE_VALUE,INDEX
    /// 10,1,Waterlevel LOC1,levels,fews,LOC1,WATERLEVEL,,,,4.0,50,1
    /// ```
    pub fn load_collage_items(&self, csv_data: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut count = 0u32;
        for result in rdr.records() {
            let r = result?;
            let id: i64 = r.get(0).unwrap_or("").trim().parse()?;
            let collage_id: i64 = r.get(1).unwrap_or("").trim().parse()?;
            let name = r.get(2).unwrap_or("").trim();
            let grouping_hint = r.get(3).unwrap_or("").trim();
            let source = r.get(4).unwrap_or("").trim();
            let location = r.get(5).unwrap_or("").trim();
            let parameter = r.get(6).unwrap_or("").trim();
            let module = optional(r.get(7));
            let qualifier = optional(r.get(8));
            let timestep = optional(r.get(9));
            let boundary: Option<f64> = optional_number(r.get(10), "BOUNDARY_VALUE")?;
            let percentile: Option<f64> = optional_number(r.get(11), "PERCENTILE_VALUE")?;
            let index: i64 = optional_number(r.get(12), "INDEX")?
                .unwrap_or(i64::from(DEFAULT_ITEM_INDEX));

            conn.execute(
                "INSERT OR REPLACE INTO collage_items
                 (id, collage_id, name, grouping_hint, source, location, parameter,
                  module, qualifier, timestep, boundary_value, percentile_value, item_index)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    id,
                    collage_id,
                    name,
                    grouping_hint,
                    source,
                    location,
                    parameter,
                    module,
                    qualifier,
                    timestep,
                    boundary,
                    percentile,
                    index
                ],
            )?;
            count += 1;
        }
        log::info!("loader: Loaded {} collage items", count);
        Ok(())
    }

    /// Load time-series events from CSV string.
    ///
    /// Expected format (no headers):
    /// `source,location,parameter,module,qualifier,timestep,timestamp,value,flag,comment`
    ///
    /// Timestamps are converted to UTC. Rows with a non-numeric or
    /// non-finite value, an unreadable timestamp, a flag that is not a
    /// 32-bit integer or no location are skipped. An empty flag means 0.
    ///
    /// # Example CSV
    /// ```text
    /// fews,LOC1,WATERLEVEL,,,,2020-01-15 00:00:00,5.0,0,
    /// fews,LOC1,WATERLEVEL,,,,2020-07-15T12:00:00+02:00,9.0,6,estimated
    /// ```
    pub fn load_events(&self, csv_data: &str) -> anyhow::Result<()> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut count = 0u32;
        let mut skipped = 0u32;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO events
                 (source, location, parameter, module, qualifier, timestep, timestamp, value, flag, comment)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for result in rdr.records() {
                let r = result?;
                let source = r.get(0).unwrap_or("").trim();
                let location = r.get(1).unwrap_or("").trim();
                let parameter = r.get(2).unwrap_or("").trim();
                let module = r.get(3).unwrap_or("").trim();
                let qualifier = r.get(4).unwrap_or("").trim();
                let timestep = r.get(5).unwrap_or("").trim();

                let timestamp = match parse_timestamp(r.get(6).unwrap_or("")) {
                    Ok(ts) => ts,
                    Err(_) => { skipped += 1; continue; }
                };
                let value: f64 = match r.get(7).unwrap_or("").trim().parse::<f64>() {
                    Ok(v) if v.is_finite() => v,
                    _ => { skipped += 1; continue; }
                };
                if location.is_empty() || parameter.is_empty() {
                    skipped += 1;
                    continue;
                }
                let flag: i32 = match optional(r.get(8)).map(str::parse::<i32>) {
                    None => 0,
                    Some(Ok(f)) => f,
                    Some(Err(_)) => { skipped += 1; continue; }
                };
                let comment = optional(r.get(9));

                stmt.execute(params![
                    source,
                    location,
                    parameter,
                    module,
                    qualifier,
                    timestep,
                    format_timestamp(&timestamp),
                    value,
                    flag,
                    comment
                ])?;
                count += 1;
            }
        }
        tx.commit()?;
        log::info!("loader: Loaded {} events, skipped {} invalid", count, skipped);
        Ok(())
    }
}
