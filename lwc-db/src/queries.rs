//! Typed query methods for collages, events and the cache table.

use crate::models::CollageInfo;
use crate::Database;
use chrono::NaiveDateTime;
use lwc_core::collage::{Collage, CollageItem};
use lwc_core::date_range::DateRange;
use lwc_core::event::Event;
use lwc_core::period::PeriodSpec;
use lwc_core::series::{SeriesIdentifier, TimeSeries};
use lwc_utils::dates::{format_timestamp, TIMESTAMP_FORMAT};
use rusqlite::{params, Connection, OptionalExtension};

/// Stored empty strings are unset identifier parts.
fn unset_if_empty(part: String) -> Option<String> {
    if part.is_empty() {
        None
    } else {
        Some(part)
    }
}

/// Negative stored values cannot be valid; map them out of range so that
/// period validation rejects them.
fn stored_index(value: Option<i64>) -> Option<u32> {
    value.map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// Identifier from the first six columns of an `events` row.
fn stored_identifier(row: &rusqlite::Row<'_>) -> rusqlite::Result<SeriesIdentifier> {
    Ok(SeriesIdentifier {
        source: row.get(0)?,
        location: row.get(1)?,
        parameter: row.get(2)?,
        module: unset_if_empty(row.get(3)?),
        qualifier: unset_if_empty(row.get(4)?),
        timestep: unset_if_empty(row.get(5)?),
    })
}

/// Every stored series that `identifier` matches, regardless of time.
fn resolve_series(
    conn: &Connection,
    identifier: &SeriesIdentifier,
) -> anyhow::Result<Vec<SeriesIdentifier>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT source, location, parameter, module, qualifier, timestep
         FROM events
         WHERE source = ?1 AND location = ?2 AND parameter = ?3
         ORDER BY module, qualifier, timestep",
    )?;
    let stored = stmt
        .query_map(
            params![identifier.source, identifier.location, identifier.parameter],
            stored_identifier,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(stored
        .into_iter()
        .filter(|resolved| identifier.matches(resolved))
        .collect())
}

/// Raw `events` row as read from SQLite.
struct EventRow {
    identifier: SeriesIdentifier,
    timestamp: String,
    value: f64,
    flag: i64,
    comment: Option<String>,
}

impl EventRow {
    fn into_event(self) -> anyhow::Result<(SeriesIdentifier, Event)> {
        let timestamp = NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| anyhow::anyhow!("Bad stored timestamp {}: {}", self.timestamp, e))?
            .and_utc();
        let mut event = Event::new(timestamp, self.value).with_flag(i32::try_from(self.flag)?);
        if let Some(comment) = self.comment {
            event = event.with_comment(comment);
        }
        Ok((self.identifier, event))
    }
}

impl Database {
    // ───────────────────── Collage Queries ─────────────────────

    /// Get one collage with its items, or `None` if it does not exist.
    ///
    /// Items are returned in insertion (id) order; use
    /// [`Collage::ordered_items`] for presentation order.
    pub fn query_collage(&self, collage_id: i64) -> anyhow::Result<Option<Collage>> {
        let conn = self.conn.borrow();
        let header = conn
            .query_row(
                "SELECT id, name, owner, temporary, summer_or_winter,
                        restrict_to_month, day_of_week, day_or_night
                 FROM collages WHERE id = ?1",
                params![collage_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, bool>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Option<i64>>(5)?,
                        row.get::<_, Option<i64>>(6)?,
                        row.get::<_, String>(7)?,
                    ))
                },
            )
            .optional()?;
        let Some((id, name, owner, temporary, season, month, weekday, day_or_night)) = header
        else {
            return Ok(None);
        };
        let period = PeriodSpec {
            summer_or_winter: season.parse()?,
            restrict_to_month: stored_index(month),
            day_of_week: stored_index(weekday),
            day_or_night: day_or_night.parse()?,
        };

        let mut stmt = conn.prepare(
            "SELECT id, name, grouping_hint, source, location, parameter,
                    module, qualifier, timestep, boundary_value, percentile_value, item_index
             FROM collage_items
             WHERE collage_id = ?1
             ORDER BY id",
        )?;
        let items = stmt
            .query_map(params![collage_id], |row| {
                Ok(CollageItem {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    grouping_hint: row.get(2)?,
                    identifier: SeriesIdentifier {
                        source: row.get(3)?,
                        location: row.get(4)?,
                        parameter: row.get(5)?,
                        module: row.get(6)?,
                        qualifier: row.get(7)?,
                        timestep: row.get(8)?,
                    },
                    boundary_value: row.get(9)?,
                    percentile_value: row.get(10)?,
                    index: row.get(11)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "query: query_collage({}) returned {} items",
            collage_id,
            items.len()
        );

        Ok(Some(Collage {
            id,
            name,
            owner,
            temporary,
            period,
            items,
        }))
    }

    /// List all collages with their item counts, ordered by name.
    pub fn query_collages(&self) -> anyhow::Result<Vec<CollageInfo>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT c.id, c.name, c.owner, c.temporary, COUNT(i.id)
             FROM collages c
             LEFT JOIN collage_items i ON i.collage_id = c.id
             GROUP BY c.id
             ORDER BY c.name, c.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CollageInfo {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    owner: row.get(2)?,
                    temporary: row.get(3)?,
                    item_count: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Change the threshold and percentile settings of one item.
    pub fn update_item_settings(
        &self,
        item_id: i64,
        boundary_value: Option<f64>,
        percentile_value: Option<f64>,
    ) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let updated = conn.execute(
            "UPDATE collage_items SET boundary_value = ?1, percentile_value = ?2 WHERE id = ?3",
            params![boundary_value, percentile_value, item_id],
        )?;
        if updated == 0 {
            anyhow::bail!("Collage item {} not found", item_id);
        }
        Ok(())
    }

    /// Delete a collage and, through the foreign key, its items.
    ///
    /// Returns false if there was no such collage.
    pub fn delete_collage(&self, collage_id: i64) -> anyhow::Result<bool> {
        let conn = self.conn.borrow();
        let deleted = conn.execute("DELETE FROM collages WHERE id = ?1", params![collage_id])?;
        Ok(deleted > 0)
    }

    /// Delete every temporary collage together with its items.
    pub fn delete_temporary_collages(&self) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let deleted = conn.execute("DELETE FROM collages WHERE temporary = 1", [])?;
        log::info!("query: removed {} temporary collages", deleted);
        Ok(deleted)
    }

    // ───────────────────── Event Queries ─────────────────────

    /// Get all series matching `identifier` within `range`.
    ///
    /// Unset optional identifier parts match any stored value, so the
    /// result may hold several series. Which series match is decided over
    /// all stored events, not only those in `range`: a matching series
    /// with no events in range is returned empty. Series are ordered by
    /// their resolved identifier, events by timestamp.
    pub fn query_events(
        &self,
        identifier: &SeriesIdentifier,
        range: &DateRange,
    ) -> anyhow::Result<TimeSeries> {
        let conn = self.conn.borrow();
        let mut series = TimeSeries::default();
        for resolved in resolve_series(&conn, identifier)? {
            series.open(&resolved);
        }

        let mut stmt = conn.prepare(
            "SELECT source, location, parameter, module, qualifier, timestep,
                    timestamp, value, flag, comment
             FROM events
             WHERE source = ?1 AND location = ?2 AND parameter = ?3
               AND (?4 IS NULL OR module = ?4)
               AND (?5 IS NULL OR qualifier = ?5)
               AND (?6 IS NULL OR timestep = ?6)
               AND timestamp >= ?7 AND timestamp <= ?8
             ORDER BY module, qualifier, timestep, timestamp",
        )?;
        let rows = stmt
            .query_map(
                params![
                    identifier.source,
                    identifier.location,
                    identifier.parameter,
                    identifier.module,
                    identifier.qualifier,
                    identifier.timestep,
                    format_timestamp(&range.start),
                    format_timestamp(&range.end),
                ],
                |row| {
                    Ok(EventRow {
                        identifier: stored_identifier(row)?,
                        timestamp: row.get(6)?,
                        value: row.get(7)?,
                        flag: row.get(8)?,
                        comment: row.get(9)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let count = rows.len();
        for row in rows {
            let (resolved, event) = row.into_event()?;
            series.push(&resolved, event);
        }
        log::info!(
            "query: query_events({}) returned {} events in {} series",
            identifier,
            count,
            series.len()
        );
        Ok(series)
    }

    /// Total number of stored events.
    pub fn count_events(&self) -> anyhow::Result<i64> {
        let conn = self.conn.borrow();
        Ok(conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?)
    }

    // ───────────────────── Cache Table ─────────────────────

    pub fn cache_get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let conn = self.conn.borrow();
        Ok(conn
            .query_row("SELECT value FROM cache WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?)
    }

    pub fn cache_set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT OR REPLACE INTO cache (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Drop every cached series; needed after new events are loaded.
    pub fn clear_cache(&self) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        Ok(conn.execute("DELETE FROM cache", [])?)
    }
}
