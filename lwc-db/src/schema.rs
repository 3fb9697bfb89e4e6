//! SQL schema definitions for the collage database.
//!
//! Contains CREATE TABLE statements for collages, their items, the event
//! store and the statistics cache. The schema is applied as a single batch
//! when the database is opened.

/// Returns the full SQL schema as a single batch string.
///
/// This creates the following tables:
///
/// - `collages` - Collage metadata and its period filter
/// - `collage_items` - Items of a collage; removed with their collage
/// - `events` - Time-series events keyed by series identifier and timestamp
/// - `cache` - Key-value store for fetched and filtered series (JSON text)
///
/// Optional identifier parts are stored as empty strings in `events` so
/// they can be part of the primary key.
pub fn create_schema() -> &'static str {
    r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS collages (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        owner TEXT,
        temporary INTEGER NOT NULL DEFAULT 0,
        summer_or_winter TEXT NOT NULL DEFAULT 'all',
        restrict_to_month INTEGER,
        day_of_week INTEGER,
        day_or_night TEXT NOT NULL DEFAULT 'all'
    );

    CREATE TABLE IF NOT EXISTS collage_items (
        id INTEGER PRIMARY KEY,
        collage_id INTEGER NOT NULL REFERENCES collages(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        grouping_hint TEXT NOT NULL DEFAULT '',
        source TEXT NOT NULL,
        location TEXT NOT NULL,
        parameter TEXT NOT NULL,
        module TEXT,
        qualifier TEXT,
        timestep TEXT,
        boundary_value REAL,
        percentile_value REAL,
        item_index INTEGER NOT NULL DEFAULT 100
    );
    CREATE INDEX IF NOT EXISTS idx_items_collage ON collage_items(collage_id);

    CREATE TABLE IF NOT EXISTS events (
        source TEXT NOT NULL,
        location TEXT NOT NULL,
        parameter TEXT NOT NULL,
        module TEXT NOT NULL DEFAULT '',
        qualifier TEXT NOT NULL DEFAULT '',
        timestep TEXT NOT NULL DEFAULT '',
        timestamp TEXT NOT NULL,
        value REAL NOT NULL,
        flag INTEGER NOT NULL DEFAULT 0,
        comment TEXT,
        PRIMARY KEY (source, location, parameter, module, qualifier, timestep, timestamp)
    );
    CREATE INDEX IF NOT EXISTS idx_events_location ON events(location, parameter);
    CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp);

    CREATE TABLE IF NOT EXISTS cache (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");
    }

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();

        let expected_tables = ["collages", "collage_items", "events", "cache"];

        for table in &expected_tables {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table '{}' should exist", table);
        }
    }

    #[test]
    fn schema_enables_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        // Applying schema a second time should not fail due to IF NOT EXISTS.
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }
}
