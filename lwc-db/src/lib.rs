//! SQLite storage layer for layer collages.
//!
//! This crate loads collage definitions and time-series events from CSV
//! into SQLite and exposes typed query methods. [`Database`] also serves as
//! the event store and the statistics cache for the aggregation engine in
//! `lwc-data`.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper, single-threaded
//! - In-memory database for tests and one-off runs, file database for the CLI
//! - CSV loaders for collages, collage items and events
//! - Typed query methods returning `lwc-core` domain types
//!
//! # Usage
//!
//! ```rust
//! use lwc_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_collages("ID,NAME,OWNER,TEMPORARY,SUMMER_OR_WINTER,RESTRICT_TO_MONTH,DAY_OF_WEEK,DAY_OR_NIGHT\n1,Winter levels,,0,winter,,,all\n").unwrap();
//! db.load_events("fews,LOC1,WATERLEVEL,,,,2020-01-15 00:00:00,5.0,0,\n").unwrap();
//!
//! let collage = db.query_collage(1).unwrap().unwrap();
//! assert_eq!(collage.name, "Winter levels");
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.

pub mod schema;
mod loader;
mod queries;
mod store;
pub mod models;

use rusqlite::Connection;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// SQLite database holding collages, events and cached series.
///
/// This struct is cheaply cloneable (via `Rc`); clones share one connection.
///
/// # Example
///
/// ```rust
/// use lwc_db::Database;
///
/// let db = Database::new().unwrap();
/// db.load_collages("ID,NAME,OWNER,TEMPORARY,SUMMER_OR_WINTER,RESTRICT_TO_MONTH,DAY_OF_WEEK,DAY_OR_NIGHT\n1,Rivers,,1,all,,,all\n").unwrap();
/// assert_eq!(db.delete_temporary_collages().unwrap(), 1);
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Open (or create) a database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("db: opening {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_COLLAGE: &str = "ID,NAME,OWNER,TEMPORARY,SUMMER_OR_WINTER,RESTRICT_TO_MONTH,DAY_OF_WEEK,DAY_OR_NIGHT\n1,Rivers,,0,all,,,all\n";

    #[test]
    fn database_creates_successfully() {
        let db = Database::new();
        assert!(db.is_ok(), "Database should create without errors");
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::new().unwrap();
        let db2 = db.clone();
        // Both should reference the same underlying connection
        db.load_collages(ONE_COLLAGE).unwrap();
        let collages = db2.query_collages().unwrap();
        assert_eq!(collages.len(), 1, "Clone should see same data via shared Rc");
    }

    #[test]
    fn database_starts_empty() {
        let db = Database::new().unwrap();
        assert!(db.query_collages().unwrap().is_empty());
        assert_eq!(db.count_events().unwrap(), 0);
    }

    #[test]
    fn file_database_persists_between_opens() {
        let path = std::env::temp_dir().join(format!("lwc-db-test-{}.sqlite", std::process::id()));
        let _ = std::fs::remove_file(&path);
        {
            let db = Database::open(&path).unwrap();
            db.load_collages(ONE_COLLAGE).unwrap();
        }
        let reopened = Database::open(&path).unwrap();
        assert_eq!(reopened.query_collages().unwrap().len(), 1);
        drop(reopened);
        let _ = std::fs::remove_file(&path);
    }
}
