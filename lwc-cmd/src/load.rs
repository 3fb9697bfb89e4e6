//! Import collage definitions and events from CSV files.

use log::info;
use lwc_db::Database;

/// Load whichever CSV files are given into the database at `database`.
///
/// Collages are loaded before their items. Loading events clears the
/// statistics cache, since cached series may now be stale.
pub fn run_load(
    database: &str,
    collages_csv: Option<&str>,
    items_csv: Option<&str>,
    events_csv: Option<&str>,
) -> anyhow::Result<()> {
    if collages_csv.is_none() && items_csv.is_none() && events_csv.is_none() {
        anyhow::bail!("Nothing to load: pass --collages, --items and/or --events");
    }
    let db = Database::open(database)?;
    load_into(&db, collages_csv, items_csv, events_csv)?;
    info!("Load complete. Database: {}", database);
    Ok(())
}

fn load_into(
    db: &Database,
    collages_csv: Option<&str>,
    items_csv: Option<&str>,
    events_csv: Option<&str>,
) -> anyhow::Result<()> {
    if let Some(path) = collages_csv {
        info!("Loading collages from {}", path);
        db.load_collages(&read(path)?)?;
    }
    if let Some(path) = items_csv {
        info!("Loading collage items from {}", path);
        db.load_collage_items(&read(path)?)?;
    }
    if let Some(path) = events_csv {
        info!("Loading events from {}", path);
        db.load_events(&read(path)?)?;
        let cleared = db.clear_cache()?;
        info!("Cleared {} cached series", cleared);
    }
    Ok(())
}

fn read(path: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("lwc-load-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn nothing_to_load_is_an_error() {
        assert!(run_load("unused.sqlite", None, None, None).is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let db = Database::new().unwrap();
        let err = load_into(&db, Some("/nonexistent/collages.csv"), None, None).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/collages.csv"));
    }

    #[test]
    fn loading_events_clears_the_cache() {
        let db = Database::new().unwrap();
        db.cache_set("series:stale", "[]").unwrap();
        let collages = write_temp(
            "collages.csv",
            "ID,NAME,OWNER,TEMPORARY,SUMMER_OR_WINTER,RESTRICT_TO_MONTH,DAY_OF_WEEK,DAY_OR_NIGHT\n1,Rivers,,0,all,,,all\n",
        );
        let events = write_temp("events.csv", "fews,LOC1,H,,,,2020-01-15 00:00:00,5.0,0,\n");

        load_into(&db, Some(&collages), None, Some(&events)).unwrap();
        assert_eq!(db.query_collages().unwrap().len(), 1);
        assert_eq!(db.count_events().unwrap(), 1);
        assert_eq!(db.cache_get("series:stale").unwrap(), None);

        let _ = std::fs::remove_file(collages);
        let _ = std::fs::remove_file(events);
    }
}
