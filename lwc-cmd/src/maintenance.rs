//! Collage listing and periodic cleanup of temporary collages.

use log::info;
use lwc_db::Database;

/// Print one line per collage: id, name, owner, item count, temporary marker.
pub fn run_list(database: &str) -> anyhow::Result<()> {
    let db = Database::open(database)?;
    for line in collage_lines(&db)? {
        println!("{line}");
    }
    Ok(())
}

fn collage_lines(db: &Database) -> anyhow::Result<Vec<String>> {
    let collages = db.query_collages()?;
    Ok(collages
        .iter()
        .map(|c| {
            format!(
                "{}\t{}\t{}\t{} items{}",
                c.id,
                c.name,
                c.owner.as_deref().unwrap_or("-"),
                c.item_count,
                if c.temporary { "\t(temporary)" } else { "" }
            )
        })
        .collect())
}

/// Remove temporary collages; their items go with them.
pub fn run_clean_temp(database: &str) -> anyhow::Result<()> {
    let db = Database::open(database)?;
    let removed = db.delete_temporary_collages()?;
    info!("Removed {} temporary collages from {}", removed, database);
    Ok(())
}
