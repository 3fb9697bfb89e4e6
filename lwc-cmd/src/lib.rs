//! Command implementations for LWC CLI.
//!
//! Provides subcommands for loading collage data into a database file,
//! computing collage statistics and cleaning up temporary collages.

use clap::Subcommand;

pub mod load;
pub mod maintenance;
pub mod stats;

pub use stats::OutputFormat;

#[derive(Subcommand)]
pub enum Command {
    /// Load collages, collage items and events from CSV files
    Load {
        /// Path to the SQLite database file (created if missing)
        #[arg(short = 'd', long)]
        database: String,

        /// Collages CSV (with headers)
        #[arg(long)]
        collages: Option<String>,

        /// Collage items CSV (with headers)
        #[arg(long)]
        items: Option<String>,

        /// Events CSV (no headers)
        #[arg(long)]
        events: Option<String>,
    },

    /// List collages and their item counts
    Collages {
        /// Path to the SQLite database file
        #[arg(short = 'd', long)]
        database: String,
    },

    /// Compute statistics for every item of a collage
    Stats {
        /// Path to the SQLite database file
        #[arg(short = 'd', long)]
        database: String,

        /// Collage id
        #[arg(short = 'c', long)]
        collage: i64,

        /// First day of the query range (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day of the query range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Give up on a single series fetch after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Cache in memory for this run only instead of in the database
        #[arg(long)]
        memory_cache: bool,
    },

    /// Delete temporary collages and their items
    CleanTemp {
        /// Path to the SQLite database file
        #[arg(short = 'd', long)]
        database: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Load {
            database,
            collages,
            items,
            events,
        } => load::run_load(
            &database,
            collages.as_deref(),
            items.as_deref(),
            events.as_deref(),
        ),
        Command::Collages { database } => maintenance::run_list(&database),
        Command::Stats {
            database,
            collage,
            start,
            end,
            format,
            output,
            timeout_secs,
            memory_cache,
        } => {
            let options = stats::StatsOptions {
                timeout: timeout_secs.map(std::time::Duration::from_secs),
                memory_cache,
            };
            stats::run_stats(
                &database,
                collage,
                &start,
                &end,
                format,
                output.as_deref(),
                &options,
            )
        }
        Command::CleanTemp { database } => maintenance::run_clean_temp(&database),
    }
}
