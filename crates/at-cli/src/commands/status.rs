//! Status command for summarizing the stored schedule.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use at_core::{TimelineConfig, compute};
use at_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    database_path: &Path,
    config: &TimelineConfig,
) -> Result<()> {
    let summary = db
        .schedule_summary()
        .context("failed to summarize schedule")?;

    writeln!(writer, "Airtime status")?;
    writeln!(writer, "Database: {}", database_path.display())?;

    if summary.items == 0 {
        writeln!(writer, "No schedule items.")?;
        return Ok(());
    }

    writeln!(writer, "Items: {}", summary.items)?;
    if let (Some(first), Some(last)) = (&summary.first_date, &summary.last_date) {
        writeln!(writer, "Dates: {first} to {last}")?;
    }

    let items = db
        .load_schedule_items()
        .context("failed to load schedule")?;
    let timeline = compute(&items, config);
    writeln!(writer, "Tie break: {}", config.tie_break)?;
    writeln!(writer, "Moved by compaction: {}", timeline.shifted().count())?;

    let skipped = summary.items - items.len();
    if skipped > 0 {
        writeln!(writer, "Skipped (no valid date): {skipped}")?;
    }

    Ok(())
}
