//! Publish command for writing the compacted timeline back to the store.
//!
//! The stored schedule is replaced as a whole by the canonical records, so
//! publishing twice in a row leaves the second run with nothing to move.

use std::io::Write;

use anyhow::{Context, Result};

use at_core::clock::format_duration;
use at_core::{TimelineConfig, compute};
use at_db::Database;

/// Returns the number of records published (or that would be, on a dry run).
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    config: &TimelineConfig,
    dry_run: bool,
) -> Result<usize> {
    let items = db
        .load_schedule_items()
        .context("failed to load schedule")?;
    let timeline = compute(&items, config);

    let shifted: Vec<_> = timeline.shifted().collect();
    if shifted.is_empty() {
        writeln!(writer, "No items moved by compaction.")?;
    } else {
        writeln!(writer, "Moved by compaction:")?;
        for item in shifted {
            writeln!(
                writer,
                "  {}: {} {} -> {} {} (+{})",
                item.item.name,
                item.item.date,
                item.item.start_time,
                item.actual_date,
                item.actual_time,
                format_duration(item.shift_minutes())
            )?;
        }
    }

    let count = timeline.canonical.len();
    if dry_run {
        writeln!(writer, "Dry run: {count} items would be published.")?;
        return Ok(count);
    }

    let written = db
        .publish(&timeline.canonical)
        .context("failed to write schedule")?;
    tracing::debug!(written, "published schedule");
    writeln!(writer, "Published {written} items.")?;
    Ok(written)
}
