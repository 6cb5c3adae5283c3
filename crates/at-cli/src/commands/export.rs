//! Export command for writing the compacted schedule as a schedule file.

use std::io::Write;

use anyhow::{Context, Result};

use at_core::{TimelineConfig, compute};
use at_db::{Database, ItemRecord, legacy};

/// Writes one line per item at its actual slot, in timeline order.
///
/// Returns the number of lines written.
pub fn run<W: Write>(writer: &mut W, db: &Database, config: &TimelineConfig) -> Result<usize> {
    let items = db
        .load_schedule_items()
        .context("failed to load schedule")?;
    let timeline = compute(&items, config);

    let records: Vec<ItemRecord> = timeline.canonical.iter().map(ItemRecord::from).collect();
    writer.write_all(legacy::render_schedule(&records).as_bytes())?;
    writer.flush()?;
    Ok(records.len())
}
