//! Library commands for the media items available to schedule.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use at_core::clock;
use at_db::{Database, legacy};

/// Replaces the library with the entries in `path`.
pub fn import<W: Write>(writer: &mut W, db: &mut Database, path: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records = legacy::parse_library(&text);

    let stored = db
        .replace_library(&records)
        .context("failed to store library")?;
    writeln!(writer, "Imported {stored} library entries from {}", path.display())?;
    Ok(stored)
}

pub fn list<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let records = db.list_library().context("failed to load library")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&records)?)?;
        return Ok(());
    }

    if records.is_empty() {
        writeln!(writer, "Library is empty.")?;
        return Ok(());
    }

    let name_width = records.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    for record in &records {
        // Durations are shown normalized; unreadable ones as entered.
        let duration = clock::try_parse_duration(&record.duration)
            .map_or_else(|| record.duration.clone(), clock::format_duration);
        writeln!(
            writer,
            "{:<name_width$}  {:>8}  {}",
            record.name, duration, record.link
        )?;
    }
    Ok(())
}
