//! Import command for loading a schedule file into the store.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use at_db::{Database, legacy};

/// Replaces the stored schedule with the records in `path`.
///
/// Returns the number of items stored.
pub fn run<W: Write>(writer: &mut W, db: &mut Database, path: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records = legacy::parse_schedule(&text);
    tracing::debug!(parsed = records.len(), path = %path.display(), "parsed schedule file");

    let stored = db
        .replace_schedule(&records)
        .context("failed to store schedule")?;
    writeln!(writer, "Imported {stored} items from {}", path.display())?;
    Ok(stored)
}
