//! Storage layer for airtime schedules.
//!
//! Provides persistence for schedule and library items using `rusqlite`, plus
//! the [`legacy`] quoted-line text format used by older schedule files.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! Dates are stored as TEXT in ISO 8601 format (`2026-03-02`) and times of day
//! as `HH:MM`, so lexicographic ordering matches chronological ordering.
//!
//! The schedule is always written as a whole: [`Database::replace_schedule`]
//! deletes every row and inserts the new set in one transaction. There is no
//! incremental patching.

pub mod legacy;

use std::path::Path;

use at_core::{CanonicalRecord, ItemId, ScheduleItem, TimeOfDay};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use serde::Serialize;
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A schedule row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub name: String,
    pub link: String,
    pub duration: String,
}

/// A library row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryRecord {
    pub name: String,
    pub link: String,
    pub duration: String,
}

/// Aggregate view of the stored schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub items: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

impl From<&CanonicalRecord> for ItemRecord {
    fn from(record: &CanonicalRecord) -> Self {
        Self {
            id: record.id.to_string(),
            date: record.date.format("%Y-%m-%d").to_string(),
            start_time: record.start_time.to_string(),
            name: record.name.clone(),
            link: record.link.clone(),
            duration: record.duration.clone(),
        }
    }
}

impl ItemRecord {
    /// Converts the row into a schedule item.
    ///
    /// Returns `None` when the row has no usable identity or calendar date;
    /// such rows cannot be placed on a timeline.
    pub fn to_schedule_item(&self) -> Option<ScheduleItem> {
        let id = ItemId::new(self.id.clone()).ok()?;
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()?;
        Some(
            ScheduleItem::new(
                id,
                self.name.clone(),
                self.duration.clone(),
                date,
                TimeOfDay::parse(&self.start_time),
            )
            .with_link(self.link.clone()),
        )
    }
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Schedule items: the complete intended schedule
            -- position: submission order, 0-based
            -- date: ISO 8601 date (e.g., '2026-03-02')
            -- start_time: 'HH:MM'
            CREATE TABLE IF NOT EXISTS schedule_items (
                id TEXT PRIMARY KEY,
                position INTEGER NOT NULL,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                name TEXT NOT NULL,
                link TEXT NOT NULL,
                duration TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_schedule_items_slot ON schedule_items(date, start_time);

            CREATE TABLE IF NOT EXISTS library_items (
                position INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                link TEXT NOT NULL,
                duration TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Replaces the whole schedule with `records`, in one transaction.
    ///
    /// Rows are stored in slice order. Duplicate IDs keep the first occurrence.
    pub fn replace_schedule(&mut self, records: &[ItemRecord]) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM schedule_items", [])?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT OR IGNORE INTO schedule_items
                (id, position, date, start_time, name, link, duration)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for (position, record) in records.iter().enumerate() {
                inserted += stmt.execute(params![
                    record.id,
                    i64::try_from(position).unwrap_or(i64::MAX),
                    record.date,
                    record.start_time,
                    record.name,
                    record.link,
                    record.duration,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(inserted, "replaced schedule");
        Ok(inserted)
    }

    /// Replaces the stored schedule with compacted canonical records.
    pub fn publish(&mut self, records: &[CanonicalRecord]) -> Result<usize, DbError> {
        let rows: Vec<ItemRecord> = records.iter().map(ItemRecord::from).collect();
        self.replace_schedule(&rows)
    }

    /// Lists schedule rows in submission order.
    pub fn list_schedule(&self) -> Result<Vec<ItemRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, date, start_time, name, link, duration
            FROM schedule_items
            ORDER BY position ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ItemRecord {
                id: row.get(0)?,
                date: row.get(1)?,
                start_time: row.get(2)?,
                name: row.get(3)?,
                link: row.get(4)?,
                duration: row.get(5)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Loads the stored schedule as timeline input.
    ///
    /// Rows without a usable identity or date are skipped with a warning.
    pub fn load_schedule_items(&self) -> Result<Vec<ScheduleItem>, DbError> {
        let records = self.list_schedule()?;
        let items: Vec<ScheduleItem> = records
            .iter()
            .filter_map(|record| {
                let item = record.to_schedule_item();
                if item.is_none() {
                    tracing::warn!(
                        id = %record.id,
                        date = %record.date,
                        "skipping schedule row without a valid date"
                    );
                }
                item
            })
            .collect();
        tracing::debug!(
            loaded = items.len(),
            skipped = records.len() - items.len(),
            "loaded schedule items"
        );
        Ok(items)
    }

    /// Summarizes the stored schedule.
    pub fn schedule_summary(&self) -> Result<ScheduleSummary, DbError> {
        let (items, first_date, last_date) = self.conn.query_row(
            "SELECT COUNT(*), MIN(date), MAX(date) FROM schedule_items",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )?;
        Ok(ScheduleSummary {
            items: usize::try_from(items).unwrap_or_default(),
            first_date,
            last_date,
        })
    }

    /// Replaces the media library.
    pub fn replace_library(&mut self, records: &[LibraryRecord]) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM library_items", [])?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO library_items (position, name, link, duration) VALUES (?, ?, ?, ?)",
            )?;
            for (position, record) in records.iter().enumerate() {
                inserted += stmt.execute(params![
                    i64::try_from(position).unwrap_or(i64::MAX),
                    record.name,
                    record.link,
                    record.duration,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Lists the media library in stored order.
    pub fn list_library(&self) -> Result<Vec<LibraryRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT name, link, duration FROM library_items ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(LibraryRecord {
                name: row.get(0)?,
                link: row.get(1)?,
                duration: row.get(2)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
