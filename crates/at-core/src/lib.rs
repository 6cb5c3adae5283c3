//! Core scheduling logic for airtime.
//!
//! This crate turns independently authored (date, time, duration) intentions
//! into a gapless, non-overlapping broadcast timeline:
//! - Sequencing: global ordering and compaction against a running watermark
//! - Segmentation: splitting items at every midnight they cross
//! - Export: collapsing segments back to one canonical record per item
//!
//! Everything here is pure and synchronous; there is no I/O.

pub mod clock;
mod export;
mod item;
mod pipeline;
mod segment;
mod sequence;
mod types;

pub use clock::TimeOfDay;
pub use export::{CanonicalRecord, export, export_compacted};
pub use item::ScheduleItem;
pub use pipeline::{Block, DaySchedule, Timeline, TimelineCache, compute};
pub use segment::{Segment, group_by_day, segment, segment_item};
pub use sequence::{CompactedItem, DEFAULT_MAX_ITEM_MINUTES, TimelineConfig, compact};
pub use types::{ItemId, SegmentKind, TieBreak, ValidationError};
