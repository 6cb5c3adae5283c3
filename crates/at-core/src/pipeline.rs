//! The full derivation: sequence, segment, export.
//!
//! [`compute`] is a pure function over an input snapshot. Callers invoke it
//! whenever the item set changes and discard results from older snapshots.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::clock::TimeOfDay;
use crate::export::{CanonicalRecord, export};
use crate::item::ScheduleItem;
use crate::segment::{Segment, group_by_day, segment};
use crate::sequence::{CompactedItem, TimelineConfig, compact};
use crate::types::ItemId;

/// Everything derived from one input snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    /// Items in timeline order with their actual placement.
    pub compacted: Vec<CompactedItem>,

    /// Day-scoped slices of `compacted`, in item order.
    pub segments: Vec<Segment>,

    /// One record per item for persistence.
    pub canonical: Vec<CanonicalRecord>,
}

/// Runs sequencer, segmenter and exporter over `items`.
pub fn compute(items: &[ScheduleItem], config: &TimelineConfig) -> Timeline {
    let compacted = compact(items, config);
    let segments = segment(&compacted);
    let canonical = export(&compacted, &segments);

    tracing::debug!(
        items = compacted.len(),
        segments = segments.len(),
        records = canonical.len(),
        "computed timeline"
    );

    Timeline {
        compacted,
        segments,
        canonical,
    }
}

/// A piece of an item as a day-scoped renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block<'a> {
    pub item_id: &'a ItemId,
    pub name: &'a str,
    pub duration: &'a str,
    /// Actual start time of the parent item (on its own start day).
    pub parent_actual_time: TimeOfDay,
    pub start_offset: f64,
    pub end_offset: f64,
    pub continuation: bool,
}

/// All blocks rendering on one calendar day, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySchedule<'a> {
    pub date: NaiveDate,
    pub blocks: Vec<Block<'a>>,
}

impl Timeline {
    /// Looks up a compacted item by identity.
    pub fn item(&self, id: &ItemId) -> Option<&CompactedItem> {
        self.compacted.iter().find(|c| c.id() == id)
    }

    /// Items whose actual start differs from the authored one.
    pub fn shifted(&self) -> impl Iterator<Item = &CompactedItem> {
        self.compacted.iter().filter(|c| c.was_shifted())
    }

    /// Per-day view joining every segment with its parent item.
    pub fn days(&self) -> Vec<DaySchedule<'_>> {
        let parents: HashMap<&ItemId, &CompactedItem> =
            self.compacted.iter().map(|c| (c.id(), c)).collect();

        group_by_day(&self.segments)
            .into_iter()
            .map(|(date, segments)| DaySchedule {
                date,
                blocks: segments
                    .into_iter()
                    .filter_map(|segment| {
                        let parent = parents.get(&segment.item_id).copied()?;
                        Some(Block {
                            item_id: &segment.item_id,
                            name: &parent.item.name,
                            duration: &parent.item.duration,
                            parent_actual_time: parent.actual_time,
                            start_offset: segment.start_offset,
                            end_offset: segment.end_offset,
                            continuation: segment.is_continuation(),
                        })
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Remembers the most recent snapshot and its timeline.
///
/// Purely an optimization: a miss always recomputes, and a hit requires the
/// snapshot and configuration to compare equal, not just hash equal.
#[derive(Debug, Default)]
pub struct TimelineCache {
    last: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: u64,
    items: Vec<ScheduleItem>,
    config: TimelineConfig,
    timeline: Arc<Timeline>,
}

impl TimelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the timeline for `items`, reusing the previous result when the
    /// snapshot is unchanged.
    pub fn get_or_compute(
        &mut self,
        items: &[ScheduleItem],
        config: &TimelineConfig,
    ) -> Arc<Timeline> {
        let fingerprint = fingerprint(items);

        if let Some(entry) = &self.last {
            if entry.fingerprint == fingerprint && entry.config == *config && entry.items == items
            {
                self.hits += 1;
                return Arc::clone(&entry.timeline);
            }
        }

        self.misses += 1;
        let timeline = Arc::new(compute(items, config));
        self.last = Some(CacheEntry {
            fingerprint,
            items: items.to_vec(),
            config: *config,
            timeline: Arc::clone(&timeline),
        });
        timeline
    }

    /// Drops the remembered snapshot.
    pub fn clear(&mut self) {
        self.last = None;
    }

    pub const fn hits(&self) -> u64 {
        self.hits
    }

    pub const fn misses(&self) -> u64 {
        self.misses
    }
}

fn fingerprint(items: &[ScheduleItem]) -> u64 {
    let mut hasher = DefaultHasher::new();
    items.hash(&mut hasher);
    hasher.finish()
}
