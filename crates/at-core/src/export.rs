//! Canonical records for persistence.
//!
//! Segments exist only for rendering. Before anything is saved they collapse
//! back to one record per item, carrying the item's actual (compacted) slot,
//! so persisted state always matches the non-overlapping timeline.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::TimeOfDay;
use crate::segment::Segment;
use crate::sequence::CompactedItem;
use crate::types::ItemId;

/// One item as it should be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub id: ItemId,
    pub name: String,
    pub link: String,
    pub duration: String,
    /// Actual calendar date after compaction.
    pub date: NaiveDate,
    /// Actual time of day after compaction.
    pub start_time: TimeOfDay,
}

impl From<&CompactedItem> for CanonicalRecord {
    fn from(item: &CompactedItem) -> Self {
        Self {
            id: item.item.id.clone(),
            name: item.item.name.clone(),
            link: item.item.link.clone(),
            duration: item.item.duration.clone(),
            date: item.actual_date,
            start_time: item.actual_time,
        }
    }
}

/// Collapses segments to one record per parent item.
///
/// The first segment seen for an item decides its place; segments whose
/// parent is missing from `items` are skipped. The result is sorted by actual
/// slot, with items sharing a minute kept in timeline order.
pub fn export(items: &[CompactedItem], segments: &[Segment]) -> Vec<CanonicalRecord> {
    let by_id: HashMap<&ItemId, &CompactedItem> = items.iter().map(|c| (c.id(), c)).collect();
    let mut seen: HashSet<&ItemId> = HashSet::new();

    let mut parents = Vec::with_capacity(items.len());
    for segment in segments {
        if !seen.insert(&segment.item_id) {
            continue;
        }
        if let Some(item) = by_id.get(&segment.item_id) {
            parents.push(*item);
        }
    }

    sorted_records(parents)
}

/// Builds records straight from sequencer output, without segmenting.
pub fn export_compacted(items: &[CompactedItem]) -> Vec<CanonicalRecord> {
    sorted_records(items.iter().collect())
}

// Actual starts are floored to the minute, so several items can share a slot.
// The sequence position already encodes the tie-break, and keeps them in the
// order they play.
fn sorted_records(mut parents: Vec<&CompactedItem>) -> Vec<CanonicalRecord> {
    parents.sort_by_key(|item| (item.actual_date, item.actual_time, item.sequence));
    parents.into_iter().map(CanonicalRecord::from).collect()
}
