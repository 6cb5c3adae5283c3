//! Global ordering and gapless compaction.
//!
//! # Algorithm Summary
//!
//! 1. Sort items by (intended date, intended time of day, tie-break key)
//! 2. Walk the sorted items keeping a watermark: the absolute end of the last
//!    placed item
//! 3. Each item starts at `max(intended_start, watermark)` and advances the
//!    watermark to its own end
//!
//! Items are never moved earlier than authored. An item whose authored time is
//! still ahead of the watermark keeps its authored time, leaving a gap.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::{self, DAY_MINUTES, TimeOfDay};
use crate::item::ScheduleItem;
use crate::types::{ItemId, TieBreak};

/// Default duration ceiling: seven days.
pub const DEFAULT_MAX_ITEM_MINUTES: f64 = 7.0 * DAY_MINUTES;

/// Configuration for timeline computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Secondary sort key for items sharing an intended slot.
    pub tie_break: TieBreak,

    /// Longest duration any single item may occupy, in minutes.
    /// Longer durations are clamped. Default: 10080 (7 days).
    pub max_item_minutes: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::Identity,
            max_item_minutes: DEFAULT_MAX_ITEM_MINUTES,
        }
    }
}

impl TimelineConfig {
    /// The duration ceiling actually applied.
    ///
    /// A `max_item_minutes` that is not a positive finite number is ignored in
    /// favour of the default, so every placed item keeps a positive duration.
    pub const fn item_ceiling(&self) -> f64 {
        if self.max_item_minutes.is_finite() && self.max_item_minutes > 0.0 {
            self.max_item_minutes
        } else {
            DEFAULT_MAX_ITEM_MINUTES
        }
    }
}

/// A schedule item placed on the compacted timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactedItem {
    /// The item as authored.
    #[serde(flatten)]
    pub item: ScheduleItem,

    /// Index of the item in the input collection.
    pub submission: usize,

    /// Index of the item in the compacted order.
    pub sequence: usize,

    /// Resolved duration in minutes.
    pub duration_minutes: f64,

    /// Whether the duration expression was unrecognized and the default used.
    pub duration_fallback: bool,

    /// Absolute intended start (minutes since the epoch).
    pub intended_start: f64,

    /// Absolute actual start.
    pub actual_start: f64,

    /// Absolute actual end (exclusive).
    pub actual_end: f64,

    /// Calendar date of the actual start.
    pub actual_date: NaiveDate,

    /// Time of day of the actual start, floored to the minute.
    pub actual_time: TimeOfDay,
}

impl CompactedItem {
    /// The item's identity.
    pub const fn id(&self) -> &ItemId {
        &self.item.id
    }

    /// Minutes the item was pushed back by its predecessors.
    pub fn shift_minutes(&self) -> f64 {
        self.actual_start - self.intended_start
    }

    /// Whether compaction moved the item off its authored slot.
    pub fn was_shifted(&self) -> bool {
        self.actual_start > self.intended_start
    }
}

/// Sort key over intended slots.
#[derive(Debug, Clone, Copy)]
struct SlotKey<'a> {
    date: NaiveDate,
    time: TimeOfDay,
    id: &'a ItemId,
    submission: usize,
}

impl SlotKey<'_> {
    /// Total order over slots: date, then time, then the tie-break key.
    fn cmp_with(&self, other: &Self, tie_break: TieBreak) -> Ordering {
        self.date
            .cmp(&other.date)
            .then(self.time.cmp(&other.time))
            .then_with(|| match tie_break {
                TieBreak::Identity => self
                    .id
                    .cmp(other.id)
                    .then(self.submission.cmp(&other.submission)),
                TieBreak::Submission => self.submission.cmp(&other.submission),
            })
    }
}

/// Orders `items` and compacts them into a gapless, non-overlapping timeline.
///
/// Returns one [`CompactedItem`] per input item, in timeline order.
pub fn compact(items: &[ScheduleItem], config: &TimelineConfig) -> Vec<CompactedItem> {
    let key = |index: usize| SlotKey {
        date: items[index].date,
        time: items[index].start_time,
        id: &items[index].id,
        submission: index,
    };
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| key(a).cmp_with(&key(b), config.tie_break));

    let ceiling = config.item_ceiling();
    if ceiling.to_bits() != config.max_item_minutes.to_bits() {
        tracing::warn!(
            configured = config.max_item_minutes,
            ceiling,
            "ignoring invalid max_item_minutes"
        );
    }

    let mut watermark = f64::NEG_INFINITY;
    let mut compacted = Vec::with_capacity(items.len());

    for (sequence, index) in order.into_iter().enumerate() {
        let item = &items[index];
        let (duration_minutes, duration_fallback) = resolve_duration(item, ceiling);

        let intended_start = item.intended_start();
        let actual_start = intended_start.max(watermark);
        let actual_end = actual_start + duration_minutes;
        watermark = actual_end;

        compacted.push(CompactedItem {
            item: item.clone(),
            submission: index,
            sequence,
            duration_minutes,
            duration_fallback,
            intended_start,
            actual_start,
            actual_end,
            actual_date: clock::date_of(actual_start),
            actual_time: TimeOfDay::of_absolute(actual_start),
        });
    }

    tracing::debug!(
        item_count = compacted.len(),
        shifted = compacted.iter().filter(|c| c.was_shifted()).count(),
        "compacted timeline"
    );

    compacted
}

fn resolve_duration(item: &ScheduleItem, ceiling: f64) -> (f64, bool) {
    let (minutes, fallback) = clock::try_parse_duration(&item.duration).map_or_else(
        || {
            tracing::debug!(
                item_id = %item.id,
                duration = %item.duration,
                "unrecognized duration, using default"
            );
            (clock::DEFAULT_DURATION_MINUTES, true)
        },
        |minutes| (minutes, false),
    );

    if minutes > ceiling {
        tracing::warn!(
            item_id = %item.id,
            minutes,
            ceiling,
            "clamping item duration to ceiling"
        );
        return (ceiling, fallback);
    }
    (minutes, fallback)
}
