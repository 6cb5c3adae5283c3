//! Splitting compacted items into per-day pieces.
//!
//! A day-scoped renderer only ever sees offsets in `[0, 1440]` relative to
//! one midnight. Every piece points back at its parent by [`ItemId`], so the
//! item keeps a single identity no matter how many days it spans.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use crate::clock::{self, DAY_MINUTES};
use crate::sequence::CompactedItem;
use crate::types::{ItemId, SegmentKind};

/// A day-scoped slice of a compacted item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Identity of the parent item.
    pub item_id: ItemId,

    /// Calendar day this slice renders on.
    pub day: NaiveDate,

    /// Start, in minutes after the day's midnight.
    pub start_offset: f64,

    /// End (exclusive), in minutes after the day's midnight. At most 1440.
    pub end_offset: f64,

    /// Primary or continuation.
    pub kind: SegmentKind,
}

impl Segment {
    /// Length of the slice in minutes.
    pub fn duration(&self) -> f64 {
        self.end_offset - self.start_offset
    }

    /// Whether this slice covers a later day than the item's actual start.
    pub fn is_continuation(&self) -> bool {
        self.kind == SegmentKind::Continuation
    }

    /// Absolute start (minutes since the epoch).
    pub fn absolute_start(&self) -> f64 {
        clock::day_start(self.day) + self.start_offset
    }

    /// Absolute end (minutes since the epoch).
    pub fn absolute_end(&self) -> f64 {
        clock::day_start(self.day) + self.end_offset
    }
}

/// Segments every item, preserving item order.
///
/// Items are independent, so segmentation runs in parallel.
pub fn segment(items: &[CompactedItem]) -> Vec<Segment> {
    items.par_iter().flat_map_iter(segment_item).collect()
}

/// Splits one item at every midnight it crosses.
///
/// The first segment is [`SegmentKind::Primary`]; each later day gets a
/// [`SegmentKind::Continuation`] starting at offset zero. Concatenated, the
/// segments tile `[actual_start, actual_end)` exactly.
pub fn segment_item(item: &CompactedItem) -> Vec<Segment> {
    let mut day = item.actual_date;
    let mut day_start = clock::day_start(day);
    let mut next_day_start = day_start + DAY_MINUTES;

    let mut segments = vec![Segment {
        item_id: item.id().clone(),
        day,
        start_offset: item.actual_start - day_start,
        end_offset: item.actual_end.min(next_day_start) - day_start,
        kind: SegmentKind::Primary,
    }];

    while next_day_start < item.actual_end {
        let Some(next_day) = day.succ_opt() else {
            break;
        };
        day = next_day;
        day_start = next_day_start;
        next_day_start = day_start + DAY_MINUTES;

        segments.push(Segment {
            item_id: item.id().clone(),
            day,
            start_offset: 0.0,
            end_offset: item.actual_end.min(next_day_start) - day_start,
            kind: SegmentKind::Continuation,
        });
    }

    segments
}

/// Groups segments by calendar day, keeping their relative order.
///
/// Given segments of a compacted timeline, each day's list is chronological.
pub fn group_by_day(segments: &[Segment]) -> BTreeMap<NaiveDate, Vec<&Segment>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Segment>> = BTreeMap::new();
    for segment in segments {
        days.entry(segment.day).or_default().push(segment);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimeOfDay;
    use crate::item::ScheduleItem;
    use crate::sequence::{TimelineConfig, compact};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn compacted(entries: &[(&str, u32, &str, &str)]) -> Vec<CompactedItem> {
        let items: Vec<_> = entries
            .iter()
            .map(|(id, d, time, duration)| {
                ScheduleItem::new(
                    ItemId::new(*id).unwrap(),
                    *id,
                    *duration,
                    day(*d),
                    TimeOfDay::parse(time),
                )
            })
            .collect();
        compact(&items, &TimelineConfig::default())
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "whole-minute arithmetic is exact")]
    fn item_within_one_day_has_single_primary_segment() {
        let items = compacted(&[("a", 2, "10:00", "90")]);
        let segments = segment(&items);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Primary);
        assert_eq!(segments[0].day, day(2));
        assert_eq!(segments[0].start_offset, 600.0);
        assert_eq!(segments[0].end_offset, 690.0);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "whole-minute arithmetic is exact")]
    fn item_crossing_midnight_gets_continuation() {
        let items = compacted(&[("movie", 2, "23:00", "180")]);
        let segments = segment(&items);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].day, day(2));
        assert_eq!(segments[0].start_offset, 1380.0);
        assert_eq!(segments[0].end_offset, 1440.0);
        assert_eq!(segments[0].duration(), 60.0);
        assert!(!segments[0].is_continuation());

        assert_eq!(segments[1].day, day(3));
        assert_eq!(segments[1].start_offset, 0.0);
        assert_eq!(segments[1].end_offset, 120.0);
        assert_eq!(segments[1].duration(), 120.0);
        assert!(segments[1].is_continuation());
        assert_eq!(segments[1].item_id.as_str(), "movie");
    }

    #[test]
    fn item_ending_exactly_at_midnight_has_no_continuation() {
        let items = compacted(&[("a", 2, "23:00", "60")]);
        let segments = segment(&items);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "whole-minute arithmetic is exact")]
    fn multi_day_item_gets_full_day_continuations() {
        // 22:00 on day 2 through 03:00 on day 5.
        let items = compacted(&[("marathon", 2, "22:00", "3180")]);
        let segments = segment(&items);

        let days: Vec<_> = segments.iter().map(|s| s.day).collect();
        assert_eq!(days, vec![day(2), day(3), day(4), day(5)]);
        assert_eq!(segments[1].duration(), 1440.0);
        assert_eq!(segments[2].duration(), 1440.0);
        assert_eq!(segments[3].end_offset, 180.0);
    }

    #[test]
    fn segments_tile_actual_interval() {
        let items = compacted(&[
            ("a", 2, "21:00", "5:00:00"),
            ("b", 2, "21:00", "1:30:00"),
            ("c", 3, "04:00", "2000"),
        ]);
        let segments = segment(&items);

        for item in &items {
            let pieces: Vec<_> = segments.iter().filter(|s| s.item_id == *item.id()).collect();
            assert_eq!(pieces[0].kind, SegmentKind::Primary);
            assert!(pieces[0].absolute_start().to_bits() == item.actual_start.to_bits());
            for pair in pieces.windows(2) {
                assert!(pair[0].absolute_end().to_bits() == pair[1].absolute_start().to_bits());
                assert_eq!(pair[1].kind, SegmentKind::Continuation);
            }
            let last = pieces.last().unwrap();
            assert!((last.absolute_end() - item.actual_end).abs() < 1e-6);
        }
    }

    #[test]
    fn segment_preserves_item_order() {
        let items = compacted(&[
            ("a", 2, "23:30", "60"),
            ("b", 3, "00:00", "30"),
            ("c", 3, "05:00", "30"),
        ]);
        let segments = segment(&items);
        let order: Vec<_> = segments.iter().map(|s| s.item_id.as_str()).collect();
        assert_eq!(order, vec!["a", "a", "b", "c"]);
    }

    #[test]
    fn group_by_day_is_chronological_within_each_day() {
        let items = compacted(&[
            ("a", 2, "23:30", "60"),
            ("b", 3, "00:00", "30"),
            ("c", 3, "05:00", "30"),
        ]);
        let segments = segment(&items);
        let days = group_by_day(&segments);

        assert_eq!(days.len(), 2);
        let day3: Vec<_> = days[&day(3)].iter().map(|s| s.item_id.as_str()).collect();
        assert_eq!(day3, vec!["a", "b", "c"]);
        let starts: Vec<_> = days[&day(3)].iter().map(|s| s.start_offset).collect();
        assert!(starts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn empty_input_has_no_segments() {
        assert!(segment(&[]).is_empty());
        assert!(group_by_day(&[]).is_empty());
    }
}
