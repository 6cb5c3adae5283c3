//! Schedule items as authored by operators.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::{self, TimeOfDay};
use crate::types::ItemId;

/// A media item assigned to an intended calendar slot.
///
/// Items are supplied wholesale on every recompute; nothing derived from them
/// is ever written back into this struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleItem {
    /// Stable identity.
    pub id: ItemId,

    /// Display name.
    pub name: String,

    /// Reference link to the media.
    #[serde(default)]
    pub link: String,

    /// Duration expression (`"H:MM:SS"`, `"MM:SS"` or minutes).
    pub duration: String,

    /// Intended calendar date.
    pub date: NaiveDate,

    /// Intended time of day.
    pub start_time: TimeOfDay,
}

impl ScheduleItem {
    /// Creates an item with an empty reference link.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        duration: impl Into<String>,
        date: NaiveDate,
        start_time: TimeOfDay,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            link: String::new(),
            duration: duration.into(),
            date,
            start_time,
        }
    }

    /// Sets the reference link.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    /// Absolute minute at which the item was authored to start.
    pub fn intended_start(&self) -> f64 {
        clock::day_start(self.date) + f64::from(self.start_time.minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::float_cmp, reason = "whole-minute arithmetic is exact")]
    fn intended_start_adds_time_of_day_to_midnight() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        let item = ScheduleItem::new(
            ItemId::new("a").unwrap(),
            "News",
            "30",
            date,
            TimeOfDay::parse("10:00"),
        );
        assert_eq!(item.intended_start(), 1440.0 + 600.0);
    }

    #[test]
    fn serde_roundtrip_uses_clock_text() {
        let item = ScheduleItem::new(
            ItemId::new("a").unwrap(),
            "News",
            "1:00:00",
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            TimeOfDay::parse("07:30"),
        )
        .with_link("https://example.com/news.mp4");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["date"], "2026-03-02");
        assert_eq!(json["start_time"], "07:30");

        let parsed: ScheduleItem = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn deserialize_defaults_missing_link() {
        let item: ScheduleItem = serde_json::from_str(
            r#"{"id":"x","name":"Clip","duration":"5:00","date":"2026-03-02","start_time":"8"}"#,
        )
        .unwrap();
        assert_eq!(item.link, "");
        assert_eq!(item.start_time.to_string(), "08:00");
    }
}
