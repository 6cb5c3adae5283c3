//! Timeline command for showing the compacted schedule day by day.
//!
//! Every calendar day touched by an item gets its own section. Items that run
//! past midnight appear again on the following days as continuations.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};

use at_core::clock::{self, DAY_MINUTES};
use at_core::{DaySchedule, TimelineConfig, compute};
use at_db::Database;

/// Which calendar days to show.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayWindow {
    /// First day shown. Defaults to the first scheduled day.
    pub from: Option<NaiveDate>,
    /// Number of days shown, counted from `from`.
    pub days: Option<u32>,
}

impl DayWindow {
    fn select(self, days: Vec<DaySchedule<'_>>) -> Vec<DaySchedule<'_>> {
        let Some(start) = self.from.or_else(|| days.first().map(|d| d.date)) else {
            return days;
        };
        let end = self
            .days
            .and_then(|n| start.checked_add_days(Days::new(u64::from(n))));

        days.into_iter()
            .filter(|d| d.date >= start && end.is_none_or(|end| d.date < end))
            .collect()
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &TimelineConfig,
    window: DayWindow,
    json: bool,
) -> Result<()> {
    let items = db
        .load_schedule_items()
        .context("failed to load schedule")?;
    let timeline = compute(&items, config);
    let days = window.select(timeline.days());

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&days)?)?;
        return Ok(());
    }

    if days.is_empty() {
        writeln!(writer, "No scheduled items.")?;
        return Ok(());
    }

    for (index, day) in days.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "{}", day.date.format("%Y-%m-%d (%a)"))?;
        for block in &day.blocks {
            write!(
                writer,
                "  {}-{}  {} [{}]",
                offset_label(block.start_offset),
                offset_label(block.end_offset),
                block.name,
                block.duration
            )?;
            if block.continuation {
                write!(writer, " (cont. from {})", block.parent_actual_time)?;
            }
            writeln!(writer)?;
        }
    }

    Ok(())
}

/// Formats a day offset as `HH:MM`, showing the end of day as `24:00`.
fn offset_label(offset: f64) -> String {
    if offset >= DAY_MINUTES {
        "24:00".to_string()
    } else {
        clock::format_time_of_day(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use at_db::legacy;
    use insta::assert_snapshot;

    const SCHEDULE: &str = concat!(
        "\"2026-03-02\",\"10:00\",\"Morning News\",\"news.mp4\",\"1:30:00\"\n",
        "\"2026-03-02\",\"10:00\",\"Weather\",\"weather.mp4\",\"30\"\n",
        "\"2026-03-02\",\"23:00\",\"Film\",\"film.mkv\",\"3:00:00\"\n",
        "\"2026-03-03\",\"01:00\",\"Late Show\",\"late.mp4\",\"30\"\n",
        "\"2026-03-05\",\"09:00\",\"Cartoons\",\"cartoons.mp4\",\"45\"\n",
    );

    fn seeded() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.replace_schedule(&legacy::parse_schedule(SCHEDULE))
            .unwrap();
        db
    }

    fn render(db: &Database, window: DayWindow, json: bool) -> String {
        let mut output = Vec::new();
        run(&mut output, db, &TimelineConfig::default(), window, json).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn timeline_prints_each_day_with_continuations() {
        let output = render(&seeded(), DayWindow::default(), false);
        assert_snapshot!(output, @r"
2026-03-02 (Mon)
  10:00-11:30  Morning News [1:30:00]
  11:30-12:00  Weather [30]
  23:00-24:00  Film [3:00:00]

2026-03-03 (Tue)
  00:00-02:00  Film [3:00:00] (cont. from 23:00)
  02:00-02:30  Late Show [30]

2026-03-05 (Thu)
  09:00-09:45  Cartoons [45]
");
    }

    #[test]
    fn timeline_window_limits_days() {
        let window = DayWindow {
            from: Some(day(3)),
            days: Some(2),
        };
        let output = render(&seeded(), window, false);
        assert_snapshot!(output, @r"
2026-03-03 (Tue)
  00:00-02:00  Film [3:00:00] (cont. from 23:00)
  02:00-02:30  Late Show [30]
");
    }

    #[test]
    fn timeline_days_count_from_first_scheduled_day() {
        let window = DayWindow {
            from: None,
            days: Some(1),
        };
        let output = render(&seeded(), window, false);
        assert!(output.starts_with("2026-03-02 (Mon)"));
        assert!(!output.contains("2026-03-03"));
    }

    #[test]
    fn timeline_json_lists_blocks_per_day() {
        let output = render(&seeded(), DayWindow::default(), true);
        let days: serde_json::Value = serde_json::from_str(&output).unwrap();
        let days = days.as_array().unwrap();

        assert_eq!(days.len(), 3);
        assert_eq!(days[1]["date"], "2026-03-03");

        let spill = &days[1]["blocks"][0];
        assert_eq!(spill["item_id"], "item-00003");
        assert_eq!(spill["name"], "Film");
        assert_eq!(spill["parent_actual_time"], "23:00");
        assert_eq!(spill["start_offset"], 0.0);
        assert_eq!(spill["end_offset"], 120.0);
        assert_eq!(spill["continuation"], true);
    }

    #[test]
    fn timeline_on_empty_store() {
        let db = Database::open_in_memory().unwrap();
        assert_snapshot!(render(&db, DayWindow::default(), false), @"No scheduled items.");
        assert_eq!(render(&db, DayWindow::default(), true).trim(), "[]");
    }

    #[test]
    fn offset_label_shows_end_of_day() {
        assert_eq!(offset_label(0.0), "00:00");
        assert_eq!(offset_label(690.5), "11:30");
        assert_eq!(offset_label(DAY_MINUTES), "24:00");
    }
}
