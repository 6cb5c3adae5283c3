//! Quoted-line text format for schedule and library files.
//!
//! Each record is one line of double-quoted, comma-separated fields:
//!
//! ```text
//! "2026-03-02","10:00","Morning News","https://example.com/news.mp4","1:30:00"
//! ```
//!
//! Schedule lines carry `date, start_time, name, link, duration`; library
//! lines carry `name, link, duration`. The format has no escaping, so lines
//! that do not match are ignored on read and double quotes inside fields are
//! written as single quotes.

use std::sync::LazyLock;

use regex::Regex;

use crate::{ItemRecord, LibraryRecord};

static SCHEDULE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]*)","([^"]*)","([^"]*)","([^"]*)","([^"]*)""#).unwrap()
});

static LIBRARY_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)","([^"]*)","([^"]*)""#).unwrap());

/// Identity assigned to the `n`th (1-based) imported schedule line.
///
/// Zero-padded so that identity order equals line order.
pub fn positional_id(n: usize) -> String {
    format!("item-{n:05}")
}

/// Parses a schedule file.
///
/// Records get positional identities (see [`positional_id`]).
pub fn parse_schedule(text: &str) -> Vec<ItemRecord> {
    text.lines()
        .filter_map(|line| SCHEDULE_LINE_RE.captures(line))
        .enumerate()
        .map(|(index, caps)| ItemRecord {
            id: positional_id(index + 1),
            date: caps[1].to_string(),
            start_time: caps[2].to_string(),
            name: caps[3].to_string(),
            link: caps[4].to_string(),
            duration: caps[5].to_string(),
        })
        .collect()
}

/// Renders schedule records, one line each.
pub fn render_schedule(records: &[ItemRecord]) -> String {
    let mut output = String::new();
    for record in records {
        output.push_str(&format!(
            "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"\n",
            field(&record.date),
            field(&record.start_time),
            field(&record.name),
            field(&record.link),
            field(&record.duration),
        ));
    }
    output
}

/// Parses a library file.
pub fn parse_library(text: &str) -> Vec<LibraryRecord> {
    text.lines()
        .filter_map(|line| LIBRARY_LINE_RE.captures(line))
        .map(|caps| LibraryRecord {
            name: caps[1].to_string(),
            link: caps[2].to_string(),
            duration: caps[3].to_string(),
        })
        .collect()
}

fn field(value: &str) -> String {
    value.replace('"', "'")
}
