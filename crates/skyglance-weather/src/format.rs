//! Date, time and text formatting for display.
//!
//! Forecast timestamps are rendered in the forecast location's own timezone,
//! not the viewer's.

use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;

const PLACEHOLDER: &str = "—";

fn zone(tz: &str) -> Tz {
    tz.parse::<Tz>().unwrap_or_else(|_| {
        tracing::debug!("Unknown timezone {:?}, falling back to UTC", tz);
        Tz::UTC
    })
}

fn format_in(unix: i64, tz: &str, pattern: &str) -> String {
    match DateTime::<Utc>::from_timestamp(unix, 0) {
        Some(dt) => dt.with_timezone(&zone(tz)).format(pattern).to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Short weekday and date, e.g. "Mon, Jan 15"
pub fn fmt_day(unix: i64, tz: &str) -> String {
    format_in(unix, tz, "%a, %b %-d")
}

/// 24-hour clock time, e.g. "14:05"
pub fn fmt_time(unix: i64, tz: &str) -> String {
    format_in(unix, tz, "%H:%M")
}

/// Clock time in the viewer's own timezone
pub fn fmt_local_time(unix: i64) -> String {
    match Local.timestamp_opt(unix, 0).single() {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Uppercase the first character, leaving the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase the first character of every whitespace-separated word
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

/// Round half-up, toward positive infinity
pub fn round_temp(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Rounded temperature with a degree sign, e.g. "12°"
pub fn fmt_temp(value: f64) -> String {
    format!("{}°", round_temp(value))
}
