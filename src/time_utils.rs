// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.
//!
//! Exercise dates are stored as millisecond-precision ISO strings so that
//! range filters can compare them lexically. Logs show them as day strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Day-string layout, e.g. `Wed Jan 15 2020`.
const DAY_FORMAT: &str = "%a %b %d %Y";

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Format a UTC timestamp as RFC3339 with whole seconds and a `Z` suffix,
/// as used in log events.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a timestamp the way exercise dates are stored:
/// `2020-01-15T00:00:00.000Z`.
pub fn format_iso(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format the calendar day of a timestamp, e.g. `Wed Jan 15 2020`.
pub fn format_day(date: DateTime<Utc>) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// Parse a caller-supplied date.
///
/// Dates without a time are UTC midnight; timestamps without an offset are
/// taken as UTC. Returns `None` for anything else.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Some(date.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(input, format) {
            return Some(date.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, DAY_FORMAT))
        .ok()
        .or_else(|| parse_reduced_date(input))
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

/// `YYYY-MM` and `YYYY`, resolved to the first day of the period.
fn parse_reduced_date(input: &str) -> Option<NaiveDate> {
    let mut parts = input.splitn(2, '-');
    let year = parts.next().filter(|y| is_digits(y, 4))?.parse().ok()?;
    let month = match parts.next() {
        Some(m) if is_digits(m, 2) => m.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Re-render a stored ISO date as a day string.
pub fn iso_to_day(iso: &str) -> Option<String> {
    parse_date(iso).map(format_day)
}
