use crate::domain::dashboard::TimePoint;
use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};

/// Human-readable local time for an epoch-millisecond timestamp.
///
/// Empty when the value is outside chrono's representable range.
pub fn format_display_time(millis: i64) -> String {
    format_in(&Local, millis)
}

/// Display text for a row's time: positional fallbacks render as `""`
pub fn display_time(point: TimePoint) -> String {
    point.millis().map(format_display_time).unwrap_or_default()
}

pub(crate) fn format_in<Tz: TimeZone>(tz: &Tz, millis: i64) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}

/// RFC 3339 with millisecond precision and a `Z` suffix, as the start
/// command expects its training window
pub fn iso_utc(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
