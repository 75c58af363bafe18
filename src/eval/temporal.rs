//! Recognizing date-like strings so they compare as instants

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Try to read `s` as an absolute date/time.
///
/// Supports:
/// - RFC 3339 with offset: "2024-12-31T23:59:59Z", "2024-12-31T23:59:59+02:00"
/// - Date only: "2024-12-31" (midnight UTC)
/// - ISO 8601 without offset: "2024-12-31T23:59:59", "2024-12-31 23:59:59.250" (UTC)
/// - RFC 2822: "Tue, 31 Dec 2024 23:59:59 +0000"
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    // cheap reject: every supported format has at least a digit and a separator
    if s.len() < 8 || !s.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
