//! Pure mappers between the server's wire records and the client's view
//! models. Every parser tolerates missing or null upstream fields: absent
//! collections become empty and absent scalars become `None`.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

pub mod auth;
pub mod contest;
pub mod county;
pub mod cvr;
pub mod dos;
pub mod risk_limit;

/// Accepts RFC 3339 instants and bare `YYYY-MM-DD` dates.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Count fields arrive as a number or as a map of per-category counts.
pub fn sum_counts(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_default(),
        Value::Object(map) => map.values().map(sum_counts).sum(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;

    #[test]
    fn timestamps_accept_instants_and_dates() {
        let instant = parse_timestamp(Some("2017-11-07T15:30:00Z")).expect("instant");
        assert_eq!(instant.hour(), 15);
        let date = parse_timestamp(Some("2017-11-07")).expect("date");
        assert_eq!((date.year(), date.month(), date.day()), (2017, 11, 7));
        assert!(parse_timestamp(Some("yesterday")).is_none());
        assert!(parse_timestamp(None).is_none());
    }

    #[test]
    fn counts_sum_over_maps_and_ignore_nulls() {
        assert_eq!(sum_counts(&json!({"COMPARISON": 2, "OPPORTUNISTIC": 3})), 5);
        assert_eq!(sum_counts(&json!(4)), 4);
        assert_eq!(sum_counts(&Value::Null), 0);
    }
}
