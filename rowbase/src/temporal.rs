//! # Temporal Formatting Module
//!
//! `sqlx::Any` has no native temporal or UUID types, so the bind-only
//! [`Value`](crate::Value) variants are sent as text in the format each
//! driver accepts, and on PostgreSQL the placeholder carries an explicit
//! cast so the server reads the text back as the right type.
//!
//! ## Supported Types
//!
//! - `DateTime<Utc>` - Timestamp with timezone (UTC)
//! - `NaiveDateTime` - Timestamp without timezone
//! - `NaiveDate` - Date only (year, month, day)
//! - `NaiveTime` - Time only (hour, minute, second)
//! - `Uuid` - Hyphenated text on every driver

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::{database::Drivers, value::Value};

// ============================================================================
// Driver Formatting
// ============================================================================

/// Converts a `DateTime<Utc>` to the text form expected by `driver`.
///
/// ## PostgreSQL / SQLite
/// - RFC 3339 (ISO 8601)
///
/// ## MySQL
/// - "YYYY-MM-DD HH:MM:SS.ffffff", stored as UTC
pub fn format_datetime_for_driver(value: &DateTime<Utc>, driver: Drivers) -> String {
    match driver {
        Drivers::Postgres | Drivers::SQLite => value.to_rfc3339(),
        Drivers::MySQL => value.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
    }
}

/// Converts a `NaiveDateTime` to the text form expected by `driver`.
pub fn format_naive_datetime_for_driver(value: &NaiveDateTime, driver: Drivers) -> String {
    match driver {
        Drivers::Postgres | Drivers::MySQL => value.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        Drivers::SQLite => value.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
    }
}

/// All drivers accept ISO 8601 dates.
pub fn format_naive_date(value: &NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// All drivers accept ISO 8601 times.
pub fn format_naive_time(value: &NaiveTime) -> String {
    value.format("%H:%M:%S%.6f").to_string()
}

/// Returns the text a bind-only value is sent as, or `None` for values that
/// bind natively.
pub fn as_driver_text(value: &Value, driver: Drivers) -> Option<String> {
    match value {
        Value::Uuid(v) => Some(v.hyphenated().to_string()),
        Value::Timestamp(v) => Some(format_datetime_for_driver(v, driver)),
        Value::DateTime(v) => Some(format_naive_datetime_for_driver(v, driver)),
        Value::Date(v) => Some(format_naive_date(v)),
        Value::Time(v) => Some(format_naive_time(v)),
        _ => None,
    }
}

// ============================================================================
// PostgreSQL Casts
// ============================================================================

/// Returns the cast appended to a PostgreSQL placeholder for `value`
/// (e.g. `$1::TIMESTAMPTZ`). Empty for every other driver.
pub fn postgres_cast(value: &Value, driver: Drivers) -> &'static str {
    if !matches!(driver, Drivers::Postgres) {
        return "";
    }
    match value {
        Value::Uuid(_) => "::UUID",
        Value::Timestamp(_) => "::TIMESTAMPTZ",
        Value::DateTime(_) => "::TIMESTAMP",
        Value::Date(_) => "::DATE",
        Value::Time(_) => "::TIME",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_datetime_formats_differ_by_driver() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();

        assert_eq!(format_datetime_for_driver(&ts, Drivers::Postgres), "2024-01-15T14:30:00+00:00");
        assert_eq!(format_datetime_for_driver(&ts, Drivers::MySQL), "2024-01-15 14:30:00.000000");
    }

    #[test]
    fn test_casts_only_apply_to_postgres() {
        let date = Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        assert_eq!(postgres_cast(&date, Drivers::Postgres), "::DATE");
        assert_eq!(postgres_cast(&date, Drivers::SQLite), "");
        assert_eq!(postgres_cast(&Value::Int(1), Drivers::Postgres), "");
        assert_eq!(as_driver_text(&date, Drivers::SQLite).as_deref(), Some("2024-02-29"));
    }
}
