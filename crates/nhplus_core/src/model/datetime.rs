//! Text formats for persisted calendar values.
//!
//! Dates are stored as `yyyy-MM-dd`, times as `HH:mm`, without any timezone.

use chrono::{NaiveDate, NaiveTime, ParseResult, Timelike};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

/// Formats a time as `HH:mm`; seconds are dropped.
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub fn parse_time(value: &str) -> ParseResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
}

/// Drops seconds and sub-second precision, the resolution of persisted times.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// `true` when `time` survives a round trip through the `HH:mm` text form.
pub fn is_whole_minute(time: NaiveTime) -> bool {
    time.second() == 0 && time.nanosecond() == 0
}

/// Serde adapter keeping `NaiveTime` fields in the persisted `HH:mm` shape.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_time(&value).map_err(de::Error::custom)
    }
}
