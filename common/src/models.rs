// Core data model for the replay scheduler

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;

/// Timestamp pattern of the historical record: day-first, no zero padding.
///
/// A day value greater than 12 in the first position must parse, which is
/// what pins the format as day-first rather than month-first.
pub const EVENT_TIMESTAMP_FORMAT: &str = "%-d/%-m/%Y %H:%M:%S";

/// One row of the historical traffic record.
///
/// `request_volume` is carried verbatim to the dispatcher; the record is
/// never validated as numeric at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalEvent {
    pub timestamp: NaiveDateTime,
    pub request_volume: String,
}

/// Scheduler-assigned trigger identifier.
///
/// Ids increase strictly in registration order and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerId(u64);

impl TriggerId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of one registered trigger, as exposed for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEntry {
    pub id: TriggerId,
    pub expression: String,
    pub next_fire: Option<DateTime<Utc>>,
    pub prev_fire: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format_round_trip() {
        let raw = "1/1/2025 10:30:00";
        let parsed = NaiveDateTime::parse_from_str(raw, EVENT_TIMESTAMP_FORMAT).unwrap();
        assert_eq!(parsed.format(EVENT_TIMESTAMP_FORMAT).to_string(), raw);
    }

    #[test]
    fn test_timestamp_format_is_day_first() {
        let parsed =
            NaiveDateTime::parse_from_str("25/3/2019 14:05:00", EVENT_TIMESTAMP_FORMAT).unwrap();
        use chrono::Datelike;
        assert_eq!(parsed.day(), 25);
        assert_eq!(parsed.month(), 3);
    }

    #[test]
    fn test_zero_padded_input_still_parses() {
        let parsed =
            NaiveDateTime::parse_from_str("01/01/2025 10:30:00", EVENT_TIMESTAMP_FORMAT).unwrap();
        use chrono::{Datelike, Timelike};
        assert_eq!(parsed.day(), 1);
        assert_eq!(parsed.month(), 1);
        assert_eq!(parsed.hour(), 10);
    }

    #[test]
    fn test_trigger_id_display_and_order() {
        let a = TriggerId::new(1);
        let b = TriggerId::new(2);
        assert_eq!(a.to_string(), "1");
        assert!(a < b);
        assert_eq!(b.value(), 2);
    }
}
