// Historical record loader
//
// Reads the tabular record of timestamped traffic events. The first row is
// a header and is skipped unconditionally; every following row must carry a
// parseable day-first timestamp. Loading is fail-fast: the first bad row
// aborts the whole load, leaving zero events for the caller to register.

use crate::errors::{LoadError, ParseError};
use crate::models::{HistoricalEvent, EVENT_TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Load all historical events from a CSV file.
pub fn load_events<P: AsRef<Path>>(path: P) -> Result<Vec<HistoricalEvent>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoadError::Source {
        path: path.display().to_string(),
        source: e,
    })?;
    let events = read_events(file)?;
    info!(
        path = %path.display(),
        events = events.len(),
        "Historical record loaded"
    );
    Ok(events)
}

/// Parse historical events from any CSV source.
///
/// Columns are `[date, time, requests, ...]`; anything past the third
/// column is ignored. Rows are numbered from 1 including the header, so
/// the first data row reports as row 2.
pub fn read_events<R: Read>(reader: R) -> Result<Vec<HistoricalEvent>, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut events = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let row = index + 2;
        let record = result?;

        let date = field(&record, row, 0, "date")?;
        let time = field(&record, row, 1, "time")?;
        let volume = field(&record, row, 2, "requests")?;

        let joined = format!("{date} {time}");
        let timestamp = NaiveDateTime::parse_from_str(&joined, EVENT_TIMESTAMP_FORMAT).map_err(
            |e| ParseError::InvalidTimestamp {
                row,
                value: joined.clone(),
                reason: e.to_string(),
            },
        )?;

        debug!(row, timestamp = %timestamp, request_volume = volume, "Parsed historical event");
        events.push(HistoricalEvent {
            timestamp,
            request_volume: volume.to_string(),
        });
    }

    Ok(events)
}

fn field<'r>(
    record: &'r StringRecord,
    row: usize,
    index: usize,
    column: &'static str,
) -> Result<&'r str, ParseError> {
    record
        .get(index)
        .ok_or(ParseError::MissingColumn { row, column })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_header_row_skipped_without_validation() {
        let source = "completely,bogus,header\n1/1/2025,10:30:00,50\n";
        let events = read_events(source.as_bytes()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].request_volume, "50");
    }

    #[test]
    fn test_day_first_parse() {
        let source = "date,time,requests\n25/3/2019,14:05:00,120\n";
        let events = read_events(source.as_bytes()).unwrap();
        assert_eq!(events[0].timestamp.day(), 25);
        assert_eq!(events[0].timestamp.month(), 3);
        assert_eq!(events[0].timestamp.hour(), 14);
        assert_eq!(events[0].timestamp.minute(), 5);
    }

    #[test]
    fn test_request_volume_kept_verbatim() {
        let source = "date,time,requests\n1/1/2025,10:30:00,not-a-number\n";
        let events = read_events(source.as_bytes()).unwrap();
        assert_eq!(events[0].request_volume, "not-a-number");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let source = "date,time,requests,region,notes\n1/1/2025,10:30:00,50,apac,peak\n";
        let events = read_events(source.as_bytes()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].request_volume, "50");
    }

    #[test]
    fn test_malformed_timestamp_aborts_whole_load() {
        let source = "date,time,requests\n1/1/2025,10:30:00,50\n2025-01-02,11:00:00,60\n";
        let err = read_events(source.as_bytes()).unwrap_err();
        match err {
            LoadError::Parse(ParseError::InvalidTimestamp { row, .. }) => assert_eq!(row, 3),
            other => panic!("expected timestamp parse error, got {other}"),
        }
    }

    #[test]
    fn test_missing_column_aborts_whole_load() {
        let source = "date,time,requests\n1/1/2025,10:30:00\n";
        let err = read_events(source.as_bytes()).unwrap_err();
        match err {
            LoadError::Parse(ParseError::MissingColumn { row, column }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "requests");
            }
            other => panic!("expected missing column error, got {other}"),
        }
    }

    #[test]
    fn test_header_only_record_yields_no_events() {
        let events = read_events("date,time,requests\n".as_bytes()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_unreadable_source_reports_path() {
        let err = load_events("/definitely/not/here.csv").unwrap_err();
        match err {
            LoadError::Source { path, .. } => assert!(path.contains("not/here.csv")),
            other => panic!("expected source error, got {other}"),
        }
    }
}
