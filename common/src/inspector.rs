// Read-only trigger listing for observability

use crate::models::TriggerEntry;
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Render the trigger listing for human consumption: one line per trigger,
/// in the given (ascending id) order. An empty trigger set renders as an
/// empty listing.
pub fn render_entries(entries: &[TriggerEntry]) -> String {
    let mut listing = String::new();
    for entry in entries {
        let _ = writeln!(
            listing,
            "ID: {}, Schedule: {}, Next: {}, Prev: {}",
            entry.id,
            entry.expression,
            format_fire(entry.next_fire),
            format_fire(entry.prev_fire),
        );
    }
    listing
}

fn format_fire(fire: Option<DateTime<Utc>>) -> String {
    match fire {
        Some(at) => at.to_rfc3339(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TriggerId;
    use chrono::TimeZone;

    #[test]
    fn test_empty_set_renders_empty_listing() {
        assert_eq!(render_entries(&[]), "");
    }

    #[test]
    fn test_one_line_per_trigger_in_given_order() {
        let entries = vec![
            TriggerEntry {
                id: TriggerId::new(1),
                expression: "0 30 10 1 1 *".to_string(),
                next_fire: Utc.with_ymd_and_hms(2026, 1, 1, 10, 30, 0).single(),
                prev_fire: None,
            },
            TriggerEntry {
                id: TriggerId::new(2),
                expression: "0 45 11 2 2 *".to_string(),
                next_fire: None,
                prev_fire: Utc.with_ymd_and_hms(2025, 2, 2, 11, 45, 0).single(),
            },
        ];

        let listing = render_entries(&entries);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID: 1, Schedule: 0 30 10 1 1 *"));
        assert!(lines[0].contains("Next: 2026-01-01T10:30:00+00:00"));
        assert!(lines[0].ends_with("Prev: -"));
        assert!(lines[1].starts_with("ID: 2,"));
        assert!(lines[1].contains("Prev: 2025-02-02T11:45:00+00:00"));
    }
}
