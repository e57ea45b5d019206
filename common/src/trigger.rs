// Trigger builder
//
// Converts historical event timestamps into recurring calendar triggers and
// registers them with the scheduler.

use crate::errors::ScheduleError;
use crate::models::{HistoricalEvent, TriggerId};
use crate::scheduler::ReplayScheduler;
use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::debug;

/// Derive the calendar expression for one event timestamp.
///
/// Six fields: seconds pinned to zero, then the event's minute, hour,
/// day-of-month and month, with day-of-week left open. The expression has
/// no year field, so the trigger fires every year on that combination
/// rather than once at the original historical instant.
pub fn calendar_expression(timestamp: &NaiveDateTime) -> String {
    format!(
        "0 {} {} {} {} *",
        timestamp.minute(),
        timestamp.hour(),
        timestamp.day(),
        timestamp.month()
    )
}

/// Register one trigger per historical event, in record order.
///
/// Each event's request volume is moved into its own trigger at
/// registration time, so a firing can never observe another event's
/// volume.
pub async fn register_events(
    scheduler: &ReplayScheduler,
    events: Vec<HistoricalEvent>,
) -> Result<Vec<TriggerId>, ScheduleError> {
    let mut ids = Vec::with_capacity(events.len());
    for event in events {
        let expression = calendar_expression(&event.timestamp);
        let id = scheduler.register(&expression, event.request_volume).await?;
        debug!(trigger_id = %id, expression = %expression, "Historical event registered");
        ids.push(id);
    }
    Ok(ids)
}
