// Error handling framework

use thiserror::Error;

/// Errors raised while parsing individual rows of the historical record
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Row {row}: missing '{column}' column")]
    MissingColumn { row: usize, column: &'static str },

    #[error("Row {row}: invalid timestamp '{value}': {reason}")]
    InvalidTimestamp {
        row: usize,
        value: String,
        reason: String,
    },
}

/// Errors raised while loading the historical record
///
/// Any variant aborts the whole load: a single bad row forecloses all
/// scheduling for that run, so the caller ends up with zero events.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read historical record '{path}': {source}")]
    Source {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read historical record row: {0}")]
    Record(#[from] csv::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Schedule-related errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid calendar expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },
}

/// Load-generation dispatch errors
///
/// These are recoverable from the scheduler's point of view: a failed
/// dispatch is logged and counted, and the trigger stays registered for
/// its next recurrence.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Failed to launch load generator '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to collect load generator output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Load generator exited with {status}: {output}")]
    CommandFailed { status: String, output: String },

    #[error("Load generator timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}

impl DispatchError {
    /// Short failure class used as a metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Spawn { .. } => "spawn",
            DispatchError::Output(_) => "output",
            DispatchError::CommandFailed { .. } => "exit",
            DispatchError::Timeout { .. } => "timeout",
        }
    }
}
