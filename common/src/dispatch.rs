// Load-run dispatcher
//
// Hands a trigger firing to the external load-generation command and
// captures its outcome. Failures are reported to the caller, never
// escalated: the timing loop and the trigger set are unaffected.

use crate::config::DispatchConfig;
use crate::errors::DispatchError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Result of one completed load-generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Combined stdout and stderr of the load generator.
    pub output: String,
}

/// Dispatcher trait for handing a firing to an external load-generation
/// invocation. The scheduler engine only sees this seam, so tests can
/// substitute a recording implementation.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, request_volume: &str) -> Result<DispatchOutcome, DispatchError>;
}

/// Production dispatcher invoking an ApacheBench-style benchmark command:
/// `<program> -n <request_volume> -c <concurrency> <target_url>`.
///
/// Concurrency is a fixed operational constant from configuration; the
/// historical record only supplies the request count.
pub struct BenchmarkDispatcher {
    config: DispatchConfig,
}

impl BenchmarkDispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Dispatcher for BenchmarkDispatcher {
    async fn dispatch(&self, request_volume: &str) -> Result<DispatchOutcome, DispatchError> {
        debug!(
            program = %self.config.program,
            request_volume,
            concurrency = self.config.concurrency,
            target_url = %self.config.target_url,
            "Launching load generator"
        );

        let child = Command::new(&self.config.program)
            .arg("-n")
            .arg(request_volume)
            .arg("-c")
            .arg(self.config.concurrency.to_string())
            .arg(&self.config.target_url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DispatchError::Spawn {
                command: self.config.program.clone(),
                source: e,
            })?;

        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    timeout_seconds = self.config.timeout_seconds,
                    "Load generator timed out"
                );
                return Err(DispatchError::Timeout {
                    timeout_seconds: self.config.timeout_seconds,
                });
            }
        };

        let combined = combine_output(&output.stdout, &output.stderr);
        if output.status.success() {
            Ok(DispatchOutcome { output: combined })
        } else {
            Err(DispatchError::CommandFailed {
                status: output.status.to_string(),
                output: combined,
            })
        }
    }
}

fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    if stderr.is_empty() {
        stdout.into_owned()
    } else if stdout.is_empty() {
        stderr.into_owned()
    } else {
        format!("{stdout}\n{stderr}")
    }
}
