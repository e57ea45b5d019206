// Scheduler engine implementation
//
// Owns the authoritative trigger set and runs the background timing loop.
// One coordinator task detects due triggers; every due firing is handed to
// its own spawned worker, so a slow or hanging load run never delays the
// next tick or the other triggers. There is no concurrency cap on workers
// and no mutual exclusion between recurrences of the same trigger.

use crate::dispatch::Dispatcher;
use crate::errors::ScheduleError;
use crate::models::{TriggerEntry, TriggerId};
use crate::telemetry;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule as CronSchedule;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};

/// Runtime configuration for the scheduler engine
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// How often the timing loop wakes to look for due triggers.
    pub tick_interval: Duration,
    /// Timezone the calendar expressions are evaluated in.
    pub timezone: Tz,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            timezone: chrono_tz::Asia::Jakarta,
        }
    }
}

/// One registered calendar trigger.
///
/// Expression and payload never change after registration; only the fire
/// bookkeeping advances as time passes.
struct TriggerRecord {
    id: TriggerId,
    expression: String,
    schedule: CronSchedule,
    payload: String,
    next_fire: Option<DateTime<Utc>>,
    prev_fire: Option<DateTime<Utc>>,
}

/// A trigger that came due, with its bound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Firing {
    pub id: TriggerId,
    pub payload: String,
}

/// Main scheduler engine
pub struct ReplayScheduler {
    config: SchedulerConfig,
    dispatcher: Arc<dyn Dispatcher>,
    triggers: RwLock<Vec<TriggerRecord>>,
    next_id: AtomicU64,
    running: AtomicBool,
    shutdown_tx: broadcast::Sender<()>,
}

impl ReplayScheduler {
    pub fn new(config: SchedulerConfig, dispatcher: Arc<dyn Dispatcher>) -> Self {
        let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);

        Self {
            config,
            dispatcher,
            triggers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            running: AtomicBool::new(false),
            shutdown_tx,
        }
    }

    /// Register a new trigger, binding the payload to it by value.
    ///
    /// Returns a fresh id, strictly greater than every id handed out
    /// before. Duplicate expressions are kept; both fire independently.
    pub async fn register(
        &self,
        expression: &str,
        payload: String,
    ) -> Result<TriggerId, ScheduleError> {
        let schedule =
            CronSchedule::from_str(expression).map_err(|e| ScheduleError::InvalidExpression {
                expression: expression.to_string(),
                reason: e.to_string(),
            })?;

        let id = TriggerId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = TriggerRecord {
            id,
            expression: expression.to_string(),
            schedule,
            payload,
            next_fire: None,
            prev_fire: None,
        };

        self.triggers.write().await.push(record);
        debug!(trigger_id = %id, expression, "Trigger registered");
        Ok(id)
    }

    /// Start the background timing loop.
    ///
    /// Idempotent: a second call while the loop is running is a no-op and
    /// returns `false`, so two competing loops can never exist.
    pub fn start(self: &Arc<Self>) -> bool {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Scheduler already running, ignoring start");
            return false;
        }

        let shutdown_rx = self.shutdown_tx.subscribe();
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            engine.run_loop(shutdown_rx).await;
        });
        true
    }

    /// Stop the timing loop and wait for it to halt.
    ///
    /// Already-started dispatch workers are left to finish; no new ones
    /// are started once the loop has observed the signal. The trigger set
    /// is untouched.
    pub async fn stop(&self) {
        info!("Stopping replay scheduler");
        let _ = self.shutdown_tx.send(());
        while self.running.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        info!("Replay scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of all registered triggers in ascending id order.
    ///
    /// Holds the read lock only long enough to clone; never blocks the
    /// timing loop across I/O. Triggers the loop has not touched yet get
    /// their next fire computed from the current instant for display.
    pub async fn entries(&self) -> Vec<TriggerEntry> {
        let now = Utc::now().with_timezone(&self.config.timezone);
        let triggers = self.triggers.read().await;
        triggers
            .iter()
            .map(|record| TriggerEntry {
                id: record.id,
                expression: record.expression.clone(),
                next_fire: record.next_fire.or_else(|| {
                    record
                        .schedule
                        .after(&now)
                        .next()
                        .map(|at| at.with_timezone(&Utc))
                }),
                prev_fire: record.prev_fire,
            })
            .collect()
    }

    /// Detect triggers due at `now`, hand each to its own dispatch worker,
    /// and return the firings. The timing loop calls this every tick; an
    /// explicit instant keeps recurrence behavior testable.
    pub async fn process_due(&self, now: DateTime<Utc>) -> Vec<Firing> {
        let due = self.advance(now).await;
        for firing in &due {
            self.spawn_dispatch(firing.clone());
        }
        due
    }

    /// Advance per-trigger bookkeeping to `now`, collecting due firings.
    ///
    /// A trigger with no computed next fire yet is primed with its first
    /// calendar match after `now`. On the tick a stored fire instant has
    /// passed, the trigger is due and its bookkeeping moves to the next
    /// match, which for these year-less expressions lands one year out.
    /// Every annual recurrence is a fresh, independent firing.
    async fn advance(&self, now: DateTime<Utc>) -> Vec<Firing> {
        let local_now = now.with_timezone(&self.config.timezone);
        let mut due = Vec::new();

        let mut triggers = self.triggers.write().await;
        for record in triggers.iter_mut() {
            let next = match record.next_fire {
                Some(at) => at,
                None => {
                    let Some(at) = record.schedule.after(&local_now).next() else {
                        continue;
                    };
                    let at = at.with_timezone(&Utc);
                    record.next_fire = Some(at);
                    at
                }
            };

            if next <= now {
                record.prev_fire = Some(next);
                record.next_fire = record
                    .schedule
                    .after(&local_now)
                    .next()
                    .map(|at| at.with_timezone(&Utc));
                due.push(Firing {
                    id: record.id,
                    payload: record.payload.clone(),
                });
            }
        }

        due
    }

    /// Hand one firing to its own worker. No concurrency cap: every due
    /// trigger fires in parallel, and a failure only affects this firing.
    fn spawn_dispatch(&self, firing: Firing) {
        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::spawn(async move {
            telemetry::record_trigger_fired(firing.id);
            info!(
                trigger_id = %firing.id,
                request_volume = %firing.payload,
                "Dispatching load run"
            );
            match dispatcher.dispatch(&firing.payload).await {
                Ok(outcome) => {
                    telemetry::record_load_run_success(firing.id);
                    info!(
                        trigger_id = %firing.id,
                        output_bytes = outcome.output.len(),
                        "Load run completed"
                    );
                }
                Err(e) => {
                    telemetry::record_load_run_failure(firing.id, e.kind());
                    error!(trigger_id = %firing.id, error = %e, "Load run failed");
                }
            }
        });
    }

    async fn run_loop(self: Arc<Self>, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(
            tick_interval_ms = self.config.tick_interval.as_millis() as u64,
            timezone = %self.config.timezone,
            "Replay timing loop started"
        );

        let mut tick = tokio::time::interval(self.config.tick_interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let fired = self.process_due(Utc::now()).await;
                    if !fired.is_empty() {
                        info!(fired = fired.len(), "Triggers fired this tick");
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received, stopping timing loop");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!("Replay timing loop stopped");
    }
}
