// Replay scheduling engine

mod engine;

pub use engine::{Firing, ReplayScheduler, SchedulerConfig};
