// Configuration management with layered configuration (file, env)

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub replay: ReplayConfig,
    pub scheduler: SchedulerConfig,
    pub dispatch: DispatchConfig,
    pub observability: ObservabilityConfig,
}

/// Listener settings for the testbed responder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// URL the `/status/200` handler queries for the caller-visible IP.
    pub ip_echo_url: String,
}

/// Source of the historical traffic record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub history_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Timing loop wake interval. Must stay below the one-minute
    /// granularity of the calendar expressions.
    pub tick_interval_seconds: u64,
    /// IANA timezone the calendar expressions are evaluated in.
    pub timezone: String,
}

/// External load-generation command settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub program: String,
    /// Fixed operational concurrency, independent of the historical data.
    pub concurrency: u32,
    pub target_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub metrics_port: u16,
}

impl Settings {
    /// Load configuration with layered precedence: defaults file → local
    /// overrides → `APP__`-prefixed environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.replay.history_path.is_empty() {
            return Err("Replay history_path cannot be empty".to_string());
        }

        if self.scheduler.tick_interval_seconds == 0 {
            return Err("Scheduler tick_interval_seconds must be greater than 0".to_string());
        }
        if self.scheduler.tick_interval_seconds >= 60 {
            return Err(
                "Scheduler tick_interval_seconds must stay below the one-minute field granularity"
                    .to_string(),
            );
        }
        if self.scheduler.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(format!("Unknown timezone '{}'", self.scheduler.timezone));
        }

        if self.dispatch.program.is_empty() {
            return Err("Dispatch program cannot be empty".to_string());
        }
        if self.dispatch.concurrency == 0 {
            return Err("Dispatch concurrency must be greater than 0".to_string());
        }
        if self.dispatch.target_url.is_empty() {
            return Err("Dispatch target_url cannot be empty".to_string());
        }
        if self.dispatch.timeout_seconds == 0 {
            return Err("Dispatch timeout_seconds must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                ip_echo_url: "http://checkip.amazonaws.com".to_string(),
            },
            replay: ReplayConfig {
                history_path: "data/history.csv".to_string(),
            },
            scheduler: SchedulerConfig {
                tick_interval_seconds: 1,
                timezone: "Asia/Jakarta".to_string(),
            },
            dispatch: DispatchConfig {
                program: "ab".to_string(),
                concurrency: 1000,
                target_url: "http://localhost:8080/status/200".to_string(),
                timeout_seconds: 300,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                metrics_port: 9090,
            },
        }
    }
}
