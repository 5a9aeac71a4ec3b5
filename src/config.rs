// src/config.rs
use std::{env, time::Duration};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct NewsConfig {
    scheduler_poll_interval: Duration,
    default_delete_grace: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_scheduler_poll_secs() -> u64 {
    120
}

fn default_delete_grace_secs() -> u64 {
    15
}

impl NewsConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();

        let scheduler_poll_secs = env::var("NEWS_SCHEDULER_POLL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(default_scheduler_poll_secs);
        if scheduler_poll_secs == 0 {
            return Err(ConfigError::Invalid(
                "NEWS_SCHEDULER_POLL_SECS must be positive".into(),
            ));
        }

        let delete_grace_secs = env::var("NEWS_DELETE_GRACE_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(default_delete_grace_secs);

        Ok(Self {
            scheduler_poll_interval: Duration::from_secs(scheduler_poll_secs),
            default_delete_grace: Duration::from_secs(delete_grace_secs),
        })
    }

    /// How often the background scan promotes staged articles whose schedule
    /// date has passed.
    pub fn scheduler_poll_interval(&self) -> Duration {
        self.scheduler_poll_interval
    }

    /// Delay applied to delete requests that do not specify one.
    pub fn default_delete_grace(&self) -> Duration {
        self.default_delete_grace
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            scheduler_poll_interval: Duration::from_secs(default_scheduler_poll_secs()),
            default_delete_grace: Duration::from_secs(default_delete_grace_secs()),
        }
    }
}
