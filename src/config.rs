//! Tracker configuration

use std::time::Duration;

use crate::TrackerError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Root of the Superette REST API, without trailing slash
    pub base_url: String,
    pub poll_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl TrackerConfig {
    pub fn new(base_url: impl Into<String>, poll_interval: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            poll_interval,
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(TrackerError::InvalidConfig {
                reason: format!("base URL must be http(s), got {:?}", self.base_url),
            });
        }
        if self.poll_interval.is_zero() {
            return Err(TrackerError::InvalidConfig {
                reason: "poll interval must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
