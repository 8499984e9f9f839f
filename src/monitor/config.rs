// Refresh daemon configuration

use crate::Result;
use crate::error::TlsError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for scheduler jitter
pub const MAX_JITTER_PERCENT: u8 = 50;

/// Upper bound for `interval_seconds` and `tick_seconds` (ten years)
pub const MAX_INTERVAL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// `[refresh]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Target time between two refreshes of the same record
    pub interval_seconds: u64,
    pub max_concurrent_refreshes: usize,
    /// ±percentage applied to `interval_seconds`
    pub jitter_percent: u8,
    /// How often the daemon looks for due records
    pub tick_seconds: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            max_concurrent_refreshes: 10,
            jitter_percent: 10,
            tick_seconds: 10,
        }
    }
}

impl RefreshSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_seconds)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_seconds == 0 {
            return Err(TlsError::Config {
                message: "refresh.interval_seconds must be greater than zero".to_string(),
            });
        }
        if self.interval_seconds > MAX_INTERVAL_SECONDS {
            return Err(TlsError::Config {
                message: format!(
                    "refresh.interval_seconds must be at most {}",
                    MAX_INTERVAL_SECONDS
                ),
            });
        }
        if self.max_concurrent_refreshes == 0 {
            return Err(TlsError::Config {
                message: "refresh.max_concurrent_refreshes must be greater than zero".to_string(),
            });
        }
        if self.tick_seconds == 0 {
            return Err(TlsError::Config {
                message: "refresh.tick_seconds must be greater than zero".to_string(),
            });
        }
        if self.tick_seconds > MAX_INTERVAL_SECONDS {
            return Err(TlsError::Config {
                message: format!("refresh.tick_seconds must be at most {}", MAX_INTERVAL_SECONDS),
            });
        }
        if self.jitter_percent > MAX_JITTER_PERCENT {
            return Err(TlsError::Config {
                message: format!(
                    "refresh.jitter_percent must be at most {}",
                    MAX_JITTER_PERCENT
                ),
            });
        }
        Ok(())
    }
}
