//! Background processing - the publish sweep.

use std::time::Duration;

use crate::config::{parse_flag, parse_secs};

#[cfg(feature = "scheduler")]
mod scheduler;

#[cfg(feature = "scheduler")]
pub use scheduler::SweepScheduler;

/// Sweep configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Enable the background sweep.
    pub enabled: bool,
    /// Time between two sweep ticks.
    pub interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(60),
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: parse_flag("SCHEDULER_ENABLED").unwrap_or(defaults.enabled),
            interval: parse_secs("SWEEP_INTERVAL_SECS").unwrap_or(defaults.interval),
        }
    }
}
