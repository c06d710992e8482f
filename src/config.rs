// src/config.rs

use std::fmt;
use std::time::Duration;

/// Construction-time configuration for the sampling engine. Validated
/// eagerly; bad values never reach the loop.
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// CPU percent at or above which an alert fires.
    pub cpu_fire_threshold: f64,
    /// Memory percent at or above which an alert fires.
    pub mem_fire_threshold: f64,
    /// Percentage points below the fire thresholds at which an active
    /// alert clears (hysteresis band).
    pub clear_margin: f64,
    /// Sampling period.
    pub interval: Duration,
    /// Minimum spacing between delivered notifications.
    pub notify_interval: Duration,
    /// Host pinged once per tick for a latency reading.
    pub ping_host: String,
    /// Upper bound on a single latency probe.
    pub ping_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            cpu_fire_threshold: 90.0,
            mem_fire_threshold: 70.0,
            clear_margin: 15.0,
            interval: Duration::from_secs(1),
            notify_interval: Duration::from_secs(10),
            ping_host: "8.8.8.8".to_string(),
            ping_timeout: Duration::from_secs(2),
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_percent("cpu_fire_threshold", self.cpu_fire_threshold)?;
        Self::validate_percent("mem_fire_threshold", self.mem_fire_threshold)?;
        if !self.clear_margin.is_finite() || self.clear_margin <= 0.0 {
            return Err(ConfigError::MarginOutOfRange(self.clear_margin));
        }
        if self.interval < Duration::from_secs(1) {
            return Err(ConfigError::IntervalTooShort("interval", self.interval));
        }
        if self.notify_interval < Duration::from_secs(1) {
            return Err(ConfigError::IntervalTooShort(
                "notify_interval",
                self.notify_interval,
            ));
        }
        if self.ping_host.trim().is_empty() {
            return Err(ConfigError::EmptyPingHost);
        }
        Ok(())
    }

    pub(crate) fn validate_percent(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if !value.is_finite() || value < 0.0 || value > 100.0 {
            return Err(ConfigError::ThresholdOutOfRange(name, value));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ThresholdOutOfRange(&'static str, f64),
    MarginOutOfRange(f64),
    IntervalTooShort(&'static str, Duration),
    EmptyPingHost,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ThresholdOutOfRange(name, value) => {
                write!(f, "{} must be within 0..=100, got {}", name, value)
            }
            ConfigError::MarginOutOfRange(value) => {
                write!(f, "clear_margin must be a positive number, got {}", value)
            }
            ConfigError::IntervalTooShort(name, value) => {
                write!(f, "{} must be at least 1s, got {:?}", name, value)
            }
            ConfigError::EmptyPingHost => write!(f, "ping_host must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}
