//! Seams between the sampling engine and its collaborators. The engine
//! treats all of them as best-effort: a failing source, probe, notifier
//! or observer costs one tick's worth of data at most.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::engine::{RawSample, Snapshot};

/// Point-in-time acquisition of raw machine metrics.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn sample(&self) -> Result<RawSample, AcquisitionError>;
}

/// Round-trip-time measurement against a reference host. Failure and
/// timeout both read as `None`.
#[async_trait]
pub trait LatencyProbe: Send + Sync {
    async fn probe(&self, host: &str, timeout: Duration) -> Option<f64>;
}

/// Alert delivery. Never fails at the type level; the outcome carries a
/// delivered flag plus a human-readable detail.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> NotifyOutcome;
}

/// Presentation callback, invoked once per tick plus for lifecycle events.
pub trait Observer: Send + Sync {
    fn on_update(&self, snapshot: &Snapshot) -> Result<(), ObserverError>;
    fn on_log(&self, message: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotifyOutcome {
    pub delivered: bool,
    pub detail: String,
}

impl NotifyOutcome {
    pub fn delivered(detail: impl Into<String>) -> Self {
        NotifyOutcome {
            delivered: true,
            detail: detail.into(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        NotifyOutcome {
            delivered: false,
            detail: detail.into(),
        }
    }
}

#[derive(Debug)]
pub enum AcquisitionError {
    /// The backing collector reported an error of its own.
    Backend(String),
    /// The backing collector produced no usable data.
    Empty(&'static str),
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionError::Backend(detail) => write!(f, "metrics backend failed: {}", detail),
            AcquisitionError::Empty(what) => write!(f, "{}", what),
        }
    }
}

impl std::error::Error for AcquisitionError {}

#[derive(Debug)]
pub struct ObserverError(pub String);

impl fmt::Display for ObserverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ObserverError {}
