pub mod collect;
mod config;
pub mod console;
mod engine;
pub mod notify;
pub mod traits;

pub use config::{ConfigError, MonitorConfig};
pub use engine::{
    DiskUsage, InterfaceInfo, InterfaceKind, LinkRates, NetCounters, RateTracker, RawSample,
    SamplingEngine, Snapshot, ThresholdMonitor, Thresholds, Verdict,
};
