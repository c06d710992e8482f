mod rate;
mod sampler;
mod threshold;
mod types;

pub use rate::{LinkRates, RateTracker};
pub use sampler::SamplingEngine;
pub use threshold::{ThresholdMonitor, Thresholds, Verdict};
pub use types::{DiskUsage, InterfaceInfo, InterfaceKind, NetCounters, RawSample, Snapshot};
