use tokio::time::Instant;

use super::types::NetCounters;

// Floor on elapsed time between two counter samples; guards the division
// when two samples land on the same instant.
const MIN_ELAPSED_SECS: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkRates {
    pub upload_bps: f64,
    pub download_bps: f64,
}

#[derive(Clone, Copy, Debug)]
struct CounterSample {
    counters: NetCounters,
    at: Instant,
}

/// Turns successive cumulative network counters into instantaneous rates.
/// Purely arithmetic; the first sample only seeds the history.
#[derive(Debug, Default)]
pub struct RateTracker {
    last: Option<CounterSample>,
}

impl RateTracker {
    pub fn new() -> Self {
        RateTracker { last: None }
    }

    /// Returns `None` until a previous sample exists. A counter that moved
    /// backwards (interface restart) reads as a delta of zero, never as a
    /// negative rate.
    pub fn update(&mut self, counters: NetCounters, at: Instant) -> Option<LinkRates> {
        let prev = self.last.replace(CounterSample { counters, at })?;
        let elapsed = at
            .saturating_duration_since(prev.at)
            .as_secs_f64()
            .max(MIN_ELAPSED_SECS);
        Some(LinkRates {
            upload_bps: counter_delta(prev.counters.bytes_sent, counters.bytes_sent) / elapsed,
            download_bps: counter_delta(prev.counters.bytes_recv, counters.bytes_recv) / elapsed,
        })
    }
}

fn counter_delta(prev: u64, curr: u64) -> f64 {
    if curr < prev {
        0.0
    } else {
        (curr - prev) as f64
    }
}
