use std::time::Duration;

use tokio::time::Instant;

use super::types::Snapshot;

/// Runtime-adjustable portion of the alerting policy; the engine reads it
/// once per tick so threshold changes take effect on the next sample.
#[derive(Clone, Copy, Debug)]
pub struct Thresholds {
    pub cpu_fire: f64,
    pub mem_fire: f64,
    pub clear_margin: f64,
    pub notify_interval: Duration,
}

/// Outcome of evaluating one snapshot against the thresholds.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    /// No breach, no state change.
    Quiet,
    /// Notify now. A combined CPU+memory breach produces a single verdict.
    Fire { subject: String, body: String },
    /// Breach with all-zero readings; startup guard, log only.
    SuppressedZero,
    /// Breach inside the rate-limit window; log only.
    SuppressedRateLimit,
    /// Both metrics dropped below the clear thresholds; silent recovery.
    Recovered,
}

/// Two-channel hysteresis state machine plus notification rate limiter.
///
/// `last_alert` advances the moment a `Fire` verdict is produced, before
/// delivery is attempted, so a persistently failing notifier cannot cause
/// an alert storm.
#[derive(Debug, Default)]
pub struct ThresholdMonitor {
    alerting: bool,
    last_alert: Option<Instant>,
}

impl ThresholdMonitor {
    pub fn new() -> Self {
        ThresholdMonitor {
            alerting: false,
            last_alert: None,
        }
    }

    pub fn is_alerting(&self) -> bool {
        self.alerting
    }

    pub fn evaluate(&mut self, snapshot: &Snapshot, limits: &Thresholds, now: Instant) -> Verdict {
        let cpu = snapshot.cpu_percent;
        let mem = snapshot.memory_percent;

        let mut reasons = Vec::new();
        if cpu >= limits.cpu_fire {
            reasons.push(format!("CPU {:.1}% >= {:.0}%", cpu, limits.cpu_fire));
        }
        if mem >= limits.mem_fire {
            reasons.push(format!("Memory {:.1}% >= {:.0}%", mem, limits.mem_fire));
        }

        if !reasons.is_empty() {
            // Suppress until we have non-zero readings to avoid false
            // positives at startup.
            if cpu <= 0.0 && mem <= 0.0 {
                return Verdict::SuppressedZero;
            }
            let can_send = self
                .last_alert
                .map_or(true, |t| now.saturating_duration_since(t) >= limits.notify_interval);
            if !can_send {
                return Verdict::SuppressedRateLimit;
            }
            self.last_alert = Some(now);
            self.alerting = true;
            return Verdict::Fire {
                subject: format!("Resource alert: {}", reasons.join(", ")),
                body: alert_body(snapshot),
            };
        }

        let clear_cpu = (limits.cpu_fire - limits.clear_margin).max(0.0);
        let clear_mem = (limits.mem_fire - limits.clear_margin).max(0.0);
        if self.alerting && cpu < clear_cpu && mem < clear_mem {
            self.alerting = false;
            return Verdict::Recovered;
        }

        Verdict::Quiet
    }
}

fn alert_body(snapshot: &Snapshot) -> String {
    let mut lines = vec![
        format!("Timestamp: {}", snapshot.captured_at.to_rfc3339()),
        format!("CPU: {:.1}%", snapshot.cpu_percent),
        format!("Memory: {:.1}%", snapshot.memory_percent),
    ];
    if let (Some(up), Some(down)) = (snapshot.upload_bps, snapshot.download_bps) {
        lines.push(format!("Upload: {:.2} KB/s", up / 1024.0));
        lines.push(format!("Download: {:.2} KB/s", down / 1024.0));
    }
    if let Some(ping) = snapshot.ping_ms {
        lines.push(format!("Ping: {:.0} ms", ping));
    }
    lines.join("\n")
}
