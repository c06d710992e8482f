use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::select;
use tokio::sync::RwLock;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigError, MonitorConfig};
use crate::traits::{LatencyProbe, MetricsSource, Notifier, Observer};

use super::rate::RateTracker;
use super::threshold::{ThresholdMonitor, Thresholds, Verdict};
use super::types::Snapshot;

/// Owner of the background sampling loop.
///
/// All mutable per-tick state (counter history, hysteresis) lives inside
/// the loop task; the handle only exposes `start`/`stop`/`set_thresholds`.
/// Dropping the handle cancels the loop. `start` must be called from
/// within a tokio runtime.
pub struct SamplingEngine {
    thresholds: Arc<RwLock<Thresholds>>,
    cancel: CancellationToken,
    started: AtomicBool,
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: MonitorConfig,
    thresholds: Arc<RwLock<Thresholds>>,
    cancel: CancellationToken,
    source: Arc<dyn MetricsSource>,
    probe: Arc<dyn LatencyProbe>,
    notifier: Arc<dyn Notifier>,
    observer: Arc<dyn Observer>,
}

impl SamplingEngine {
    pub fn new(
        config: MonitorConfig,
        source: Arc<dyn MetricsSource>,
        probe: Arc<dyn LatencyProbe>,
        notifier: Arc<dyn Notifier>,
        observer: Arc<dyn Observer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let thresholds = Arc::new(RwLock::new(Thresholds {
            cpu_fire: config.cpu_fire_threshold,
            mem_fire: config.mem_fire_threshold,
            clear_margin: config.clear_margin,
            notify_interval: config.notify_interval,
        }));
        let cancel = CancellationToken::new();
        let inner = Arc::new(EngineInner {
            config,
            thresholds: Arc::clone(&thresholds),
            cancel: cancel.clone(),
            source,
            probe,
            notifier,
            observer,
        });
        Ok(SamplingEngine {
            thresholds,
            cancel,
            started: AtomicBool::new(false),
            inner,
        })
    }

    /// Idempotent; the loop is spawned at most once per engine.
    pub fn start(&self) {
        if self.cancel.is_cancelled() {
            warn!("start ignored: engine already stopped");
            return;
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(
            "monitor started (interval {:?}, cpu >= {:.0}%, mem >= {:.0}%)",
            self.inner.config.interval,
            self.inner.config.cpu_fire_threshold,
            self.inner.config.mem_fire_threshold
        );
        self.inner.observer.on_log("monitor started");
        tokio::spawn(EngineInner::run(Arc::clone(&self.inner)));
    }

    /// Idempotent, cooperative. The loop observes cancellation at the top
    /// of its next iteration; at most one in-flight tick completes.
    pub fn stop(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        info!("monitor stopped");
        self.inner.observer.on_log("monitor stopped");
    }

    /// Validated last-write-wins update; takes effect on the next tick.
    pub async fn set_thresholds(&self, cpu: f64, mem: f64) -> Result<(), ConfigError> {
        MonitorConfig::validate_percent("cpu_fire_threshold", cpu)?;
        MonitorConfig::validate_percent("mem_fire_threshold", mem)?;
        let mut limits = self.thresholds.write().await;
        limits.cpu_fire = cpu;
        limits.mem_fire = mem;
        Ok(())
    }
}

impl Drop for SamplingEngine {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl EngineInner {
    async fn run(self: Arc<Self>) {
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut rates = RateTracker::new();
        let mut monitor = ThresholdMonitor::new();

        loop {
            select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            self.tick(&mut rates, &mut monitor).await;
        }
        debug!("sampling loop exited");
    }

    async fn tick(&self, rates: &mut RateTracker, monitor: &mut ThresholdMonitor) {
        let raw = match self.source.sample().await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("metrics acquisition failed: {}", err);
                self.observer
                    .on_log(&format!("metrics acquisition failed: {}", err));
                return;
            }
        };

        let now = Instant::now();
        let link = rates.update(raw.net, now);
        let ping_ms = self
            .probe
            .probe(&self.config.ping_host, self.config.ping_timeout)
            .await;

        let snapshot = Snapshot {
            captured_at: Utc::now(),
            cpu_percent: raw.cpu_percent,
            memory_percent: raw.memory_percent,
            net: raw.net,
            upload_bps: link.map(|r| r.upload_bps),
            download_bps: link.map(|r| r.download_bps),
            ping_ms,
            disks: raw.disks,
            interfaces: raw.interfaces,
        };

        // One observer failure must not stop monitoring.
        if let Err(err) = self.observer.on_update(&snapshot) {
            warn!("observer error: {}", err);
        }

        let limits = *self.thresholds.read().await;
        match monitor.evaluate(&snapshot, &limits, now) {
            Verdict::Fire { subject, body } => {
                let outcome = self.notifier.send(&subject, &body).await;
                if outcome.delivered {
                    self.observer
                        .on_log(&format!("notification sent: {}", subject));
                } else {
                    warn!("notification failed: {}", outcome.detail);
                    self.observer
                        .on_log(&format!("notification failed: {}", outcome.detail));
                }
            }
            Verdict::SuppressedZero => {
                self.observer
                    .on_log("alert suppressed: metrics zero (waiting for real readings)");
            }
            Verdict::SuppressedRateLimit => {
                debug!("alert suppressed by rate limit");
                self.observer.on_log("alert suppressed by rate limit");
            }
            Verdict::Recovered => {
                self.observer
                    .on_log("recovered: metrics below clear thresholds");
            }
            Verdict::Quiet => {}
        }
    }
}
