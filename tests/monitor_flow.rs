//! Loop-level scenarios driven with a paused tokio clock and mock
//! collaborators: alert timing, cooperative shutdown and fault isolation.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use syswatch::traits::{
    AcquisitionError, LatencyProbe, MetricsSource, Notifier, NotifyOutcome, Observer,
    ObserverError,
};
use syswatch::{MonitorConfig, NetCounters, RawSample, SamplingEngine, Snapshot};

fn raw(cpu: f64, mem: f64) -> RawSample {
    RawSample {
        cpu_percent: cpu,
        memory_percent: mem,
        net: NetCounters::default(),
        disks: Vec::new(),
        interfaces: Vec::new(),
    }
}

struct StaticSource {
    cpu: f64,
    mem: f64,
}

#[async_trait]
impl MetricsSource for StaticSource {
    async fn sample(&self) -> Result<RawSample, AcquisitionError> {
        Ok(raw(self.cpu, self.mem))
    }
}

/// Plays back a fixed sequence of (cpu, mem) readings, repeating the last
/// one forever.
struct SequenceSource {
    readings: Mutex<VecDeque<(f64, f64)>>,
    last: Mutex<(f64, f64)>,
}

impl SequenceSource {
    fn new(readings: Vec<(f64, f64)>) -> Self {
        let last = *readings.last().expect("non-empty sequence");
        SequenceSource {
            readings: Mutex::new(readings.into()),
            last: Mutex::new(last),
        }
    }
}

#[async_trait]
impl MetricsSource for SequenceSource {
    async fn sample(&self) -> Result<RawSample, AcquisitionError> {
        let next = self.readings.lock().unwrap().pop_front();
        let (cpu, mem) = match next {
            Some(reading) => {
                *self.last.lock().unwrap() = reading;
                reading
            }
            None => *self.last.lock().unwrap(),
        };
        Ok(raw(cpu, mem))
    }
}

struct FlakySource {
    failures_left: AtomicUsize,
}

#[async_trait]
impl MetricsSource for FlakySource {
    async fn sample(&self) -> Result<RawSample, AcquisitionError> {
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(AcquisitionError::Backend("simulated outage".to_string()));
        }
        Ok(raw(10.0, 10.0))
    }
}

struct NoopProbe;

#[async_trait]
impl LatencyProbe for NoopProbe {
    async fn probe(&self, _host: &str, _timeout: Duration) -> Option<f64> {
        None
    }
}

#[derive(Default)]
struct CountingNotifier {
    calls: AtomicUsize,
}

impl CountingNotifier {
    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn send(&self, _subject: &str, _body: &str) -> NotifyOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        NotifyOutcome::delivered("recorded")
    }
}

#[derive(Default)]
struct RecordingObserver {
    updates: Mutex<Vec<Snapshot>>,
    logs: Mutex<Vec<String>>,
}

impl RecordingObserver {
    fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    fn has_log(&self, needle: &str) -> bool {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .any(|line| line.contains(needle))
    }
}

impl Observer for RecordingObserver {
    fn on_update(&self, snapshot: &Snapshot) -> Result<(), ObserverError> {
        self.updates.lock().unwrap().push(snapshot.clone());
        Ok(())
    }

    fn on_log(&self, message: &str) {
        self.logs.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
struct FailingObserver {
    attempts: AtomicUsize,
}

impl Observer for FailingObserver {
    fn on_update(&self, _snapshot: &Snapshot) -> Result<(), ObserverError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ObserverError("observer exploded".to_string()))
    }

    fn on_log(&self, _message: &str) {}
}

fn engine_with(
    config: MonitorConfig,
    source: Arc<dyn MetricsSource>,
    notifier: Arc<dyn Notifier>,
    observer: Arc<dyn Observer>,
) -> SamplingEngine {
    SamplingEngine::new(config, source, Arc::new(NoopProbe), notifier, observer)
        .expect("valid config")
}

#[tokio::test(start_paused = true)]
async fn first_tick_has_no_rates_then_rates_follow() {
    let observer = Arc::new(RecordingObserver::default());
    let engine = engine_with(
        MonitorConfig::default(),
        Arc::new(StaticSource {
            cpu: 10.0,
            mem: 10.0,
        }),
        Arc::new(CountingNotifier::default()),
        observer.clone(),
    );
    engine.start();
    sleep(Duration::from_millis(2_500)).await;
    engine.stop();

    let updates = observer.updates.lock().unwrap();
    assert!(updates.len() >= 2, "expected at least two ticks");
    assert!(updates[0].upload_bps.is_none());
    assert!(updates[0].download_bps.is_none());
    assert_eq!(updates[1].upload_bps, Some(0.0));
    assert_eq!(updates[1].download_bps, Some(0.0));
}

#[tokio::test(start_paused = true)]
async fn alert_fires_then_rate_limit_suppresses_then_refires() {
    let notifier = Arc::new(CountingNotifier::default());
    let observer = Arc::new(RecordingObserver::default());
    let config = MonitorConfig {
        cpu_fire_threshold: 50.0,
        ..MonitorConfig::default()
    };
    let engine = engine_with(
        config,
        Arc::new(StaticSource {
            cpu: 60.0,
            mem: 10.0,
        }),
        notifier.clone(),
        observer.clone(),
    );
    engine.start();

    // First tick breaches immediately.
    sleep(Duration::from_millis(500)).await;
    assert_eq!(notifier.count(), 1);

    // Ticks within the 10 s notify interval stay suppressed.
    sleep(Duration::from_secs(9)).await;
    assert_eq!(notifier.count(), 1);
    assert!(observer.has_log("alert suppressed by rate limit"));

    // Once the window elapses the alert repeats.
    sleep(Duration::from_secs(2)).await;
    assert_eq!(notifier.count(), 2);

    engine.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_halts_observer_and_notifier_activity() {
    let notifier = Arc::new(CountingNotifier::default());
    let observer = Arc::new(RecordingObserver::default());
    let config = MonitorConfig {
        cpu_fire_threshold: 50.0,
        ..MonitorConfig::default()
    };
    let engine = engine_with(
        config,
        Arc::new(StaticSource {
            cpu: 60.0,
            mem: 10.0,
        }),
        notifier.clone(),
        observer.clone(),
    );
    engine.start();
    sleep(Duration::from_millis(2_500)).await;
    engine.stop();
    // Idempotent.
    engine.stop();

    let updates_seen = observer.update_count();
    let alerts_seen = notifier.count();
    assert!(updates_seen >= 1);

    sleep(Duration::from_secs(30)).await;
    assert_eq!(observer.update_count(), updates_seen);
    assert_eq!(notifier.count(), alerts_seen);
}

#[tokio::test(start_paused = true)]
async fn failing_observer_does_not_stop_monitoring() {
    let notifier = Arc::new(CountingNotifier::default());
    let observer = Arc::new(FailingObserver::default());
    let config = MonitorConfig {
        cpu_fire_threshold: 50.0,
        ..MonitorConfig::default()
    };
    let engine = engine_with(
        config,
        Arc::new(StaticSource {
            cpu: 60.0,
            mem: 10.0,
        }),
        notifier.clone(),
        observer.clone(),
    );
    engine.start();
    sleep(Duration::from_millis(3_500)).await;
    engine.stop();

    assert!(observer.attempts.load(Ordering::SeqCst) >= 3);
    assert!(notifier.count() >= 1);
}

#[tokio::test(start_paused = true)]
async fn acquisition_errors_skip_ticks_but_loop_continues() {
    let observer = Arc::new(RecordingObserver::default());
    let engine = engine_with(
        MonitorConfig::default(),
        Arc::new(FlakySource {
            failures_left: AtomicUsize::new(2),
        }),
        Arc::new(CountingNotifier::default()),
        observer.clone(),
    );
    engine.start();
    sleep(Duration::from_millis(3_500)).await;
    engine.stop();

    assert!(observer.has_log("metrics acquisition failed"));
    assert!(observer.update_count() >= 1, "loop must recover after outage");
}

#[tokio::test(start_paused = true)]
async fn start_is_idempotent() {
    let observer = Arc::new(RecordingObserver::default());
    let engine = engine_with(
        MonitorConfig::default(),
        Arc::new(StaticSource {
            cpu: 10.0,
            mem: 10.0,
        }),
        Arc::new(CountingNotifier::default()),
        observer.clone(),
    );
    engine.start();
    engine.start();
    sleep(Duration::from_millis(2_200)).await;
    engine.stop();

    // A doubled loop would have produced roughly twice as many updates.
    assert!(observer.update_count() <= 4);
}

#[tokio::test(start_paused = true)]
async fn set_thresholds_applies_on_next_tick() {
    let notifier = Arc::new(CountingNotifier::default());
    let observer = Arc::new(RecordingObserver::default());
    let engine = engine_with(
        MonitorConfig::default(),
        Arc::new(StaticSource {
            cpu: 60.0,
            mem: 10.0,
        }),
        notifier.clone(),
        observer.clone(),
    );
    engine.start();
    sleep(Duration::from_millis(1_500)).await;
    assert_eq!(notifier.count(), 0);

    engine.set_thresholds(50.0, 70.0).await.unwrap();
    sleep(Duration::from_secs(1)).await;
    assert_eq!(notifier.count(), 1);

    assert!(engine.set_thresholds(150.0, 70.0).await.is_err());
    engine.stop();
}

#[tokio::test(start_paused = true)]
async fn recovery_is_logged_but_not_notified() {
    let notifier = Arc::new(CountingNotifier::default());
    let observer = Arc::new(RecordingObserver::default());
    let config = MonitorConfig {
        cpu_fire_threshold: 50.0,
        ..MonitorConfig::default()
    };
    let engine = engine_with(
        config,
        Arc::new(SequenceSource::new(vec![(95.0, 10.0), (10.0, 10.0)])),
        notifier.clone(),
        observer.clone(),
    );
    engine.start();
    sleep(Duration::from_millis(2_500)).await;
    engine.stop();

    assert_eq!(notifier.count(), 1);
    assert!(observer.has_log("recovered: metrics below clear thresholds"));
}
