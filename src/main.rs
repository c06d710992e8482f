use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use syswatch::collect::{PingLatencyProbe, SysinfoMetricsSource};
use syswatch::console::{ConsoleObserver, JsonObserver};
use syswatch::notify::{ConsoleNotifier, DesktopNotifier};
use syswatch::traits::{Notifier, Observer};
use syswatch::{MonitorConfig, SamplingEngine};

#[derive(Parser, Debug)]
#[command(name = "syswatch", about = "Local resource monitor with threshold alerting")]
struct Args {
    /// Sampling interval in seconds
    #[arg(long, default_value_t = 1)]
    interval: u64,

    /// CPU percent threshold to alert
    #[arg(long = "cpu-thr", default_value_t = 90.0)]
    cpu_thr: f64,

    /// Memory percent threshold to alert
    #[arg(long = "mem-thr", default_value_t = 70.0)]
    mem_thr: f64,

    /// Notification repeat interval in seconds
    #[arg(long, default_value_t = 10)]
    notify_interval: u64,

    /// Host to ping for latency measurement
    #[arg(long, default_value = "8.8.8.8")]
    ping_host: String,

    /// Emit one JSON line per sample instead of the text status line
    #[arg(long)]
    json: bool,

    /// Print the full reading block every tick instead of one line
    #[arg(long, conflicts_with = "json")]
    detailed: bool,

    /// Deliver alerts to the desktop notification daemon (notify-send)
    #[arg(long)]
    desktop: bool,

    /// Disable alert delivery (alerts are still logged)
    #[arg(long)]
    no_notify: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = MonitorConfig {
        cpu_fire_threshold: args.cpu_thr,
        mem_fire_threshold: args.mem_thr,
        interval: Duration::from_secs(args.interval),
        notify_interval: Duration::from_secs(args.notify_interval),
        ping_host: args.ping_host.clone(),
        ..MonitorConfig::default()
    };

    let observer: Arc<dyn Observer> = if args.json {
        Arc::new(JsonObserver)
    } else {
        Arc::new(ConsoleObserver::new(args.detailed))
    };
    let notifier: Arc<dyn Notifier> = if args.desktop {
        Arc::new(DesktopNotifier::new(!args.no_notify))
    } else {
        Arc::new(ConsoleNotifier::new(!args.no_notify))
    };

    let engine = SamplingEngine::new(
        config,
        Arc::new(SysinfoMetricsSource::new()),
        Arc::new(PingLatencyProbe),
        notifier,
        observer,
    )?;

    engine.start();
    tokio::signal::ctrl_c().await?;
    engine.stop();
    Ok(())
}
