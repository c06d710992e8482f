use log::info;

use crate::engine::Snapshot;
use crate::traits::{Observer, ObserverError};

/// Text front-end: one status line per tick, or the full reading block
/// in detailed mode. Log events are echoed with a `[monitor]` prefix.
pub struct ConsoleObserver {
    detailed: bool,
}

impl ConsoleObserver {
    pub fn new(detailed: bool) -> Self {
        ConsoleObserver { detailed }
    }
}

impl Observer for ConsoleObserver {
    fn on_update(&self, snapshot: &Snapshot) -> Result<(), ObserverError> {
        if self.detailed {
            print_report(snapshot);
        } else {
            println!(
                "{}  cpu {:5.1}%  mem {:5.1}%  up {}  down {}  ping {}",
                snapshot.captured_at.format("%Y-%m-%d %H:%M:%S"),
                snapshot.cpu_percent,
                snapshot.memory_percent,
                format_rate(snapshot.upload_bps),
                format_rate(snapshot.download_bps),
                format_ping(snapshot.ping_ms),
            );
        }
        Ok(())
    }

    fn on_log(&self, message: &str) {
        println!("[monitor] {}", message);
    }
}

/// JSON front-end: one serde_json line per tick on stdout; log events go
/// to the logger so stdout stays machine-readable.
pub struct JsonObserver;

impl Observer for JsonObserver {
    fn on_update(&self, snapshot: &Snapshot) -> Result<(), ObserverError> {
        match serde_json::to_string(snapshot) {
            Ok(line) => {
                println!("{}", line);
                Ok(())
            }
            Err(err) => Err(ObserverError(format!(
                "snapshot serialization failed: {}",
                err
            ))),
        }
    }

    fn on_log(&self, message: &str) {
        info!("{}", message);
    }
}

fn format_rate(bps: Option<f64>) -> String {
    match bps {
        Some(value) => format!("{:8.2} KB/s", value / 1024.0),
        None => "     --      ".to_string(),
    }
}

fn format_ping(ping_ms: Option<f64>) -> String {
    match ping_ms {
        Some(value) => format!("{:.0} ms", value),
        None => "-- ms".to_string(),
    }
}

fn print_report(snapshot: &Snapshot) {
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;

    println!("\n{}", "=".repeat(60));
    println!(
        "System Monitor - {}",
        snapshot.captured_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("{}", "=".repeat(60));
    println!("\nCPU Usage: {:.1}%", snapshot.cpu_percent);
    println!("Memory Usage: {:.1}%", snapshot.memory_percent);

    println!("\nDisk partitions:");
    if snapshot.disks.is_empty() {
        println!("  No partition information available");
    } else {
        for disk in &snapshot.disks {
            println!(
                "  {} mounted on {} ({}): Total {:.2} GB, Used {:.2} GB, Free {:.2} GB, Percent {:.1}%",
                disk.device,
                disk.mount_point,
                disk.file_system,
                disk.total as f64 / GIB,
                disk.used as f64 / GIB,
                disk.free as f64 / GIB,
                disk.percent,
            );
        }
    }

    println!("\nNetwork (total):");
    println!("  Bytes Sent: {:.2} MB", snapshot.net.bytes_sent as f64 / MIB);
    println!(
        "  Bytes Received: {:.2} MB",
        snapshot.net.bytes_recv as f64 / MIB
    );
    println!(
        "  Upload: {}  Download: {}  Ping: {}",
        format_rate(snapshot.upload_bps).trim(),
        format_rate(snapshot.download_bps).trim(),
        format_ping(snapshot.ping_ms),
    );

    if !snapshot.interfaces.is_empty() {
        println!("\nInterfaces:");
        for nic in &snapshot.interfaces {
            println!(
                "  {} ({:?}) mac {}  sent {:.2} MB  recv {:.2} MB",
                nic.name,
                nic.kind,
                nic.mac_address,
                nic.bytes_sent as f64 / MIB,
                nic.bytes_recv as f64 / MIB,
            );
        }
    }
}
