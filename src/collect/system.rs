use std::time::Duration;

use async_trait::async_trait;
use sysinfo::{Disks, Networks, System};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::engine::{DiskUsage, InterfaceInfo, InterfaceKind, NetCounters, RawSample};
use crate::traits::{AcquisitionError, MetricsSource};

// First CPU refresh has no baseline; a short settle between two refreshes
// gives a real usage figure instead of zero.
const CPU_WARMUP: Duration = Duration::from_millis(125);

/// Default [`MetricsSource`] backed by sysinfo.
pub struct SysinfoMetricsSource {
    state: Mutex<SourceState>,
}

struct SourceState {
    system: System,
    warmed_up: bool,
}

impl SysinfoMetricsSource {
    pub fn new() -> Self {
        SysinfoMetricsSource {
            state: Mutex::new(SourceState {
                system: System::new_all(),
                warmed_up: false,
            }),
        }
    }
}

impl Default for SysinfoMetricsSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsSource for SysinfoMetricsSource {
    async fn sample(&self) -> Result<RawSample, AcquisitionError> {
        let mut state = self.state.lock().await;

        state.system.refresh_cpu();
        if !state.warmed_up {
            sleep(CPU_WARMUP).await;
            state.system.refresh_cpu();
            state.warmed_up = true;
        }
        state.system.refresh_memory();

        if state.system.cpus().is_empty() {
            return Err(AcquisitionError::Empty("cpu list empty"));
        }
        let cpu_percent = f64::from(state.system.global_cpu_info().cpu_usage());

        let total = state.system.total_memory();
        let used = state.system.used_memory();
        let memory_percent = if total > 0 {
            (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        let networks = Networks::new_with_refreshed_list();
        let mut net = NetCounters::default();
        let mut interfaces = Vec::new();
        for (name, data) in networks.iter() {
            net.bytes_sent = net.bytes_sent.saturating_add(data.total_transmitted());
            net.bytes_recv = net.bytes_recv.saturating_add(data.total_received());
            interfaces.push(InterfaceInfo {
                name: name.clone(),
                kind: InterfaceKind::classify(name),
                mac_address: data.mac_address().to_string(),
                bytes_sent: data.total_transmitted(),
                bytes_recv: data.total_received(),
            });
        }

        let disks = Disks::new_with_refreshed_list()
            .list()
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let free = disk.available_space();
                let used = total.saturating_sub(free);
                DiskUsage {
                    device: disk.name().to_string_lossy().to_string(),
                    mount_point: disk.mount_point().to_string_lossy().to_string(),
                    file_system: disk.file_system().to_string_lossy().to_string(),
                    total,
                    used,
                    free,
                    percent: if total > 0 {
                        used as f64 / total as f64 * 100.0
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        Ok(RawSample {
            cpu_percent,
            memory_percent,
            net,
            disks,
            interfaces,
        })
    }
}
