use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiskUsage {
    pub device: String,
    pub mount_point: String,
    pub file_system: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    Loopback,
    Wireless,
    Ethernet,
    Unknown,
}

impl InterfaceKind {
    /// Name-based classification; interface naming is not standardised so
    /// this stays a heuristic (lo*, wl*/wlan/wifi, en*/eth*).
    pub fn classify(name: &str) -> Self {
        let lname = name.to_lowercase();
        if lname.starts_with("lo") || lname.contains("loopback") {
            InterfaceKind::Loopback
        } else if lname.starts_with("wl")
            || lname.contains("wifi")
            || lname.contains("wi-fi")
            || lname.contains("wlan")
            || lname.contains("wireless")
        {
            InterfaceKind::Wireless
        } else if lname.starts_with("en") || lname.starts_with("eth") {
            InterfaceKind::Ethernet
        } else {
            InterfaceKind::Unknown
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub kind: InterfaceKind,
    pub mac_address: String,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// One acquisition from a [`MetricsSource`](crate::traits::MetricsSource):
/// everything the engine needs before derived fields are computed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawSample {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub net: NetCounters,
    pub disks: Vec<DiskUsage>,
    pub interfaces: Vec<InterfaceInfo>,
}

/// Enriched per-tick reading published to observers. Rates and ping are
/// `None` when they could not be derived (first tick, probe failure).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub captured_at: DateTime<Utc>,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub net: NetCounters,
    pub upload_bps: Option<f64>,
    pub download_bps: Option<f64>,
    pub ping_ms: Option<f64>,
    pub disks: Vec<DiskUsage>,
    pub interfaces: Vec<InterfaceInfo>,
}
