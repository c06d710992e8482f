use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use tokio::process::Command;
use tokio::time::timeout;

use crate::traits::LatencyProbe;

lazy_static! {
    static ref RTT_RE: Regex =
        Regex::new(r"time[=<]\s*([0-9]+(?:\.[0-9]+)?)\s*ms").expect("rtt regex");
    // Windows ping sometimes prints `time=1ms` without spacing.
    static ref RTT_COMPACT_RE: Regex = Regex::new(r"time=\s*([0-9]+)ms").expect("rtt regex");
}

/// Default [`LatencyProbe`]: one shot of the system `ping` utility per
/// probe, wrapped in the caller's timeout. Unreachable, missing binary
/// and timeout all read as `None`.
pub struct PingLatencyProbe;

#[async_trait]
impl LatencyProbe for PingLatencyProbe {
    async fn probe(&self, host: &str, limit: Duration) -> Option<f64> {
        let mut command = Command::new("ping");
        #[cfg(windows)]
        command.args(["-n", "1", "-w", "1000"]);
        #[cfg(not(windows))]
        command.args(["-c", "1", "-W", "1"]);
        command.arg(host).stdout(Stdio::piped()).stderr(Stdio::piped());

        let output = match timeout(limit, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                debug!("ping spawn failed: {}", err);
                return None;
            }
            Err(_) => {
                debug!("ping {} timed out after {:?}", host, limit);
                return None;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            parse_rtt_ms(&String::from_utf8_lossy(&output.stderr))
        } else {
            parse_rtt_ms(&stdout)
        }
    }
}

pub(super) fn parse_rtt_ms(output: &str) -> Option<f64> {
    if let Some(captures) = RTT_RE.captures(output) {
        return captures[1].parse().ok();
    }
    RTT_COMPACT_RE
        .captures(output)
        .and_then(|captures| captures[1].parse().ok())
}
