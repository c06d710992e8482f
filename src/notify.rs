use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use crate::traits::{Notifier, NotifyOutcome};

/// Prints alerts to stdout. Delivery can be disabled at construction;
/// a disabled notifier reports failure so the engine logs the alert
/// instead of pretending it was shown.
pub struct ConsoleNotifier {
    enabled: bool,
}

impl ConsoleNotifier {
    pub fn new(enabled: bool) -> Self {
        ConsoleNotifier { enabled }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, subject: &str, body: &str) -> NotifyOutcome {
        if !self.enabled {
            return NotifyOutcome::failed("notifications disabled");
        }
        println!("[NOTIFICATION] {}", subject);
        for line in body.lines() {
            println!("  {}", line);
        }
        NotifyOutcome::delivered("printed to console")
    }
}

/// Hands alerts to the desktop notification daemon by spawning
/// `notify-send` detached, so a wedged daemon cannot stall the
/// sampling loop.
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        DesktopNotifier { enabled }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn send(&self, subject: &str, body: &str) -> NotifyOutcome {
        if !self.enabled {
            return NotifyOutcome::failed("notifications disabled");
        }
        match Command::new("notify-send").arg(subject).arg(body).spawn() {
            Ok(child) => {
                debug!("notify-send spawned (pid {:?})", child.id());
                NotifyOutcome::delivered("launched desktop notifier")
            }
            Err(err) => NotifyOutcome::failed(format!("desktop notifier unavailable: {}", err)),
        }
    }
}
