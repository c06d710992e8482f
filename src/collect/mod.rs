mod ping;
mod system;

pub use ping::PingLatencyProbe;
pub use system::SysinfoMetricsSource;
