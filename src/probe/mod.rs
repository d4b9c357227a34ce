//! Host reachability probes.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

mod ping;

pub use ping::PingProber;

/// Default per-probe timeout.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to run ping: {0}")]
    Launch(String),
}

/// Result of probing one host once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeOutcome {
    pub up: bool,
    /// Round-trip latency. `None` when the host was down or the ping tool's
    /// output carried no parsable time.
    pub latency_ms: Option<f64>,
}

impl ProbeOutcome {
    pub fn up(latency_ms: Option<f64>) -> Self {
        Self {
            up: true,
            latency_ms,
        }
    }

    pub fn down() -> Self {
        Self {
            up: false,
            latency_ms: None,
        }
    }
}

/// A single-host reachability check.
///
/// Implementations never surface errors to callers: anything that prevents a
/// verdict (timeout, missing ping binary) is reported as the host being down,
/// so the sweep loop always gets an outcome to record.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, host: &str) -> ProbeOutcome;
}
