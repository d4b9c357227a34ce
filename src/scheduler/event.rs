//! Observation events emitted after each recorded probe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::HostSnapshot;

/// One recorded probe: the verdict plus the statistics right after it was
/// folded in. Delivered to every sink and broadcast subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub host: String,
    pub timestamp: DateTime<Utc>,
    pub up: bool,
    pub latency_ms: Option<f64>,
    pub stats: HostSnapshot,
}
