//! Per-host statistics state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running statistics for one monitored host.
///
/// Every probe outcome goes through [`HostStats::record`]; the clock is
/// caller-supplied so transitions are deterministic under test. A host starts
/// in an unknown state: the first observation moves it to up or down, and a
/// first-observation down opens a downtime episode like any other down-edge.
#[derive(Debug, Clone, Default)]
pub struct HostStats {
    total_checks: u64,
    up_count: u64,
    down_count: u64,
    latency_sum_ms: f64,
    latency_samples: u64,
    min_latency_ms: Option<f64>,
    max_latency_ms: Option<f64>,
    downtime_episodes: u64,
    longest_downtime_secs: f64,
    currently_down: bool,
    down_since: Option<DateTime<Utc>>,
}

impl HostStats {
    /// Fresh statistics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one probe outcome into the aggregate.
    ///
    /// Latency is only recorded on up observations that carried a value; an
    /// up observation without one still counts toward the uptime ratio. The
    /// downtime episode counter moves only on a down-edge, and the longest
    /// downtime only when an episode closes on the next up observation.
    pub fn record(&mut self, up: bool, latency_ms: Option<f64>, now: DateTime<Utc>) {
        self.total_checks += 1;

        if up {
            self.up_count += 1;
            if let Some(since) = self.down_since.take() {
                let elapsed = (now - since).num_milliseconds() as f64 / 1000.0;
                if elapsed > self.longest_downtime_secs {
                    self.longest_downtime_secs = elapsed;
                }
            }
            self.currently_down = false;
            if let Some(ms) = latency_ms {
                self.latency_sum_ms += ms;
                self.latency_samples += 1;
                self.min_latency_ms = Some(self.min_latency_ms.map_or(ms, |m| m.min(ms)));
                self.max_latency_ms = Some(self.max_latency_ms.map_or(ms, |m| m.max(ms)));
            }
        } else {
            self.down_count += 1;
            if !self.currently_down {
                self.downtime_episodes += 1;
                self.down_since = Some(now);
                self.currently_down = true;
            }
        }
    }

    /// Uptime ratio in percent; 0.0 before the first check.
    pub fn uptime_percent(&self) -> f64 {
        if self.total_checks == 0 {
            0.0
        } else {
            100.0 * self.up_count as f64 / self.total_checks as f64
        }
    }

    /// Mean latency over all sampled checks; 0.0 before the first sample.
    pub fn avg_latency_ms(&self) -> f64 {
        if self.latency_samples == 0 {
            0.0
        } else {
            self.latency_sum_ms / self.latency_samples as f64
        }
    }

    /// Immutable copy of the raw counters plus the derived values.
    pub fn snapshot(&self) -> HostSnapshot {
        HostSnapshot {
            total_checks: self.total_checks,
            up_count: self.up_count,
            down_count: self.down_count,
            uptime_percent: self.uptime_percent(),
            avg_latency_ms: self.avg_latency_ms(),
            min_latency_ms: self.min_latency_ms,
            max_latency_ms: self.max_latency_ms,
            downtime_episodes: self.downtime_episodes,
            longest_downtime_secs: self.longest_downtime_secs,
            currently_down: self.currently_down,
        }
    }
}

/// Point-in-time view of one host's statistics, taken immediately after a
/// recording step and embedded in every observation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub total_checks: u64,
    pub up_count: u64,
    pub down_count: u64,
    pub uptime_percent: f64,
    pub avg_latency_ms: f64,
    pub min_latency_ms: Option<f64>,
    pub max_latency_ms: Option<f64>,
    pub downtime_episodes: u64,
    pub longest_downtime_secs: f64,
    pub currently_down: bool,
}
