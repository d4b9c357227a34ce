//! The monitored host set and its statistics store.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::probe::ProbeOutcome;
use crate::stats::{HostSnapshot, HostStats};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("host not found: {0}")]
    HostNotFound(String),
}

/// One host paired with its statistics, as used by the summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostReport {
    pub host: String,
    pub stats: HostSnapshot,
}

struct Inner {
    /// Hosts in insertion order; reports and sweeps follow this order.
    order: Vec<String>,
    stats: HashMap<String, HostStats>,
}

/// Shared, mutex-scoped registry of monitored hosts.
///
/// All operations take `&self` and lock internally, so the registry can sit
/// behind an `Arc` and be mutated from the sweep loop while the control
/// surface adds and removes hosts.
pub struct HostRegistry {
    inner: Mutex<Inner>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                order: Vec::new(),
                stats: HashMap::new(),
            }),
        }
    }

    /// Register a host. Whitespace is trimmed; empty names and duplicates
    /// are rejected. Returns whether the host was actually added.
    pub fn add(&self, host: &str) -> bool {
        let host = host.trim();
        if host.is_empty() {
            return false;
        }

        let mut inner = self.inner.lock().unwrap();
        if inner.stats.contains_key(host) {
            return false;
        }
        inner.order.push(host.to_string());
        inner.stats.insert(host.to_string(), HostStats::new());
        true
    }

    /// Remove a host and discard its statistics. Returns whether the host
    /// was present.
    pub fn remove(&self, host: &str) -> bool {
        let host = host.trim();
        let mut inner = self.inner.lock().unwrap();
        if inner.stats.remove(host).is_none() {
            return false;
        }
        inner.order.retain(|h| h != host);
        true
    }

    /// Hosts in registration order.
    pub fn hosts(&self) -> Vec<String> {
        self.inner.lock().unwrap().order.clone()
    }

    pub fn contains(&self, host: &str) -> bool {
        self.inner.lock().unwrap().stats.contains_key(host)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().order.is_empty()
    }

    /// Fold a probe outcome into the host's statistics and return the
    /// snapshot taken right after. Returns `None` when the host was removed
    /// since the sweep captured it.
    pub fn record(
        &self,
        host: &str,
        outcome: &ProbeOutcome,
        now: DateTime<Utc>,
    ) -> Option<HostSnapshot> {
        let mut inner = self.inner.lock().unwrap();
        let stats = inner.stats.get_mut(host)?;
        stats.record(outcome.up, outcome.latency_ms, now);
        Some(stats.snapshot())
    }

    /// Current snapshot for a single host.
    pub fn stats_of(&self, host: &str) -> Result<HostSnapshot, RegistryError> {
        let inner = self.inner.lock().unwrap();
        inner
            .stats
            .get(host)
            .map(HostStats::snapshot)
            .ok_or_else(|| RegistryError::HostNotFound(host.to_string()))
    }

    /// Snapshots for every host, in registration order.
    pub fn reports(&self) -> Vec<HostReport> {
        let inner = self.inner.lock().unwrap();
        inner
            .order
            .iter()
            .filter_map(|host| {
                inner.stats.get(host).map(|stats| HostReport {
                    host: host.clone(),
                    stats: stats.snapshot(),
                })
            })
            .collect()
    }
}

impl Default for HostRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_add_trims_and_rejects_empty() {
        let registry = HostRegistry::new();
        assert!(registry.add("  example.com  "));
        assert!(registry.contains("example.com"));
        assert!(!registry.add(""));
        assert!(!registry.add("   "));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_rejects_duplicates_and_keeps_statistics() {
        let registry = HostRegistry::new();
        assert!(registry.add("example.com"));
        registry.record("example.com", &ProbeOutcome::up(Some(10.0)), now());

        assert!(!registry.add("example.com"));
        assert!(!registry.add("  example.com"));
        assert_eq!(registry.len(), 1);

        // The rejected add must not reset what was already accumulated.
        let snap = registry.stats_of("example.com").unwrap();
        assert_eq!(snap.total_checks, 1);
        assert_eq!(snap.min_latency_ms, Some(10.0));
    }

    #[test]
    fn test_hosts_keep_registration_order() {
        let registry = HostRegistry::new();
        registry.add("c.example");
        registry.add("a.example");
        registry.add("b.example");
        assert_eq!(registry.hosts(), vec!["c.example", "a.example", "b.example"]);
    }

    #[test]
    fn test_remove_discards_statistics() {
        let registry = HostRegistry::new();
        registry.add("example.com");
        registry.record("example.com", &ProbeOutcome::up(Some(10.0)), now());

        assert!(registry.remove("example.com"));
        assert!(!registry.contains("example.com"));
        assert!(registry.stats_of("example.com").is_err());

        // Re-adding starts from zero.
        registry.add("example.com");
        let snap = registry.stats_of("example.com").unwrap();
        assert_eq!(snap.total_checks, 0);
    }

    #[test]
    fn test_remove_unknown_host_is_false() {
        let registry = HostRegistry::new();
        assert!(!registry.remove("nowhere.example"));
    }

    #[test]
    fn test_record_returns_snapshot() {
        let registry = HostRegistry::new();
        registry.add("example.com");

        let snap = registry
            .record("example.com", &ProbeOutcome::up(Some(25.0)), now())
            .unwrap();
        assert_eq!(snap.total_checks, 1);
        assert_eq!(snap.uptime_percent, 100.0);
        assert_eq!(snap.min_latency_ms, Some(25.0));
    }

    #[test]
    fn test_record_for_removed_host_is_none() {
        let registry = HostRegistry::new();
        registry.add("example.com");
        registry.remove("example.com");
        assert!(registry
            .record("example.com", &ProbeOutcome::down(), now())
            .is_none());
    }

    #[test]
    fn test_stats_of_unknown_host() {
        let registry = HostRegistry::new();
        let err = registry.stats_of("missing.example").unwrap_err();
        assert!(err.to_string().contains("missing.example"));
    }

    #[test]
    fn test_reports_follow_registration_order() {
        let registry = HostRegistry::new();
        registry.add("b.example");
        registry.add("a.example");
        registry.record("a.example", &ProbeOutcome::down(), now());

        let reports = registry.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].host, "b.example");
        assert_eq!(reports[1].host, "a.example");
        assert!(reports[1].stats.currently_down);
    }
}
