//! Configuration loaded from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

/// Monitor configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Seconds between sweeps (default: 1.0)
    pub interval_secs: f64,
    /// Seconds to wait for each ping (default: 5.0)
    pub ping_timeout_secs: f64,
    /// Path of the append-only observation log (default: "upwatch.log")
    pub log_path: String,
    /// Optional JSON file with an initial host list (default: none)
    pub hosts_file: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1.0,
            ping_timeout_secs: 5.0,
            log_path: "upwatch.log".to_string(),
            hosts_file: None,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `UPWATCH_INTERVAL`: seconds between sweeps (default: 1.0)
    /// - `UPWATCH_PING_TIMEOUT`: per-ping timeout in seconds (default: 5.0)
    /// - `UPWATCH_LOG_PATH`: observation log path (default: "upwatch.log")
    /// - `UPWATCH_HOSTS_FILE`: JSON array of hosts to register at startup
    ///
    /// Invalid or unrepresentable duration values are logged and ignored.
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Some(secs) = read_secs("UPWATCH_INTERVAL") {
            cfg.interval_secs = secs;
        }
        if let Some(secs) = read_secs("UPWATCH_PING_TIMEOUT") {
            cfg.ping_timeout_secs = secs;
        }
        if let Ok(path) = env::var("UPWATCH_LOG_PATH") {
            cfg.log_path = path;
        }
        if let Ok(path) = env::var("UPWATCH_HOSTS_FILE") {
            cfg.hosts_file = Some(path);
        }

        cfg
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.ping_timeout_secs)
    }
}

fn read_secs(var: &str) -> Option<f64> {
    let raw = env::var(var).ok()?;
    match parse_secs(&raw) {
        Some(secs) => Some(secs),
        None => {
            tracing::warn!("Config: ignoring invalid {} value {:?}", var, raw);
            None
        }
    }
}

/// Accepts positive seconds that fit in a `Duration`, rejects everything
/// else. The representability check keeps the later `Duration` conversion
/// from aborting on absurd values.
fn parse_secs(raw: &str) -> Option<f64> {
    let secs: f64 = raw.trim().parse().ok()?;
    if secs > 0.0 && Duration::try_from_secs_f64(secs).is_ok() {
        Some(secs)
    } else {
        None
    }
}

/// Read a JSON array of host names, e.g. `["example.com", "10.0.0.1"]`.
pub fn load_hosts_file(path: &str) -> Result<Vec<String>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read hosts file {}: {}", path, e))?;
    let hosts: Vec<String> = serde_json::from_str(&contents)
        .map_err(|e| format!("invalid hosts file {}: {}", path, e))?;
    Ok(hosts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.interval_secs, 1.0);
        assert_eq!(cfg.ping_timeout_secs, 5.0);
        assert_eq!(cfg.log_path, "upwatch.log");
        assert_eq!(cfg.hosts_file, None);
    }

    #[test]
    fn test_duration_accessors() {
        let cfg = MonitorConfig {
            interval_secs: 0.25,
            ..Default::default()
        };
        assert_eq!(cfg.interval(), Duration::from_millis(250));
        assert_eq!(cfg.ping_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("1.5"), Some(1.5));
        assert_eq!(parse_secs(" 2 "), Some(2.0));
        assert_eq!(parse_secs("0"), None);
        assert_eq!(parse_secs("-1"), None);
        assert_eq!(parse_secs("inf"), None);
        assert_eq!(parse_secs("NaN"), None);
        assert_eq!(parse_secs("soon"), None);
    }

    #[test]
    fn test_parse_secs_rejects_unrepresentable_durations() {
        // Finite but beyond what a Duration can hold; accepting these would
        // abort later in interval()/ping_timeout().
        assert_eq!(parse_secs("1e20"), None);
        assert_eq!(parse_secs("1e300"), None);

        // Large but representable values stay accepted and convert cleanly.
        let cfg = MonitorConfig {
            interval_secs: parse_secs("1e18").unwrap(),
            ..Default::default()
        };
        assert_eq!(cfg.interval(), Duration::from_secs_f64(1e18));
    }

    #[test]
    fn test_load_hosts_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"["example.com", "10.0.0.1"]"#).unwrap();

        let hosts = load_hosts_file(path.to_str().unwrap()).unwrap();
        assert_eq!(hosts, vec!["example.com", "10.0.0.1"]);
    }

    #[test]
    fn test_load_hosts_file_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "example.com").unwrap();

        let err = load_hosts_file(path.to_str().unwrap()).unwrap_err();
        assert!(err.contains("invalid hosts file"));
    }

    #[test]
    fn test_load_hosts_file_missing() {
        let err = load_hosts_file("/nonexistent/hosts.json").unwrap_err();
        assert!(err.contains("failed to read hosts file"));
    }
}
