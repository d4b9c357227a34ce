//! Built-in observation sinks.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use super::{format_observation, Sink, SinkError};
use crate::scheduler::Observation;

/// Appends one formatted line per observation to a log file. The file is
/// created on first open and never truncated, so history accumulates across
/// runs.
pub struct LogFileSink {
    file: Mutex<File>,
}

impl LogFileSink {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl Sink for LogFileSink {
    fn emit(&self, event: &Observation) -> Result<(), SinkError> {
        let mut file = self.file.lock().unwrap();
        writeln!(file, "{}", format_observation(event))?;
        Ok(())
    }
}

/// Prints each observation line to stdout.
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn emit(&self, event: &Observation) -> Result<(), SinkError> {
        println!("{}", format_observation(event));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeOutcome;
    use crate::registry::HostRegistry;
    use chrono::{TimeZone, Utc};

    fn sample_observation() -> Observation {
        let registry = HostRegistry::new();
        registry.add("example.com");
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let stats = registry
            .record("example.com", &ProbeOutcome::up(Some(10.0)), now)
            .unwrap();
        Observation {
            host: "example.com".to_string(),
            timestamp: now,
            up: true,
            latency_ms: Some(10.0),
            stats,
        }
    }

    #[test]
    fn test_log_file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.log");

        let sink = LogFileSink::open(&path).unwrap();
        sink.emit(&sample_observation()).unwrap();
        sink.emit(&sample_observation()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[2024-01-01 12:00:00] example.com is UP"));
    }

    #[test]
    fn test_log_file_sink_does_not_truncate_on_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.log");

        {
            let sink = LogFileSink::open(&path).unwrap();
            sink.emit(&sample_observation()).unwrap();
        }
        {
            let sink = LogFileSink::open(&path).unwrap();
            sink.emit(&sample_observation()).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_log_file_sink_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("monitor.log");
        assert!(LogFileSink::open(&path).is_err());
    }
}
