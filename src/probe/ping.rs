//! Reachability probe backed by the system ping tool.

use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tokio::process::Command;

use super::{ProbeError, ProbeOutcome, Prober, DEFAULT_PING_TIMEOUT};

/// Probes a host by launching the platform's `ping` with a single-packet
/// request and a bounded wait.
#[derive(Debug, Clone)]
pub struct PingProber {
    timeout: Duration,
}

impl PingProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn ping_once(&self, host: &str) -> Result<ProbeOutcome, ProbeError> {
        let mut command = Command::new("ping");
        if cfg!(windows) {
            let millis = self.timeout.as_millis().max(1).to_string();
            command.args(["-n", "1", "-w", &millis, host]);
        } else {
            let secs = self.timeout.as_secs().max(1).to_string();
            command.args(["-c", "1", "-W", &secs, host]);
        }
        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // The tool enforces its own wait, but a second bound here covers
        // platforms where the flag caps only part of the exchange.
        let grace = self.timeout + Duration::from_secs(1);
        let output = tokio::time::timeout(grace, command.output())
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
            .map_err(|e| ProbeError::Launch(e.to_string()))?;

        if !output.status.success() {
            return Ok(ProbeOutcome::down());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(ProbeOutcome::up(parse_latency_ms(&stdout)))
    }
}

impl Default for PingProber {
    fn default() -> Self {
        Self::new(DEFAULT_PING_TIMEOUT)
    }
}

#[async_trait::async_trait]
impl Prober for PingProber {
    async fn probe(&self, host: &str) -> ProbeOutcome {
        match self.ping_once(host).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Probe: ping for {} did not complete: {}", host, e);
                ProbeOutcome::down()
            }
        }
    }
}

/// Extract round-trip latency from ping output.
fn parse_latency_ms(output: &str) -> Option<f64> {
    // Per-packet line "time=12.3 ms" / "time<1ms" (Linux, macOS, BSD)
    static RE_UNIX: OnceLock<Regex> = OnceLock::new();
    let re_unix = RE_UNIX.get_or_init(|| Regex::new(r"time[=<](?P<val>[0-9.]+)\s*ms").unwrap());

    if let Some(caps) = re_unix.captures(output) {
        if let Some(val_match) = caps.name("val") {
            if let Ok(ms) = val_match.as_str().parse::<f64>() {
                return Some(ms);
            }
        }
    }

    // Summary line "Average = 12ms" (Windows)
    static RE_WIN: OnceLock<Regex> = OnceLock::new();
    let re_win = RE_WIN.get_or_init(|| Regex::new(r"Average = (?P<val>\d+)ms").unwrap());

    if let Some(caps) = re_win.captures(output) {
        if let Some(val_match) = caps.name("val") {
            if let Ok(ms) = val_match.as_str().parse::<f64>() {
                return Some(ms);
            }
        }
    }

    None
}
