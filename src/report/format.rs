//! Render observations and summaries as fixed-layout text.

use crate::registry::{HostRegistry, HostReport};
use crate::scheduler::Observation;
use crate::stats::HostSnapshot;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One observation as a single log line:
///
/// `[2024-01-01 12:00:00] example.com is UP | Latency: 12.34 ms | Uptime: 99.8% | Avg Latency: 15.02 ms`
///
/// Latency shows `N/A` when the probe produced no measurement.
pub fn format_observation(event: &Observation) -> String {
    let status = if event.up { "UP" } else { "DOWN" };
    let latency = match event.latency_ms {
        Some(ms) => format!("{:.2} ms", ms),
        None => "N/A".to_string(),
    };

    format!(
        "[{}] {} is {} | Latency: {} | Uptime: {:.1}% | Avg Latency: {:.2} ms",
        event.timestamp.format(TIMESTAMP_FORMAT),
        event.host,
        status,
        latency,
        event.stats.uptime_percent,
        event.stats.avg_latency_ms,
    )
}

/// Multi-host summary block, printed when monitoring ends. Hosts that were
/// never checked are listed in the registry but skipped here.
pub fn format_summary(registry: &HostRegistry) -> String {
    let mut out = String::from("Host Summary:\n");
    out.push_str(&"-".repeat(40));
    out.push('\n');

    for report in registry.reports() {
        if report.stats.total_checks == 0 {
            continue;
        }
        out.push_str(&format_host_block(&report));
    }

    out
}

fn format_host_block(report: &HostReport) -> String {
    let HostSnapshot {
        total_checks,
        uptime_percent,
        currently_down,
        downtime_episodes,
        longest_downtime_secs,
        avg_latency_ms,
        min_latency_ms,
        max_latency_ms,
        ..
    } = report.stats;

    let status = if currently_down { "DOWN" } else { "UP" };

    format!(
        "{}\n  Checks: {}\n  Uptime: {:.1}%\n  Current Status: {}\n  Downtime Count: {}\n  Longest Downtime: {:.1} sec\n  Avg Latency: {:.2} ms\n  Min Latency: {:.2} ms\n  Max Latency: {:.2} ms\n\n",
        report.host,
        total_checks,
        uptime_percent,
        status,
        downtime_episodes,
        longest_downtime_secs,
        avg_latency_ms,
        min_latency_ms.unwrap_or(0.0),
        max_latency_ms.unwrap_or(0.0),
    )
}
