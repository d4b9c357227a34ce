//! upwatch - continuous host-availability monitor.
//!
//! Probes every registered host on a fixed interval with the system ping
//! tool, prints one observation line per check, appends the same line to a
//! log file, and prints a per-host summary on Ctrl-C.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use upwatch::config::{load_hosts_file, MonitorConfig};
use upwatch::probe::PingProber;
use upwatch::registry::HostRegistry;
use upwatch::report::{format_summary, ConsoleSink, LogFileSink, Sink};
use upwatch::scheduler::Monitor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("upwatch=info".parse()?))
        .init();

    // Load configuration
    let cfg = MonitorConfig::load();

    // Collect hosts from the optional hosts file, then the command line
    let registry = Arc::new(HostRegistry::new());
    if let Some(path) = &cfg.hosts_file {
        match load_hosts_file(path) {
            Ok(hosts) => {
                for host in hosts {
                    add_host(&registry, &host);
                }
            }
            Err(e) => tracing::warn!("Config: {}", e),
        }
    }
    for host in std::env::args().skip(1) {
        add_host(&registry, &host);
    }
    if registry.is_empty() {
        return Err("no hosts to monitor; pass them as arguments or via UPWATCH_HOSTS_FILE".into());
    }

    // Observation sinks: terminal always, log file when it can be opened
    let mut sinks: Vec<Box<dyn Sink>> = vec![Box::new(ConsoleSink)];
    match LogFileSink::open(&cfg.log_path) {
        Ok(sink) => {
            sinks.push(Box::new(sink));
            tracing::info!("Appending observations to {}", cfg.log_path);
        }
        Err(e) => tracing::warn!("Observation log disabled: {}", e),
    }

    // Start sweeping
    let prober = Arc::new(PingProber::new(cfg.ping_timeout()));
    let monitor = Monitor::new(registry.clone(), prober, sinks);
    monitor.start(cfg.interval()).await?;
    tracing::info!(
        "Monitoring {} hosts every {:.1}s, Ctrl-C to stop",
        registry.len(),
        cfg.interval_secs
    );

    tokio::signal::ctrl_c().await?;

    monitor.stop().await;
    println!("\n{}", format_summary(&registry));

    Ok(())
}

fn add_host(registry: &HostRegistry, host: &str) {
    if registry.add(host) {
        tracing::info!("Monitoring {}", host);
    } else {
        tracing::warn!("Skipping host {:?} (empty or duplicate)", host);
    }
}
