//! The sweep loop that drives probing and observation delivery.

mod event;

pub use event::Observation;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::probe::Prober;
use crate::registry::HostRegistry;
use crate::report::Sink;

/// Smallest accepted sweep interval.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Capacity of the queue between the sweep loop and the delivery task.
const EVENT_BUFFER: usize = 256;

/// Capacity of the broadcast channel feeding external subscribers.
const SUBSCRIBER_BUFFER: usize = 256;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("probe interval {0:?} is below the 100 ms minimum")]
    IntervalTooShort(Duration),
    #[error("no hosts registered")]
    NoHosts,
}

#[derive(Default)]
struct RunState {
    stop_tx: Option<broadcast::Sender<()>>,
    loop_handle: Option<JoinHandle<()>>,
    dispatch_handle: Option<JoinHandle<()>>,
}

/// The monitor sweeps every registered host once per interval, records each
/// outcome and hands the resulting observation to the delivery task, which
/// feeds the sinks and the broadcast subscribers.
///
/// Probes within a sweep run sequentially in registration order, so one slow
/// host delays the rest of its sweep but observations stay ordered per host.
///
/// The run state sits behind an async mutex that `start`/`stop` hold for the
/// whole transition, so callers racing each other serialize: a `stop` only
/// returns once the loop is joined, whichever caller got there first.
pub struct Monitor {
    registry: Arc<HostRegistry>,
    prober: Arc<dyn Prober>,
    sinks: Arc<Vec<Box<dyn Sink>>>,
    events_tx: broadcast::Sender<Observation>,
    state: Mutex<RunState>,
}

impl Monitor {
    pub fn new(
        registry: Arc<HostRegistry>,
        prober: Arc<dyn Prober>,
        sinks: Vec<Box<dyn Sink>>,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(SUBSCRIBER_BUFFER);
        Self {
            registry,
            prober,
            sinks: Arc::new(sinks),
            events_tx,
            state: Mutex::new(RunState::default()),
        }
    }

    /// Receive a copy of every observation. Slow subscribers lag and miss
    /// events rather than stalling the monitor. The subscription survives
    /// stop/start cycles.
    pub fn subscribe(&self) -> broadcast::Receiver<Observation> {
        self.events_tx.subscribe()
    }

    /// Waits out any in-progress start/stop transition before answering.
    pub async fn is_running(&self) -> bool {
        self.state.lock().await.stop_tx.is_some()
    }

    /// Launch the sweep loop and the delivery task. Starting while already
    /// running is a no-op; the loop keeps the interval it was started with.
    /// A start racing a `stop` waits until the old loop is fully joined.
    pub async fn start(&self, interval: Duration) -> Result<(), MonitorError> {
        if interval < MIN_INTERVAL {
            return Err(MonitorError::IntervalTooShort(interval));
        }
        if self.registry.is_empty() {
            return Err(MonitorError::NoHosts);
        }

        let mut state = self.state.lock().await;
        if state.stop_tx.is_some() {
            tracing::warn!("Monitor: already running");
            return Ok(());
        }

        let (stop_tx, stop_rx) = broadcast::channel(1);
        let (obs_tx, obs_rx) = mpsc::channel(EVENT_BUFFER);

        state.dispatch_handle = Some(tokio::spawn(run_dispatcher(
            obs_rx,
            self.sinks.clone(),
            self.events_tx.clone(),
        )));
        state.loop_handle = Some(tokio::spawn(run_sweep_loop(
            interval,
            self.registry.clone(),
            self.prober.clone(),
            obs_tx,
            stop_rx,
        )));
        state.stop_tx = Some(stop_tx);

        tracing::info!(
            "Monitor: started, sweeping {} hosts every {:?}",
            self.registry.len(),
            interval
        );
        Ok(())
    }

    /// Signal the sweep loop to stop and wait for both tasks to finish.
    /// After this returns no further statistics are recorded; that holds for
    /// every caller, since the state lock is held until the tasks are joined
    /// and a concurrent `stop` blocks on it before seeing the idle state.
    /// Stopping an idle monitor is a no-op.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        let stop_tx = match state.stop_tx.take() {
            Some(tx) => tx,
            None => {
                tracing::debug!("Monitor: stop requested while idle");
                return;
            }
        };

        let _ = stop_tx.send(());

        if let Some(handle) = state.loop_handle.take() {
            if let Err(e) = handle.await {
                tracing::error!("Monitor: sweep loop task failed: {}", e);
            }
        }
        // The sweep loop owned the queue sender, so the delivery task drains
        // and exits once the loop is done.
        if let Some(handle) = state.dispatch_handle.take() {
            if let Err(e) = handle.await {
                tracing::error!("Monitor: delivery task failed: {}", e);
            }
        }

        tracing::info!("Monitor: stopped");
    }
}

/// Probe every registered host, record outcomes, queue observations, then
/// wait out the interval. The stop signal is honored between hosts inside a
/// sweep as well as during the interval wait.
async fn run_sweep_loop(
    interval: Duration,
    registry: Arc<HostRegistry>,
    prober: Arc<dyn Prober>,
    obs_tx: mpsc::Sender<Observation>,
    mut stop_rx: broadcast::Receiver<()>,
) {
    'run: loop {
        let hosts = registry.hosts();
        for host in hosts {
            if stop_rx.try_recv().is_ok() {
                break 'run;
            }
            // Hosts removed after the sweep captured its list are skipped.
            if !registry.contains(&host) {
                continue;
            }

            let outcome = prober.probe(&host).await;
            let now = Utc::now();
            let stats = match registry.record(&host, &outcome, now) {
                Some(stats) => stats,
                None => continue,
            };

            let event = Observation {
                host: host.clone(),
                timestamp: now,
                up: outcome.up,
                latency_ms: outcome.latency_ms,
                stats,
            };
            if obs_tx.try_send(event).is_err() {
                tracing::warn!("Monitor: delivery queue full, dropping observation for {}", host);
            }
        }

        tokio::select! {
            _ = stop_rx.recv() => {
                break 'run;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// Drain queued observations into the sinks and the broadcast channel. A
/// failing sink is logged and skipped so delivery never stalls the sweep.
async fn run_dispatcher(
    mut obs_rx: mpsc::Receiver<Observation>,
    sinks: Arc<Vec<Box<dyn Sink>>>,
    events_tx: broadcast::Sender<Observation>,
) {
    while let Some(event) = obs_rx.recv().await {
        for sink in sinks.iter() {
            if let Err(e) = sink.emit(&event) {
                tracing::warn!("Monitor: sink write failed for {}: {}", event.host, e);
            }
        }
        // Send fails only when nobody is subscribed.
        let _ = events_tx.send(event);
    }
}
