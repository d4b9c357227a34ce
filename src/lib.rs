//! upwatch - continuous host-availability monitoring.
//!
//! This crate provides the core of the upwatch monitor. It can be embedded
//! as a library or run as a standalone binary with the `upwatch` executable.
//!
//! # Architecture
//!
//! - **Probe**: one reachability/latency check of a single host, delegated
//!   to the system ping tool
//! - **Registry**: the ordered host set and its per-host statistics
//! - **Scheduler**: the sweep loop that probes every registered host each
//!   interval and records the outcomes
//! - **Report**: observation/summary formatting and delivery sinks (terminal,
//!   append-only log file, broadcast subscribers)

pub mod config;
pub mod probe;
pub mod registry;
pub mod report;
pub mod scheduler;
pub mod stats;
