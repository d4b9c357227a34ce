//! Observation formatting and delivery.

mod format;
mod sink;

pub use format::{format_observation, format_summary};
pub use sink::{ConsoleSink, LogFileSink};

use thiserror::Error;

use crate::scheduler::Observation;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for observation lines. Emission is synchronous and called
/// from the delivery task, one observation at a time.
pub trait Sink: Send + Sync {
    fn emit(&self, event: &Observation) -> Result<(), SinkError>;
}
