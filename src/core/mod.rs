//! Core module - the evaluation pipeline and its event channel

mod engine;
mod scheduler;
mod event_bus;

pub use engine::{Monitor, REASON_LOCATION_ERROR, REASON_WAITING_FOR_FIX, LOCATION_REQUIRED_TEXT};
pub use scheduler::Scheduler;
pub use event_bus::{EventBus, MonitorEvent};

use serde::{Deserialize, Serialize};

/// Running counters of the monitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStats {
    pub fixes: u64,
    pub position_errors: u64,
    pub evaluations: u64,
    pub hazard_failures: u64,
    pub uncovered_lookups: u64,
    pub activations: u64,
}
