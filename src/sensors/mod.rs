//! Sensor module - position sources and track simulation

mod manager;
mod traits;
mod simulator;

pub use manager::{PositionManager, SourceHealth, DEFAULT_FIX_TIMEOUT, DEFAULT_FORCED_TIMEOUT};
pub use traits::{GeolocationError, PositionSource, Sample};
pub use simulator::{TrackPoint, TrackSimulator};
