//! Manual SOS override flag

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Shared handle to the process-wide manual SOS flag.
///
/// Clones observe the same flag, so the detector, the emergency lifecycle and
/// the button handler each hold their own handle instead of a global.
#[derive(Debug, Clone, Default)]
pub struct ManualSos {
    engaged: Arc<AtomicBool>,
}

impl ManualSos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::SeqCst)
    }

    pub fn engage(&self) {
        self.set(true);
    }

    pub fn set(&self, engaged: bool) {
        let previous = self.engaged.swap(engaged, Ordering::SeqCst);
        if previous != engaged {
            info!(engaged, "manual SOS changed");
        }
    }

    /// Flip the flag and return the new value
    pub fn toggle(&self) -> bool {
        let engaged = !self.engaged.fetch_xor(true, Ordering::SeqCst);
        info!(engaged, "manual SOS toggled");
        engaged
    }

    /// Clear the flag, returning whether it was engaged
    pub fn clear(&self) -> bool {
        let was = self.engaged.swap(false, Ordering::SeqCst);
        if was {
            info!("manual SOS cleared");
        }
        was
    }
}
