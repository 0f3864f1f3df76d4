//! Emergency module - contact resolution and the emergency lifecycle

mod contacts;
mod lifecycle;

pub use contacts::*;
pub use lifecycle::*;

use serde::{Deserialize, Serialize};

/// Externally visible emergency bit and the reason that raised it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyState {
    pub is_triggered: bool,
    pub reason: String,
}
