//! Detection module - movement anomalies, hazard severity and priority fusion

mod movement;
mod classification;
mod fusion;

pub use movement::*;
pub use classification::*;
pub use fusion::*;

use std::fmt;
use serde::{Deserialize, Serialize};

/// Ordered security level shared by every source and the aggregate
///
/// Declaration order is the priority order: `Calculating < Safe < Warning < Danger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Calculating,
    Safe,
    Warning,
    Danger,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Calculating => "calculating",
            Level::Safe => "safe",
            Level::Warning => "warning",
            Level::Danger => "danger",
        }
    }

    /// Headline shown on the status card
    pub fn label(&self) -> &'static str {
        match self {
            Level::Calculating => "Status unknown",
            Level::Safe => "Safe",
            Level::Warning => "Caution",
            Level::Danger => "Danger",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A level together with the human-readable reason behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityLevel {
    pub level: Level,
    pub reason: String,
}

impl SecurityLevel {
    pub fn new(level: Level, reason: impl Into<String>) -> Self {
        Self {
            level,
            reason: reason.into(),
        }
    }

    pub fn is_danger(&self) -> bool {
        self.level == Level::Danger
    }
}

/// Output of the movement detector
pub type MovementStatus = SecurityLevel;

/// Output of the hazard classifier
pub type HazardStatus = SecurityLevel;
