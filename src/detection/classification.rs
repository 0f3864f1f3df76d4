// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Hazard severity classification

use serde::{Deserialize, Serialize};

use super::{HazardStatus, Level};

pub const REASON_HAZARD_UNKNOWN: &str = "hazard status unknown";
pub const REASON_NO_HAZARDS: &str = "no hazards";
pub const REASON_SEVERE_HAZARD: &str = "imminent danger: extreme or severe hazard alert";
pub const REASON_MODERATE_HAZARD: &str = "active hazard alert";
pub const REASON_MINOR_HAZARD: &str = "caution: minor hazard alert";
pub const REASON_UNRATED_HAZARD: &str = "hazard alerts without rated severity";

/// Severity reported by the hazard feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardSeverity {
    Extreme,
    Severe,
    Moderate,
    Minor,
    Unknown,
}

impl HazardSeverity {
    /// Case-insensitive parse; anything unrecognised is `Unknown`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "extreme" => HazardSeverity::Extreme,
            "severe" => HazardSeverity::Severe,
            "moderate" => HazardSeverity::Moderate,
            "minor" => HazardSeverity::Minor,
            _ => HazardSeverity::Unknown,
        }
    }

    /// Security level contributed by a single record
    pub fn level(self) -> Level {
        match self {
            HazardSeverity::Extreme | HazardSeverity::Severe => Level::Danger,
            HazardSeverity::Moderate | HazardSeverity::Minor => Level::Warning,
            HazardSeverity::Unknown => Level::Safe,
        }
    }

    // Extreme and severe share a rank so the reason stays order-independent.
    fn rank(self) -> u8 {
        match self {
            HazardSeverity::Extreme | HazardSeverity::Severe => 3,
            HazardSeverity::Moderate => 2,
            HazardSeverity::Minor => 1,
            HazardSeverity::Unknown => 0,
        }
    }

    fn reason(self) -> &'static str {
        match self {
            HazardSeverity::Extreme | HazardSeverity::Severe => REASON_SEVERE_HAZARD,
            HazardSeverity::Moderate => REASON_MODERATE_HAZARD,
            HazardSeverity::Minor => REASON_MINOR_HAZARD,
            HazardSeverity::Unknown => REASON_UNRATED_HAZARD,
        }
    }
}

/// One active hazard alert for the user's location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardRecord {
    pub severity: HazardSeverity,
    pub event_label: String,
}

impl HazardRecord {
    pub fn new(severity: HazardSeverity, event_label: impl Into<String>) -> Self {
        Self {
            severity,
            event_label: event_label.into(),
        }
    }
}

/// Reduce a hazard set to one level.
///
/// `None` or `feed_failed` means the feed could not be read and yields
/// `calculating`; an empty set is `safe`.
pub fn classify(hazards: Option<&[HazardRecord]>, feed_failed: bool) -> HazardStatus {
    let hazards = match hazards {
        Some(h) if !feed_failed => h,
        _ => return HazardStatus::new(Level::Calculating, REASON_HAZARD_UNKNOWN),
    };

    let worst = hazards
        .iter()
        .map(|h| h.severity)
        .max_by_key(|s| s.rank());

    match worst {
        None => HazardStatus::new(Level::Safe, REASON_NO_HAZARDS),
        Some(severity) => HazardStatus::new(severity.level(), severity.reason()),
    }
}
