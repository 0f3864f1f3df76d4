// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! UI module - one-way notifications to the map, status card, modal and audio
//!
//! The core never reads state back from a [`Presenter`].

mod console;
#[cfg(test)]
pub(crate) mod recording;

pub use console::ConsolePresenter;

use serde::{Deserialize, Serialize};

use crate::detection::{HazardRecord, HazardSeverity, SecurityLevel};
use crate::emergency::ContactInfo;

/// Audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// First successful position fix
    GpsLock,
    /// Emergency alarm, played on loop
    Alarm,
}

impl Cue {
    pub fn file_name(&self) -> &'static str {
        match self {
            Cue::GpsLock => "gps_lock.mp3",
            Cue::Alarm => "alarm.mp3",
        }
    }
}

/// Display tone for a single hazard entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardTone {
    Danger,
    Warning,
    Info,
    Neutral,
}

impl HazardTone {
    pub fn for_severity(severity: HazardSeverity) -> Self {
        match severity {
            HazardSeverity::Extreme | HazardSeverity::Severe => HazardTone::Danger,
            HazardSeverity::Moderate => HazardTone::Warning,
            HazardSeverity::Minor => HazardTone::Info,
            HazardSeverity::Unknown => HazardTone::Neutral,
        }
    }
}

/// Contents of the hazard list panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HazardListView {
    Loading,
    Failed(String),
    Alerts(Vec<HazardRecord>),
}

impl HazardListView {
    pub const EMPTY_TEXT: &'static str = "No active alerts in your area.";
    pub const LOADING_TEXT: &'static str = "Looking for alerts...";

    /// Rendered lines, one per alert, each with its tone
    pub fn lines(&self) -> Vec<(HazardTone, String)> {
        match self {
            HazardListView::Loading => vec![(HazardTone::Neutral, Self::LOADING_TEXT.to_string())],
            HazardListView::Failed(message) => vec![(HazardTone::Neutral, message.clone())],
            HazardListView::Alerts(alerts) if alerts.is_empty() => {
                vec![(HazardTone::Neutral, Self::EMPTY_TEXT.to_string())]
            }
            HazardListView::Alerts(alerts) => alerts
                .iter()
                .map(|a| (HazardTone::for_severity(a.severity), a.event_label.clone()))
                .collect(),
        }
    }
}

/// Receiver of every user-visible side effect
pub trait Presenter: Send + Sync {
    /// Status card: level indicator and reason text
    fn set_status(&self, status: &SecurityLevel);

    fn set_hazard_list(&self, view: &HazardListView);

    /// Move the user marker and coordinates readout
    fn set_marker_position(&self, latitude: f64, longitude: f64);

    fn show_emergency(&self, reason: &str);

    fn hide_emergency(&self);

    fn set_contact_info(&self, contact: &ContactInfo);

    fn start_looping_alarm(&self);

    fn stop_alarm(&self);

    /// One-shot audio cue
    fn play_cue(&self, cue: Cue);

    fn set_sos_button(&self, engaged: bool);

    /// Replace the map loader with a geolocation error
    fn show_location_error(&self, message: &str);

    fn show_security_code(&self, code: &str);
}
