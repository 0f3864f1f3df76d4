// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Headless presenter that renders notifications as log events

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info, warn};

use super::{Cue, HazardListView, HazardTone, Presenter};
use crate::detection::{Level, SecurityLevel};
use crate::emergency::ContactInfo;

/// Presenter for terminal runs
#[derive(Debug, Default)]
pub struct ConsolePresenter {
    alarm_playing: AtomicBool,
    modal_open: AtomicBool,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alarm_playing(&self) -> bool {
        self.alarm_playing.load(Ordering::Relaxed)
    }
}

impl Presenter for ConsolePresenter {
    fn set_status(&self, status: &SecurityLevel) {
        match status.level {
            Level::Danger => warn!("🔴 {}: {}", status.level.label(), status.reason),
            Level::Warning => warn!("🟠 {}: {}", status.level.label(), status.reason),
            Level::Safe => info!("🟢 {}: {}", status.level.label(), status.reason),
            Level::Calculating => info!("⚪ {}: {}", status.level.label(), status.reason),
        }
    }

    fn set_hazard_list(&self, view: &HazardListView) {
        if matches!(view, HazardListView::Loading) {
            debug!("{}", HazardListView::LOADING_TEXT);
            return;
        }
        for (tone, line) in view.lines() {
            match tone {
                HazardTone::Danger | HazardTone::Warning => warn!(?tone, "hazard: {}", line),
                _ => info!(?tone, "hazard: {}", line),
            }
        }
    }

    fn set_marker_position(&self, latitude: f64, longitude: f64) {
        info!("📍 {:.4}, {:.4}", latitude, longitude);
    }

    fn show_emergency(&self, reason: &str) {
        self.modal_open.store(true, Ordering::Relaxed);
        error!("🚨 EMERGENCY: {}", reason);
        info!("   Type 'dismiss' to cancel the emergency");
    }

    fn hide_emergency(&self) {
        if self.modal_open.swap(false, Ordering::Relaxed) {
            info!("Emergency dismissed");
        }
    }

    fn set_contact_info(&self, contact: &ContactInfo) {
        warn!(
            "📞 Emergency number for {}: {} ({})",
            contact.country_name,
            contact.number,
            contact.dial_uri()
        );
    }

    fn start_looping_alarm(&self) {
        if !self.alarm_playing.swap(true, Ordering::Relaxed) {
            warn!("🔊 Alarm started ({}, looping)", Cue::Alarm.file_name());
        }
    }

    fn stop_alarm(&self) {
        if self.alarm_playing.swap(false, Ordering::Relaxed) {
            info!("🔇 Alarm stopped");
        }
    }

    fn play_cue(&self, cue: Cue) {
        debug!("♪ {}", cue.file_name());
        if cue == Cue::GpsLock {
            info!("GPS lock acquired");
        }
    }

    fn set_sos_button(&self, engaged: bool) {
        if engaged {
            warn!("SOS engaged (type 'sos' again to cancel)");
        } else {
            info!("SOS released");
        }
    }

    fn show_location_error(&self, message: &str) {
        error!("Geolocation error: {}", message);
    }

    fn show_security_code(&self, code: &str) {
        info!("🪪 Citizen security code: {}", code);
    }
}
