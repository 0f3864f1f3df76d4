//! Presenter that records every call, for assertions in tests

use parking_lot::Mutex;

use super::{Cue, HazardListView, Presenter};
use crate::detection::SecurityLevel;
use crate::emergency::ContactInfo;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UiCall {
    Status(SecurityLevel),
    HazardList(HazardListView),
    Marker(f64, f64),
    ShowEmergency(String),
    HideEmergency,
    Contact(ContactInfo),
    StartAlarm,
    StopAlarm,
    Cue(Cue),
    SosButton(bool),
    LocationError(String),
    SecurityCode(String),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingPresenter {
    calls: Mutex<Vec<UiCall>>,
}

impl RecordingPresenter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> Vec<UiCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&UiCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn statuses(&self) -> Vec<SecurityLevel> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                UiCall::Status(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn last_contact(&self) -> Option<ContactInfo> {
        self.calls.lock().iter().rev().find_map(|c| match c {
            UiCall::Contact(info) => Some(info.clone()),
            _ => None,
        })
    }

    fn push(&self, call: UiCall) {
        self.calls.lock().push(call);
    }
}

impl Presenter for RecordingPresenter {
    fn set_status(&self, status: &SecurityLevel) {
        self.push(UiCall::Status(status.clone()));
    }

    fn set_hazard_list(&self, view: &HazardListView) {
        self.push(UiCall::HazardList(view.clone()));
    }

    fn set_marker_position(&self, latitude: f64, longitude: f64) {
        self.push(UiCall::Marker(latitude, longitude));
    }

    fn show_emergency(&self, reason: &str) {
        self.push(UiCall::ShowEmergency(reason.to_string()));
    }

    fn hide_emergency(&self) {
        self.push(UiCall::HideEmergency);
    }

    fn set_contact_info(&self, contact: &ContactInfo) {
        self.push(UiCall::Contact(contact.clone()));
    }

    fn start_looping_alarm(&self) {
        self.push(UiCall::StartAlarm);
    }

    fn stop_alarm(&self) {
        self.push(UiCall::StopAlarm);
    }

    fn play_cue(&self, cue: Cue) {
        self.push(UiCall::Cue(cue));
    }

    fn set_sos_button(&self, engaged: bool) {
        self.push(UiCall::SosButton(engaged));
    }

    fn show_location_error(&self, message: &str) {
        self.push(UiCall::LocationError(message.to_string()));
    }

    fn show_security_code(&self, code: &str) {
        self.push(UiCall::SecurityCode(code.to_string()));
    }
}
