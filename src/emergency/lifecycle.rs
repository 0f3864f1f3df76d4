// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Edge-triggered emergency lifecycle
//!
//! ```text
//!            level == danger
//!   ┌──────┐ ───────────────▶ ┌────────┐
//!   │ Idle │                  │ Active │
//!   └──────┘ ◀─────────────── └────────┘
//!        level != danger / manual dismissal
//! ```
//!
//! Side effects fire on the edges only; staying in `Active` while the level
//! remains `danger` does nothing.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ContactInfo, EmergencyState};
use crate::detection::SecurityLevel;
use crate::security::ManualSos;
use crate::sensors::Sample;
use crate::ui::Presenter;

/// What an input did to the lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// No edge crossed
    Unchanged,
    /// Idle → Active. `lookup` carries the coordinate to resolve a contact for.
    Activated {
        episode: Uuid,
        lookup: Option<(f64, f64)>,
    },
    /// Active → Idle
    Cleared,
}

/// Owner of [`EmergencyState`]
pub struct EmergencyLifecycle {
    state: EmergencyState,
    episode: Option<Uuid>,
    presenter: Arc<dyn Presenter>,
    sos: ManualSos,
    activations: u64,
}

impl EmergencyLifecycle {
    pub fn new(presenter: Arc<dyn Presenter>, sos: ManualSos) -> Self {
        Self {
            state: EmergencyState::default(),
            episode: None,
            presenter,
            sos,
            activations: 0,
        }
    }

    pub fn state(&self) -> &EmergencyState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_triggered
    }

    /// Identifier of the live episode, if any
    pub fn episode(&self) -> Option<Uuid> {
        self.episode
    }

    /// Number of Idle → Active transitions so far
    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Feed the latest aggregate level
    pub fn apply(&mut self, level: &SecurityLevel, sample: Option<&Sample>) -> Transition {
        match (level.is_danger(), self.state.is_triggered) {
            (true, false) => self.activate(&level.reason, sample),
            (false, true) => {
                info!(level = %level.level, "danger resolved, clearing emergency");
                self.clear();
                Transition::Cleared
            }
            _ => Transition::Unchanged,
        }
    }

    /// User asked to cancel the live emergency
    pub fn dismiss(&mut self) -> Transition {
        if !self.state.is_triggered {
            debug!("dismiss requested while idle");
            return Transition::Unchanged;
        }

        info!("emergency dismissed by user");
        self.clear();

        // A user-raised SOS must not re-trigger on the next evaluation.
        if self.sos.clear() {
            self.presenter.set_sos_button(false);
        }
        Transition::Cleared
    }

    /// Apply a resolved contact if the episode that asked for it is still live
    pub fn apply_contact(&mut self, episode: Uuid, contact: &ContactInfo) -> bool {
        if self.episode != Some(episode) {
            debug!(%episode, "discarding contact for a finished episode");
            return false;
        }
        self.presenter.set_contact_info(contact);
        true
    }

    fn activate(&mut self, reason: &str, sample: Option<&Sample>) -> Transition {
        let episode = Uuid::new_v4();
        self.state.is_triggered = true;
        self.state.reason = reason.to_string();
        self.episode = Some(episode);
        self.activations += 1;

        warn!(%episode, %reason, "emergency triggered");
        self.presenter.start_looping_alarm();
        self.presenter.show_emergency(reason);
        self.presenter.set_contact_info(&ContactInfo::fallback());

        Transition::Activated {
            episode,
            lookup: sample.map(|s| (s.latitude, s.longitude)),
        }
    }

    fn clear(&mut self) {
        self.state.is_triggered = false;
        self.state.reason.clear();
        self.episode = None;

        self.presenter.stop_alarm();
        self.presenter.hide_emergency();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Level;
    use crate::ui::recording::{RecordingPresenter, UiCall};

    fn lifecycle() -> (EmergencyLifecycle, Arc<RecordingPresenter>, ManualSos) {
        let presenter = Arc::new(RecordingPresenter::new());
        let sos = ManualSos::new();
        (
            EmergencyLifecycle::new(presenter.clone(), sos.clone()),
            presenter,
            sos,
        )
    }

    fn danger() -> SecurityLevel {
        SecurityLevel::new(Level::Danger, "sudden stop from high speed")
    }

    fn safe() -> SecurityLevel {
        SecurityLevel::new(Level::Safe, "normal movement")
    }

    #[test]
    fn test_starts_idle() {
        let (lifecycle, _, _) = lifecycle();
        assert_eq!(lifecycle.state(), &EmergencyState::default());
        assert!(lifecycle.episode().is_none());
    }

    #[test]
    fn test_consecutive_danger_triggers_once() {
        let (mut lifecycle, presenter, _) = lifecycle();
        let sample = Sample::new(40.0, -74.0, Some(0.0));

        let first = lifecycle.apply(&danger(), Some(&sample));
        let second = lifecycle.apply(&danger(), Some(&sample));

        match first {
            Transition::Activated { lookup, .. } => assert_eq!(lookup, Some((40.0, -74.0))),
            other => panic!("expected activation, got {:?}", other),
        }
        assert_eq!(second, Transition::Unchanged);
        assert_eq!(presenter.count(|c| *c == UiCall::StartAlarm), 1);
        assert_eq!(presenter.count(|c| matches!(c, UiCall::ShowEmergency(_))), 1);
        assert_eq!(lifecycle.activations(), 1);
        assert_eq!(lifecycle.state().reason, "sudden stop from high speed");
    }

    #[test]
    fn test_activation_writes_fallback_contact() {
        let (mut lifecycle, presenter, _) = lifecycle();
        let transition = lifecycle.apply(&danger(), None);

        assert!(matches!(transition, Transition::Activated { lookup: None, .. }));
        assert_eq!(presenter.last_contact(), Some(ContactInfo::fallback()));
    }

    #[test]
    fn test_natural_deescalation_returns_to_idle() {
        let (mut lifecycle, presenter, _) = lifecycle();
        lifecycle.apply(&danger(), None);

        assert_eq!(lifecycle.apply(&safe(), None), Transition::Cleared);
        assert_eq!(lifecycle.state(), &EmergencyState::default());
        assert_eq!(presenter.count(|c| *c == UiCall::StopAlarm), 1);
        assert_eq!(presenter.count(|c| *c == UiCall::HideEmergency), 1);

        assert_eq!(lifecycle.apply(&safe(), None), Transition::Unchanged);
        assert_eq!(presenter.count(|c| *c == UiCall::StopAlarm), 1);
    }

    #[test]
    fn test_manual_dismissal_returns_to_idle_and_clears_sos() {
        let (mut lifecycle, presenter, sos) = lifecycle();
        sos.engage();
        lifecycle.apply(&SecurityLevel::new(Level::Danger, "manual SOS engaged"), None);

        assert_eq!(lifecycle.dismiss(), Transition::Cleared);
        assert!(!lifecycle.state().is_triggered);
        assert_eq!(lifecycle.state().reason, "");
        assert!(!sos.is_engaged());
        assert_eq!(presenter.count(|c| *c == UiCall::SosButton(false)), 1);
    }

    #[test]
    fn test_dismiss_while_idle_is_noop() {
        let (mut lifecycle, presenter, _) = lifecycle();
        assert_eq!(lifecycle.dismiss(), Transition::Unchanged);
        assert!(presenter.calls().is_empty());
    }

    #[test]
    fn test_cycle_retriggers_after_clear() {
        let (mut lifecycle, presenter, _) = lifecycle();
        lifecycle.apply(&danger(), None);
        lifecycle.dismiss();
        lifecycle.apply(&danger(), None);

        assert_eq!(presenter.count(|c| *c == UiCall::StartAlarm), 2);
        assert_eq!(lifecycle.activations(), 2);
    }

    #[test]
    fn test_contact_applies_only_to_live_episode() {
        let (mut lifecycle, presenter, _) = lifecycle();
        let chile = ContactInfo::new("Chile", "133");

        let Transition::Activated { episode, .. } = lifecycle.apply(&danger(), None) else {
            panic!("expected activation");
        };
        assert!(lifecycle.apply_contact(episode, &chile));
        assert_eq!(presenter.last_contact(), Some(chile.clone()));

        lifecycle.apply(&safe(), None);
        assert!(!lifecycle.apply_contact(episode, &ContactInfo::new("Peru", "105")));
        assert_eq!(presenter.last_contact(), Some(chile));
    }
}
