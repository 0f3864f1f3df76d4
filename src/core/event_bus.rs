// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Event bus feeding the monitor
//!
//! Every input (position fixes, button presses) and every finished async
//! step (hazard fetch, contact resolution) is posted here and handled by the
//! single evaluation loop in [`super::Monitor`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::detection::{HazardRecord, MovementStatus};
use crate::emergency::ContactInfo;
use crate::feeds::LookupError;
use crate::sensors::{GeolocationError, Sample};

/// Everything the monitor reacts to
#[derive(Debug)]
pub enum MonitorEvent {
    /// New fix from the geolocation source
    Position(Sample),
    /// Geolocation source failed
    PositionError(GeolocationError),
    /// SOS button pressed
    ToggleSos,
    /// Cancel button on the emergency modal
    Dismiss,
    /// Hazard fetch for `sample` completed
    HazardsFetched {
        sample: Sample,
        movement: MovementStatus,
        outcome: Result<Vec<HazardRecord>, LookupError>,
    },
    /// Contact resolution for `episode` completed
    ContactResolved { episode: Uuid, contact: ContactInfo },
}

/// Cloneable sender side of the monitor channel
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<MonitorEvent>,
    event_counter: Arc<AtomicU64>,
}

impl EventBus {
    /// Create a bus and the receiver the monitor will drain
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<MonitorEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                event_counter: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    pub fn publish_position(&self, sample: Sample) -> bool {
        self.post(MonitorEvent::Position(sample))
    }

    pub fn publish_position_error(&self, error: GeolocationError) -> bool {
        self.post(MonitorEvent::PositionError(error))
    }

    pub fn toggle_sos(&self) -> bool {
        self.post(MonitorEvent::ToggleSos)
    }

    pub fn dismiss(&self) -> bool {
        self.post(MonitorEvent::Dismiss)
    }

    /// Post an event; `false` once the monitor has gone away
    pub fn post(&self, event: MonitorEvent) -> bool {
        self.event_counter.fetch_add(1, Ordering::Relaxed);
        match self.tx.send(event) {
            Ok(()) => true,
            Err(err) => {
                debug!("monitor gone, dropping {:?}", err.0);
                false
            }
        }
    }

    /// Total events posted through any clone of this bus
    pub fn published(&self) -> u64 {
        self.event_counter.load(Ordering::Relaxed)
    }
}
