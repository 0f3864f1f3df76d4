//! Monitor - runs one evaluation pass per position update

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use super::{EventBus, MonitorEvent, MonitorStats};
use crate::config::Config;
use crate::detection::{
    aggregate, classify, HazardStatus, Level, MovementDetector, MovementStatus, SecurityLevel,
    REASON_HAZARD_UNKNOWN,
};
use crate::emergency::{ContactResolver, EmergencyLifecycle, EmergencyState, Transition};
use crate::feeds::HazardFeed;
use crate::security::ManualSos;
use crate::sensors::{GeolocationError, Sample};
use crate::ui::{Cue, HazardListView, Presenter};

/// Movement reason after a geolocation failure
pub const REASON_LOCATION_ERROR: &str = "geolocation error";

/// Movement reason when SOS is toggled before the first fix
pub const REASON_WAITING_FOR_FIX: &str = "waiting for location";

/// Hazard list text when there is no position to look alerts up for
pub const LOCATION_REQUIRED_TEXT: &str = "Location is required to look up alerts.";

/// Owner of the detector, the emergency lifecycle and the last known fix.
///
/// Every state change happens on the task that drives the monitor; hazard
/// fetches and contact lookups run as spawned tasks and post their results
/// back through the [`EventBus`].
pub struct Monitor {
    config: Arc<Config>,
    detector: MovementDetector,
    lifecycle: EmergencyLifecycle,
    hazards: Arc<dyn HazardFeed>,
    contacts: Arc<ContactResolver>,
    presenter: Arc<dyn Presenter>,
    sos: ManualSos,
    bus: EventBus,
    inbox: mpsc::UnboundedReceiver<MonitorEvent>,
    fix_requests: Option<mpsc::UnboundedSender<()>>,
    last_sample: Option<Sample>,
    has_fix: bool,
    last_level: Option<SecurityLevel>,
    in_flight: usize,
    stats: MonitorStats,
    start_time: Instant,
}

impl Monitor {
    pub fn new(
        config: Arc<Config>,
        hazards: Arc<dyn HazardFeed>,
        contacts: Arc<ContactResolver>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let sos = ManualSos::new();
        let (bus, inbox) = EventBus::channel();

        Self {
            detector: MovementDetector::new(config.movement.clone(), sos.clone()),
            lifecycle: EmergencyLifecycle::new(presenter.clone(), sos.clone()),
            config,
            hazards,
            contacts,
            presenter,
            sos,
            bus,
            inbox,
            fix_requests: None,
            last_sample: None,
            has_fix: false,
            last_level: None,
            in_flight: 0,
            stats: MonitorStats::default(),
            start_time: Instant::now(),
        }
    }

    /// Ask the position source for a fresh fix whenever SOS is toggled
    pub fn with_fix_requests(mut self, requests: mpsc::UnboundedSender<()>) -> Self {
        self.fix_requests = Some(requests);
        self
    }

    /// Handle for posting events into this monitor
    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sos(&self) -> &ManualSos {
        &self.sos
    }

    pub fn emergency(&self) -> &EmergencyState {
        self.lifecycle.state()
    }

    /// Most recent aggregate, if any evaluation has completed
    pub fn last_level(&self) -> Option<&SecurityLevel> {
        self.last_level.as_ref()
    }

    pub fn last_sample(&self) -> Option<&Sample> {
        self.last_sample.as_ref()
    }

    /// Spawned lookups whose results have not been handled yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            activations: self.lifecycle.activations(),
            ..self.stats.clone()
        }
    }

    pub fn uptime(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Process events until shutdown is signalled
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<MonitorStats> {
        info!("Starting monitor...");

        loop {
            tokio::select! {
                event = self.inbox.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                _ = shutdown.recv() => {
                    info!("Monitor shutting down...");
                    break;
                }
            }
        }

        if self.lifecycle.is_active() {
            self.presenter.stop_alarm();
        }

        let stats = self.stats();
        info!(
            "Monitor stopped after {}s: {} fixes, {} evaluations, {} emergencies",
            self.uptime(),
            stats.fixes,
            stats.evaluations,
            stats.activations
        );
        Ok(stats)
    }

    /// Wait for and handle a single event
    pub async fn step(&mut self) -> bool {
        match self.inbox.recv().await {
            Some(event) => {
                self.handle(event);
                true
            }
            None => false,
        }
    }

    /// Handle every queued event and wait for all spawned lookups to report back
    pub async fn settle(&mut self) {
        loop {
            match self.inbox.try_recv() {
                Ok(event) => self.handle(event),
                Err(_) if self.in_flight > 0 => {
                    if !self.step().await {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    }

    pub fn handle(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Position(sample) => self.on_position(sample),
            MonitorEvent::PositionError(err) => self.on_position_error(err),
            MonitorEvent::ToggleSos => self.on_toggle_sos(),
            MonitorEvent::Dismiss => {
                self.lifecycle.dismiss();
            }
            MonitorEvent::HazardsFetched { sample, movement, outcome } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                let hazard = match outcome {
                    Ok(alerts) => {
                        let status = classify(Some(alerts.as_slice()), false);
                        self.presenter.set_hazard_list(&HazardListView::Alerts(alerts));
                        status
                    }
                    Err(err) => {
                        if err.is_coverage() {
                            info!("No hazard coverage at {}: {}", sample.coordinates_text(), err);
                            self.stats.uncovered_lookups += 1;
                        } else {
                            warn!("Hazard feed failed: {}", err);
                            self.stats.hazard_failures += 1;
                        }
                        self.presenter
                            .set_hazard_list(&HazardListView::Failed(err.user_message()));
                        classify(None, true)
                    }
                };
                self.evaluate(&movement, &hazard, Some(&sample));
            }
            MonitorEvent::ContactResolved { episode, contact } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.lifecycle.apply_contact(episode, &contact);
            }
        }
    }

    fn on_position(&mut self, sample: Sample) {
        self.stats.fixes += 1;
        if !self.has_fix {
            info!("GPS lock at {}", sample.coordinates_text());
            self.presenter.play_cue(Cue::GpsLock);
            self.has_fix = true;
        }
        self.last_sample = Some(sample.clone());
        self.begin_evaluation(sample);
    }

    fn on_position_error(&mut self, err: GeolocationError) {
        warn!("Geolocation error: {}", err);
        self.stats.position_errors += 1;
        self.presenter.show_location_error(&err.to_string());
        self.presenter
            .set_hazard_list(&HazardListView::Failed(LOCATION_REQUIRED_TEXT.to_string()));

        // Evaluated as if no fix existed, so a stale position cannot keep SOS in danger.
        self.last_sample = None;
        self.evaluate_without_fix(REASON_LOCATION_ERROR);
    }

    fn on_toggle_sos(&mut self) {
        let engaged = self.sos.toggle();
        self.presenter.set_sos_button(engaged);

        if self.request_fix() {
            return;
        }
        match self.last_sample.clone() {
            Some(sample) => self.begin_evaluation(sample),
            None => self.evaluate_without_fix(REASON_WAITING_FOR_FIX),
        }
    }

    /// `true` when a forced fix is on its way through the bus
    fn request_fix(&mut self) -> bool {
        let Some(requests) = &self.fix_requests else {
            return false;
        };
        if requests.send(()).is_ok() {
            debug!("forced fix requested");
            return true;
        }
        warn!("Position source gone; re-evaluating the last fix");
        self.fix_requests = None;
        false
    }

    fn evaluate_without_fix(&mut self, reason: &str) {
        let movement = MovementStatus::new(Level::Calculating, reason);
        let hazard = HazardStatus::new(Level::Calculating, REASON_HAZARD_UNKNOWN);
        self.evaluate(&movement, &hazard, None);
    }

    /// Movement runs now; the pass completes when the hazard fetch reports back
    fn begin_evaluation(&mut self, sample: Sample) {
        self.presenter
            .set_marker_position(sample.latitude, sample.longitude);
        let movement = self.detector.evaluate(&sample);
        debug!(level = %movement.level, reason = %movement.reason, "movement evaluated");

        self.presenter.set_hazard_list(&HazardListView::Loading);
        self.in_flight += 1;

        let feed = self.hazards.clone();
        let bus = self.bus.clone();
        tokio::spawn(async move {
            let outcome = feed.fetch_hazards(sample.latitude, sample.longitude).await;
            bus.post(MonitorEvent::HazardsFetched { sample, movement, outcome });
        });
    }

    fn evaluate(&mut self, movement: &MovementStatus, hazard: &HazardStatus, sample: Option<&Sample>) {
        let level = aggregate(movement, hazard);
        self.stats.evaluations += 1;
        debug!(level = %level.level, reason = %level.reason, "security level");
        self.presenter.set_status(&level);

        if let Transition::Activated { episode, lookup: Some((latitude, longitude)) } =
            self.lifecycle.apply(&level, sample)
        {
            self.in_flight += 1;
            let contacts = self.contacts.clone();
            let bus = self.bus.clone();
            tokio::spawn(async move {
                let contact = contacts.resolve(latitude, longitude).await;
                bus.post(MonitorEvent::ContactResolved { episode, contact });
            });
        }

        self.last_level = Some(level);
    }
}
