// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Position manager - forwards a position source into the monitor bus

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{GeolocationError, PositionSource, Sample};
use crate::core::EventBus;

/// Longest wait for a regular fix before reporting a timeout
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest wait for a fix forced by the SOS button
pub const DEFAULT_FORCED_TIMEOUT: Duration = Duration::from_secs(5);

/// Counters for the attached source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceHealth {
    pub source: String,
    pub fixes_count: u64,
    pub forced_count: u64,
    pub error_count: u64,
    pub last_error: Option<String>,
    pub exhausted: bool,
}

enum Step {
    Fix(Option<Result<Sample, GeolocationError>>),
    Stalled,
    Forced,
    RequestsClosed,
    Shutdown,
}

/// Drives one [`PositionSource`] until it runs dry or shutdown is signalled
pub struct PositionManager {
    source: Box<dyn PositionSource>,
    bus: EventBus,
    requests: Option<mpsc::UnboundedReceiver<()>>,
    fix_timeout: Duration,
    forced_timeout: Duration,
    health: SourceHealth,
}

impl PositionManager {
    pub fn new(source: Box<dyn PositionSource>, bus: EventBus) -> Self {
        let health = SourceHealth {
            source: source.name().to_string(),
            ..Default::default()
        };
        Self {
            source,
            bus,
            requests: None,
            fix_timeout: DEFAULT_FIX_TIMEOUT,
            forced_timeout: DEFAULT_FORCED_TIMEOUT,
            health,
        }
    }

    pub fn with_timeouts(mut self, fix_timeout: Duration, forced_timeout: Duration) -> Self {
        self.fix_timeout = fix_timeout;
        self.forced_timeout = forced_timeout;
        self
    }

    /// Accept forced fix requests (one `()` per request)
    pub fn with_fix_requests(mut self, requests: mpsc::UnboundedReceiver<()>) -> Self {
        self.requests = Some(requests);
        self
    }

    pub fn health(&self) -> &SourceHealth {
        &self.health
    }

    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<SourceHealth> {
        info!("Starting position source '{}'", self.health.source);

        loop {
            let step = tokio::select! {
                fix = timeout(self.fix_timeout, self.source.next_fix()) => match fix {
                    Ok(fix) => Step::Fix(fix),
                    Err(_) => Step::Stalled,
                },
                request = next_request(&mut self.requests) => match request {
                    Some(()) => Step::Forced,
                    None => Step::RequestsClosed,
                },
                _ = shutdown.recv() => Step::Shutdown,
            };

            let delivered = match step {
                Step::Fix(Some(fix)) => self.forward(fix),
                Step::Fix(None) => {
                    info!("Position source '{}' exhausted", self.health.source);
                    self.health.exhausted = true;
                    break;
                }
                Step::Stalled => {
                    debug!("No fix from '{}' within {:?}", self.health.source, self.fix_timeout);
                    self.forward(Err(GeolocationError::Timeout))
                }
                Step::Forced => {
                    self.health.forced_count += 1;
                    let fix = match timeout(self.forced_timeout, self.source.current_fix()).await {
                        Ok(Some(fix)) => fix,
                        Ok(None) => Err(GeolocationError::PositionUnavailable),
                        Err(_) => Err(GeolocationError::Timeout),
                    };
                    self.forward(fix)
                }
                Step::RequestsClosed => {
                    self.requests = None;
                    true
                }
                Step::Shutdown => {
                    info!("Position manager shutting down...");
                    break;
                }
            };
            if !delivered {
                break;
            }
        }

        Ok(self.health)
    }

    /// Publish one fix or error; `false` once the monitor is gone
    fn forward(&mut self, fix: Result<Sample, GeolocationError>) -> bool {
        match fix {
            Ok(sample) => {
                self.health.fixes_count += 1;
                self.bus.publish_position(sample)
            }
            Err(err) => {
                self.health.error_count += 1;
                self.health.last_error = Some(err.to_string());
                warn!("Geolocation error from '{}': {:?}", self.health.source, err);
                self.bus.publish_position_error(err)
            }
        }
    }
}

async fn next_request(requests: &mut Option<mpsc::UnboundedReceiver<()>>) -> Option<()> {
    match requests {
        Some(requests) => requests.recv().await,
        None => std::future::pending().await,
    }
}
