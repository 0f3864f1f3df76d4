// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Scripted position source for demo runs and replaying recorded tracks

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{GeolocationError, PositionSource, Sample, traits::MPS_TO_KMH};

/// One scripted step of a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Speed in km/h; omitted when the receiver reports none
    #[serde(default)]
    pub speed_kmh: Option<f64>,
    /// Emit this geolocation failure instead of a fix
    #[serde(default)]
    pub error: Option<GeolocationError>,
}

impl TrackPoint {
    pub fn fix(latitude: f64, longitude: f64, speed_kmh: f64) -> Self {
        Self {
            latitude,
            longitude,
            speed_kmh: Some(speed_kmh),
            error: None,
        }
    }

    fn to_fix(&self) -> Result<Sample, GeolocationError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Sample::new(
                self.latitude,
                self.longitude,
                self.speed_kmh.map(|kmh| kmh / MPS_TO_KMH),
            )),
        }
    }
}

/// Replays a list of track points at a fixed cadence
pub struct TrackSimulator {
    name: String,
    points: VecDeque<TrackPoint>,
    current: Option<TrackPoint>,
    interval: Duration,
    emitted: u64,
}

impl TrackSimulator {
    pub fn new(name: &str, points: Vec<TrackPoint>, interval: Duration) -> Self {
        Self {
            name: name.to_string(),
            points: points.into(),
            current: None,
            interval,
            emitted: 0,
        }
    }

    /// Load a JSON array of [`TrackPoint`]s
    pub fn from_json_file(path: &Path, interval: Duration) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading track file {:?}", path))?;
        let points: Vec<TrackPoint> = serde_json::from_str(&content)
            .with_context(|| format!("parsing track file {:?}", path))?;
        info!("Loaded {} track points from {:?}", points.len(), path);
        Ok(Self::new("track-file", points, interval))
    }

    /// City drive onto a highway ending in an abrupt stop
    pub fn demo(interval: Duration) -> Self {
        let speeds = [
            0.0, 18.0, 32.0, 41.0, 38.0, 55.0, 72.0, 88.0, 104.0, 112.0, 109.0, 4.0, 0.0, 0.0,
            12.0, 25.0,
        ];
        let (mut lat, mut lon) = (19.4326, -99.1332);
        let points = speeds
            .iter()
            .map(|kmh| {
                // roughly north-east, distance proportional to speed
                lat += kmh * 1.5e-5;
                lon += kmh * 1.0e-5;
                TrackPoint::fix(lat, lon, *kmh)
            })
            .collect();
        Self::new("demo-drive", points, interval)
    }

    pub fn remaining(&self) -> usize {
        self.points.len()
    }
}

#[async_trait]
impl PositionSource for TrackSimulator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_fix(&mut self) -> Option<Result<Sample, GeolocationError>> {
        if self.points.is_empty() {
            return None;
        }
        // Pop only after the wait so a cancelled call loses no point.
        if self.emitted > 0 {
            tokio::time::sleep(self.interval).await;
        }
        let point = self.points.pop_front()?;
        self.emitted += 1;
        debug!(source = %self.name, step = self.emitted, "emitting track point");
        let fix = point.to_fix();
        self.current = Some(point);
        Some(fix)
    }

    async fn current_fix(&mut self) -> Option<Result<Sample, GeolocationError>> {
        self.current.as_ref().map(TrackPoint::to_fix)
    }
}
