// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Position sample and source traits

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conversion factor from m/s to km/h
pub const MPS_TO_KMH: f64 = 3.6;

/// A single fix from the geolocation source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub latitude: f64,
    pub longitude: f64,
    /// Ground speed in m/s, `None` when the receiver cannot tell
    pub speed_mps: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    pub fn new(latitude: f64, longitude: f64, speed_mps: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            speed_mps,
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Speed in km/h; non-finite readings count as missing
    pub fn speed_kmh(&self) -> Option<f64> {
        self.speed_mps
            .filter(|s| s.is_finite())
            .map(|s| s * MPS_TO_KMH)
    }

    /// Coordinates formatted the way the status panel shows them
    pub fn coordinates_text(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Failure reported by the geolocation source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeolocationError {
    #[error("Location permission was denied. Enable it in your device settings to continue.")]
    PermissionDenied,

    #[error("Location information is unavailable. Make sure the device GPS is turned on.")]
    PositionUnavailable,

    #[error("The location request took too long. Try moving to an area with a better GPS signal.")]
    Timeout,

    #[error("Geolocation is not supported on this device.")]
    Unsupported,
}

/// Anything that emits position fixes
#[async_trait]
pub trait PositionSource: Send {
    /// Source name for logs
    fn name(&self) -> &str;

    /// Wait for the next fix; `None` once the source is exhausted
    async fn next_fix(&mut self) -> Option<Result<Sample, GeolocationError>>;

    /// Read the receiver's position right now, outside the regular cadence.
    /// `None` when the source has no position to report.
    async fn current_fix(&mut self) -> Option<Result<Sample, GeolocationError>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_conversion() {
        let sample = Sample::new(0.0, 0.0, Some(25.0));
        assert!((sample.speed_kmh().unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(Sample::new(0.0, 0.0, None).speed_kmh(), None);
        assert_eq!(Sample::new(0.0, 0.0, Some(f64::NAN)).speed_kmh(), None);
    }

    #[test]
    fn test_coordinates_text() {
        let sample = Sample::new(19.432608, -99.133208, None);
        assert_eq!(sample.coordinates_text(), "19.4326, -99.1332");
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        assert!(GeolocationError::PermissionDenied.to_string().contains("permission"));
        assert!(GeolocationError::Timeout.to_string().contains("too long"));
    }
}
