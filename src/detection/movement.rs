// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Movement anomaly detector - high speed and sudden stop from high speed

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{Level, MovementStatus};
use crate::security::ManualSos;
use crate::sensors::Sample;

pub const REASON_MANUAL_SOS: &str = "manual SOS engaged";
pub const REASON_SPEED_UNAVAILABLE: &str = "speed unavailable";
pub const REASON_NORMAL: &str = "normal movement";
pub const REASON_HIGH_SPEED: &str = "high speed detected";
pub const REASON_SUDDEN_STOP: &str = "sudden stop from high speed";

/// Movement detector thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Speed above which movement is considered high (km/h)
    pub high_speed_threshold_kmh: f64,

    /// Speed below which the user is considered stopped (km/h)
    pub sudden_stop_threshold_kmh: f64,

    /// Whether a sample without speed replaces the remembered sample.
    /// When true a GPS glitch between a fast and a stopped fix masks the stop.
    pub calculating_overwrites_memory: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            high_speed_threshold_kmh: 80.0,
            sudden_stop_threshold_kmh: 10.0,
            calculating_overwrites_memory: false,
        }
    }
}

/// Stateful classifier over successive position samples
pub struct MovementDetector {
    config: MovementConfig,
    sos: ManualSos,
    last_sample: Option<Sample>,
}

impl MovementDetector {
    pub fn new(config: MovementConfig, sos: ManualSos) -> Self {
        Self {
            config,
            sos,
            last_sample: None,
        }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Sample remembered for the sudden-stop check
    pub fn last_sample(&self) -> Option<&Sample> {
        self.last_sample.as_ref()
    }

    pub fn reset(&mut self) {
        self.last_sample = None;
    }

    /// Classify a new sample and remember it for the next call
    pub fn evaluate(&mut self, sample: &Sample) -> MovementStatus {
        // Manual SOS wins and leaves the motion memory untouched.
        if self.sos.is_engaged() {
            return MovementStatus::new(Level::Danger, REASON_MANUAL_SOS);
        }

        let Some(current_kmh) = sample.speed_kmh() else {
            if self.config.calculating_overwrites_memory {
                self.last_sample = Some(sample.clone());
            }
            trace!("sample without speed");
            return MovementStatus::new(Level::Calculating, REASON_SPEED_UNAVAILABLE);
        };

        let mut status = if current_kmh > self.config.high_speed_threshold_kmh {
            MovementStatus::new(Level::Warning, REASON_HIGH_SPEED)
        } else {
            MovementStatus::new(Level::Safe, REASON_NORMAL)
        };

        let previous_kmh = self.last_sample.as_ref().and_then(Sample::speed_kmh);
        if let Some(previous_kmh) = previous_kmh {
            if previous_kmh > self.config.high_speed_threshold_kmh
                && current_kmh < self.config.sudden_stop_threshold_kmh
            {
                debug!(
                    previous_kmh,
                    current_kmh, "sudden stop from high speed"
                );
                status = MovementStatus::new(Level::Danger, REASON_SUDDEN_STOP);
            }
        }

        self.last_sample = Some(sample.clone());
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_kmh(kmh: f64) -> Sample {
        Sample::new(19.4326, -99.1332, Some(kmh / 3.6))
    }

    fn detector() -> (MovementDetector, ManualSos) {
        let sos = ManualSos::new();
        (MovementDetector::new(MovementConfig::default(), sos.clone()), sos)
    }

    fn levels(detector: &mut MovementDetector, speeds: &[f64]) -> Vec<Level> {
        speeds
            .iter()
            .map(|s| detector.evaluate(&at_kmh(*s)).level)
            .collect()
    }

    #[test]
    fn test_first_sample_sets_baseline() {
        let (mut detector, _) = detector();
        let status = detector.evaluate(&at_kmh(5.0));
        assert_eq!(status.level, Level::Safe);
        assert_eq!(status.reason, REASON_NORMAL);
        assert!(detector.last_sample().is_some());
    }

    #[test]
    fn test_high_speed_warns() {
        let (mut detector, _) = detector();
        let status = detector.evaluate(&at_kmh(95.0));
        assert_eq!(status, MovementStatus::new(Level::Warning, REASON_HIGH_SPEED));
    }

    #[test]
    fn test_sudden_stop_after_high_speed_is_danger() {
        let (mut detector, _) = detector();
        assert_eq!(
            levels(&mut detector, &[30.0, 100.0, 5.0]),
            vec![Level::Safe, Level::Warning, Level::Danger]
        );
    }

    #[test]
    fn test_stop_without_prior_high_speed_is_not_danger() {
        let (mut detector, _) = detector();
        let seen = levels(&mut detector, &[70.0, 79.0, 5.0, 0.0, 60.0, 2.0]);
        assert!(seen.iter().all(|l| *l != Level::Danger), "{:?}", seen);
    }

    #[test]
    fn test_slowing_above_stop_threshold_is_not_danger() {
        let (mut detector, _) = detector();
        assert_eq!(
            levels(&mut detector, &[95.0, 12.0]),
            vec![Level::Warning, Level::Safe]
        );
    }

    #[test]
    fn test_missing_speed_is_calculating_and_keeps_memory_by_default() {
        let (mut detector, _) = detector();
        detector.evaluate(&at_kmh(120.0));

        let glitch = Sample::new(19.4326, -99.1332, None);
        let status = detector.evaluate(&glitch);
        assert_eq!(status, MovementStatus::new(Level::Calculating, REASON_SPEED_UNAVAILABLE));

        assert_eq!(detector.evaluate(&at_kmh(3.0)).level, Level::Danger);
    }

    #[test]
    fn test_missing_speed_can_overwrite_memory() {
        let config = MovementConfig {
            calculating_overwrites_memory: true,
            ..Default::default()
        };
        let mut detector = MovementDetector::new(config, ManualSos::new());
        detector.evaluate(&at_kmh(120.0));
        detector.evaluate(&Sample::new(0.0, 0.0, None));

        assert_eq!(detector.evaluate(&at_kmh(3.0)).level, Level::Safe);
    }

    #[test]
    fn test_manual_sos_overrides_and_preserves_memory() {
        let (mut detector, sos) = detector();
        detector.evaluate(&at_kmh(110.0));

        sos.engage();
        let status = detector.evaluate(&at_kmh(40.0));
        assert_eq!(status, MovementStatus::new(Level::Danger, REASON_MANUAL_SOS));
        let remembered = detector.last_sample().and_then(Sample::speed_kmh).unwrap();
        assert!((remembered - 110.0).abs() < 1e-9);

        sos.clear();
        assert_eq!(detector.evaluate(&at_kmh(4.0)).level, Level::Danger);
    }

    #[test]
    fn test_nominal_pattern_with_sos_is_danger() {
        let (mut detector, sos) = detector();
        sos.engage();
        assert_eq!(levels(&mut detector, &[20.0, 25.0]), vec![Level::Danger, Level::Danger]);
        assert!(detector.last_sample().is_none());
    }
}
