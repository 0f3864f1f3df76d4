// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! National Weather Service alert feed
//!
//! Two-step lookup: `/points/{lat},{lon}` resolves the forecast zone, then
//! `{zone}/alerts` lists the active alerts. Zones are cached per rounded
//! coordinate since they rarely change.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{HazardFeed, LookupError};
use crate::cache::{GridKey, TtlCache};
use crate::config::HazardFeedConfig;
use crate::detection::{HazardRecord, HazardSeverity};

/// Shown when the points endpoint has no data for the coordinate
pub const COVERAGE_MESSAGE: &str =
    "Weather alerts are only available in the United States and its territories.";

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: Option<PointsProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsProperties {
    forecast_zone: Option<String>,
}

impl PointsResponse {
    fn into_zone(self) -> Result<String, LookupError> {
        self.properties
            .and_then(|p| p.forecast_zone)
            .filter(|zone| !zone.is_empty())
            .ok_or(LookupError::MissingZone)
    }
}

#[derive(Debug, Deserialize)]
struct AlertsResponse {
    #[serde(default)]
    features: Vec<AlertFeature>,
}

#[derive(Debug, Deserialize)]
struct AlertFeature {
    properties: AlertProperties,
}

#[derive(Debug, Deserialize)]
struct AlertProperties {
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    event: Option<String>,
}

impl AlertsResponse {
    fn into_records(self) -> Vec<HazardRecord> {
        self.features
            .into_iter()
            .map(|f| {
                HazardRecord::new(
                    f.properties
                        .severity
                        .as_deref()
                        .map(HazardSeverity::parse)
                        .unwrap_or(HazardSeverity::Unknown),
                    f.properties.event.unwrap_or_default(),
                )
            })
            .collect()
    }
}

/// Map a `/points` status onto the lookup outcome; 404 means no coverage
pub fn check_points_status(status: StatusCode) -> Result<(), LookupError> {
    match status {
        StatusCode::NOT_FOUND => Err(LookupError::CoverageUnsupported(COVERAGE_MESSAGE.to_string())),
        status if !status.is_success() => Err(LookupError::Status {
            service: "weather points",
            status: status.as_u16(),
        }),
        _ => Ok(()),
    }
}

/// The two NWS endpoints the feed needs
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Forecast zone URL for a coordinate
    async fn forecast_zone(&self, latitude: f64, longitude: f64) -> Result<String, LookupError>;

    /// Active alerts for a forecast zone URL
    async fn zone_alerts(&self, zone: &str) -> Result<Vec<HazardRecord>, LookupError>;
}

/// HTTP client for api.weather.gov
pub struct NwsClient {
    client: Client,
    endpoint: String,
}

impl NwsClient {
    pub fn new(config: &HazardFeedConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherApi for NwsClient {
    async fn forecast_zone(&self, latitude: f64, longitude: f64) -> Result<String, LookupError> {
        let url = format!("{}/points/{:.4},{:.4}", self.endpoint, latitude, longitude);
        debug!(%url, "resolving forecast zone");

        let response = self.client.get(&url).send().await?;
        check_points_status(response.status())?;
        response.json::<PointsResponse>().await?.into_zone()
    }

    async fn zone_alerts(&self, zone: &str) -> Result<Vec<HazardRecord>, LookupError> {
        let response = self
            .client
            .get(format!("{}/alerts", zone.trim_end_matches('/')))
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), %zone, "alerts request failed");
            return Err(LookupError::Status {
                service: "weather alerts",
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<AlertsResponse>().await?.into_records())
    }
}

/// Hazard feed backed by api.weather.gov, with forecast zones cached per grid cell
pub struct NwsHazardFeed<A = NwsClient> {
    api: A,
    precision: u8,
    zones: TtlCache<GridKey, String>,
}

impl NwsHazardFeed {
    pub fn new(config: HazardFeedConfig) -> Result<Self, LookupError> {
        Ok(Self::with_api(NwsClient::new(&config)?, &config))
    }
}

impl<A: WeatherApi> NwsHazardFeed<A> {
    pub fn with_api(api: A, config: &HazardFeedConfig) -> Self {
        Self {
            api,
            precision: config.zone_precision,
            zones: TtlCache::new(Duration::from_secs(config.zone_ttl_secs), config.cache_capacity),
        }
    }

    /// Forecast-zone cache, exposed for scheduled sweeps
    pub fn zone_cache(&self) -> &TtlCache<GridKey, String> {
        &self.zones
    }

    /// Only successful lookups are cached
    async fn forecast_zone(&self, latitude: f64, longitude: f64) -> Result<String, LookupError> {
        let key = GridKey::new(latitude, longitude, self.precision);
        if let Some(zone) = self.zones.get(&key) {
            debug!(%key, "forecast zone cache hit");
            return Ok(zone);
        }

        let zone = self.api.forecast_zone(latitude, longitude).await?;
        self.zones.insert(key, zone.clone());
        Ok(zone)
    }
}

#[async_trait]
impl<A: WeatherApi> HazardFeed for NwsHazardFeed<A> {
    async fn fetch_hazards(&self, latitude: f64, longitude: f64) -> Result<Vec<HazardRecord>, LookupError> {
        let zone = self.forecast_zone(latitude, longitude).await?;
        let hazards = self.api.zone_alerts(&zone).await?;
        debug!(count = hazards.len(), %zone, "fetched hazard alerts");
        Ok(hazards)
    }
}
