// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Nominatim reverse geocoder

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{Geocoder, LookupError};
use crate::config::ContactConfig;

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    country_code: Option<String>,
}

impl ReverseResponse {
    /// Upper-cased ISO country code
    fn into_country_code(self) -> Result<String, LookupError> {
        self.address
            .and_then(|a| a.country_code)
            .map(|code| code.trim().to_ascii_uppercase())
            .filter(|code| !code.is_empty())
            .ok_or(LookupError::NoMatch)
    }
}

/// Reverse geocoder backed by an OpenStreetMap Nominatim instance
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    language: String,
}

impl NominatimGeocoder {
    pub fn new(config: &ContactConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<String, LookupError> {
        let response = self
            .client
            .get(format!("{}/reverse", self.endpoint))
            .query(&[
                ("format", "json".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("accept-language", self.language.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status {
                service: "reverse geocoder",
                status: response.status().as_u16(),
            });
        }

        let code = response.json::<ReverseResponse>().await?.into_country_code()?;
        debug!(%code, "reverse geocoded country");
        Ok(code)
    }
}
