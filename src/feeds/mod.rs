//! External lookups - weather hazard feed and reverse geocoding

mod error;
mod weather;
mod geocode;

pub use error::LookupError;
pub use weather::*;
pub use geocode::*;

use async_trait::async_trait;

use crate::detection::HazardRecord;

/// Source of active hazard alerts for a coordinate
#[async_trait]
pub trait HazardFeed: Send + Sync {
    async fn fetch_hazards(&self, latitude: f64, longitude: f64) -> Result<Vec<HazardRecord>, LookupError>;
}

/// Reverse geocoder resolving a coordinate to an ISO 3166-1 alpha-2 code
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<String, LookupError>;
}

/// Hazard feed used when alerts are switched off in configuration
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledHazardFeed;

#[async_trait]
impl HazardFeed for DisabledHazardFeed {
    async fn fetch_hazards(&self, _latitude: f64, _longitude: f64) -> Result<Vec<HazardRecord>, LookupError> {
        Err(LookupError::Disabled)
    }
}
