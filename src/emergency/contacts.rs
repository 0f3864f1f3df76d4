// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Country-level emergency number resolution

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{GridKey, TtlCache};
use crate::config::ContactConfig;
use crate::feeds::{Geocoder, LookupError};

pub const FALLBACK_COUNTRY_NAME: &str = "your location";
pub const FALLBACK_NUMBER: &str = "911";

/// Emergency number to call and the country it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub country_name: String,
    pub number: String,
}

impl ContactInfo {
    pub fn new(country_name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            country_name: country_name.into(),
            number: number.into(),
        }
    }

    /// Used whenever resolution fails
    pub fn fallback() -> Self {
        Self::new(FALLBACK_COUNTRY_NAME, FALLBACK_NUMBER)
    }

    pub fn dial_uri(&self) -> String {
        format!("tel:{}", self.number)
    }
}

/// ISO 3166-1 alpha-2 code, country name, primary all-services number
pub const EMERGENCY_NUMBERS: &[(&str, &str, &str)] = &[
    // North America
    ("US", "United States", "911"),
    ("CA", "Canada", "911"),
    ("MX", "Mexico", "911"),
    // South America
    ("AR", "Argentina", "911"),
    ("BO", "Bolivia", "110"),
    ("BR", "Brazil", "190"),
    ("CL", "Chile", "133"),
    ("CO", "Colombia", "123"),
    ("EC", "Ecuador", "911"),
    ("PY", "Paraguay", "911"),
    ("PE", "Peru", "105"),
    ("UY", "Uruguay", "911"),
    ("VE", "Venezuela", "911"),
    // Europe
    ("ES", "Spain", "112"),
    ("FR", "France", "112"),
    ("DE", "Germany", "112"),
    ("IT", "Italy", "112"),
    ("GB", "United Kingdom", "999"),
    ("PT", "Portugal", "112"),
    // Asia
    ("JP", "Japan", "110"),
    ("CN", "China", "110"),
    ("IN", "India", "112"),
    // Oceania
    ("AU", "Australia", "000"),
    ("NZ", "New Zealand", "111"),
];

/// Look up the emergency contact for a country code (case-insensitive)
pub fn lookup_country(code: &str) -> Option<ContactInfo> {
    EMERGENCY_NUMBERS
        .iter()
        .find(|(c, _, _)| c.eq_ignore_ascii_case(code.trim()))
        .map(|(_, name, number)| ContactInfo::new(*name, *number))
}

/// Resolves the local emergency number for a coordinate.
///
/// Only successful resolutions are cached; every failure yields
/// [`ContactInfo::fallback`] and is retried on the next call.
pub struct ContactResolver {
    geocoder: Arc<dyn Geocoder>,
    cache: TtlCache<GridKey, ContactInfo>,
    precision: u8,
}

impl ContactResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, config: &ContactConfig) -> Self {
        Self {
            geocoder,
            cache: TtlCache::new(Duration::from_secs(config.ttl_secs), config.cache_capacity),
            precision: config.precision,
        }
    }

    pub fn cache(&self) -> &TtlCache<GridKey, ContactInfo> {
        &self.cache
    }

    /// Resolve a contact, never failing
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> ContactInfo {
        match self.try_resolve(latitude, longitude).await {
            Ok(contact) => contact,
            Err(err) => {
                warn!("Could not get local emergency number: {}", err);
                ContactInfo::fallback()
            }
        }
    }

    async fn try_resolve(&self, latitude: f64, longitude: f64) -> Result<ContactInfo, LookupError> {
        let key = GridKey::new(latitude, longitude, self.precision);
        if let Some(contact) = self.cache.get(&key) {
            return Ok(contact);
        }

        let code = self.geocoder.reverse_geocode(latitude, longitude).await?;
        let contact = lookup_country(&code).ok_or(LookupError::NoMatch)?;

        debug!(%key, %code, number = %contact.number, "resolved emergency contact");
        self.cache.insert(key, contact.clone());
        Ok(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeGeocoder {
        code: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FakeGeocoder {
        fn new(code: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                code,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn reverse_geocode(&self, _latitude: f64, _longitude: f64) -> Result<String, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.code.map(str::to_string).ok_or(LookupError::NoMatch)
        }
    }

    fn resolver(geocoder: Arc<FakeGeocoder>) -> ContactResolver {
        ContactResolver::new(geocoder, &ContactConfig::default())
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(lookup_country("gb"), Some(ContactInfo::new("United Kingdom", "999")));
        assert_eq!(lookup_country("AU").unwrap().number, "000");
        assert_eq!(lookup_country("ZZ"), None);
    }

    #[test]
    fn test_dial_uri() {
        assert_eq!(ContactInfo::fallback().dial_uri(), "tel:911");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_within_ttl_refetched_after() {
        let geocoder = FakeGeocoder::new(Some("CL"));
        let resolver = resolver(geocoder.clone());

        let first = resolver.resolve(-33.4489, -70.6693).await;
        assert_eq!(first, ContactInfo::new("Chile", "133"));
        assert_eq!(geocoder.calls(), 1);

        tokio::time::advance(Duration::from_secs(59 * 60)).await;
        assert_eq!(resolver.resolve(-33.4489, -70.6693).await, first);
        assert_eq!(geocoder.calls(), 1, "59 minutes should be a cache hit");

        tokio::time::advance(Duration::from_secs(2 * 60)).await;
        assert_eq!(resolver.resolve(-33.4489, -70.6693).await, first);
        assert_eq!(geocoder.calls(), 2, "61 minutes should be a fresh lookup");
    }

    #[tokio::test]
    async fn test_nearby_coordinates_share_entry() {
        let geocoder = FakeGeocoder::new(Some("PE"));
        let resolver = resolver(geocoder.clone());

        resolver.resolve(-12.04640, -77.04280).await;
        resolver.resolve(-12.04610, -77.04270).await;
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_country_falls_back_uncached() {
        let geocoder = FakeGeocoder::new(Some("ZZ"));
        let resolver = resolver(geocoder.clone());

        let contact = resolver.resolve(10.0, 10.0).await;
        assert_eq!(contact, ContactInfo::new("your location", "911"));
        assert!(resolver.cache().is_empty());

        resolver.resolve(10.0, 10.0).await;
        assert_eq!(geocoder.calls(), 2);
    }

    #[tokio::test]
    async fn test_geocoder_failure_falls_back() {
        let geocoder = FakeGeocoder::new(None);
        let resolver = resolver(geocoder.clone());

        assert_eq!(resolver.resolve(0.0, 0.0).await, ContactInfo::fallback());
        assert!(resolver.cache().is_empty());
    }
}
