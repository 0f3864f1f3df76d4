//! Lookup errors

use thiserror::Error;

/// Generic text shown when the hazard feed fails for a non-coverage reason
pub const GENERIC_FEED_FAILURE: &str = "Could not fetch hazard alerts.";

/// Errors from the hazard feed and geocoding lookups
#[derive(Debug, Error)]
pub enum LookupError {
    /// Network/HTTP error
    #[error("Network error: {0}")]
    Unreachable(reqwest::Error),

    /// Service returned a non-success status
    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },

    /// No feed exists for this region; the message is shown verbatim
    #[error("{0}")]
    CoverageUnsupported(String),

    /// Points lookup succeeded but carried no forecast zone
    #[error("Could not determine the forecast zone for alerts")]
    MissingZone,

    /// Geocoder returned no country for the coordinate
    #[error("No country found for coordinate")]
    NoMatch,

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Lookup switched off in configuration
    #[error("Hazard alerts are disabled")]
    Disabled,
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else {
            LookupError::Unreachable(err)
        }
    }
}

impl LookupError {
    pub fn is_coverage(&self) -> bool {
        matches!(self, LookupError::CoverageUnsupported(_))
    }

    /// Text for the hazard list when the feed fails
    pub fn user_message(&self) -> String {
        match self {
            LookupError::CoverageUnsupported(message) => message.clone(),
            LookupError::Disabled => "Hazard alerts are disabled.".to_string(),
            _ => GENERIC_FEED_FAILURE.to_string(),
        }
    }
}
