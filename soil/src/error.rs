//! Error types for the soil client.

use thiserror::Error;

/// Errors that can occur when querying the soil API.
#[derive(Error, Debug)]
pub enum SoilError {
    /// Transport failure: connection refused, DNS, TLS, or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("Request to {url} failed with HTTP {status}: {detail}")]
    Status {
        status: u16,
        url: String,
        detail: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL could not be parsed or joined with a path.
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Coordinates are outside the service's region of interest.
    #[error("Coordinates out of bounds: lat={lat}, lon={lon} (valid: lat ±90°, lon ±180°)")]
    OutOfRegion { lat: f64, lon: f64 },

    /// Bounding box corners are inverted or not finite.
    #[error(
        "Invalid bounding box: min_lon={min_lon}, max_lon={max_lon}, min_lat={min_lat}, max_lat={max_lat}"
    )]
    InvalidBoundingBox {
        min_lon: f64,
        max_lon: f64,
        min_lat: f64,
        max_lat: f64,
    },

    /// A query parameter was rejected before sending.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Client configuration is unusable.
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

impl SoilError {
    /// HTTP status code, if the error came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            SoilError::Status { status, .. } => Some(*status),
            SoilError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SoilError::Http(_) => true,
            SoilError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SoilError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type alias using [`SoilError`].
pub type Result<T> = std::result::Result<T, SoilError>;
