//! Blocking HTTP client for the soil API.
//!
//! [`SoilClient`] owns a pooled `reqwest` client and exposes one method per
//! endpoint. Every request is validated locally first, then sent with a
//! bounded number of retries for transient failures (transport errors and
//! 5xx responses). Client errors (4xx) are returned immediately.
//!
//! # Example
//!
//! ```ignore
//! use soil::{ClientConfig, SoilClient};
//! use soil::query::{Location, SoilTypeQuery};
//!
//! let client = SoilClient::new(ClientConfig::default())?;
//! let response = client.soil_type(&SoilTypeQuery::new(Location::new(60.1, 9.58)).top_k(3))?;
//! println!("Most probable soil type: {}", response.most_probable());
//! ```

use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::Url;

use crate::error::{Result, SoilError};
use crate::models::{
    Liveness, PropertyValueResponse, Readiness, SoilPropertyResponse, SoilTypeResponse,
    SoilTypeSummaryResponse,
};
use crate::query::{
    BoundingBox, Endpoint, LivenessQuery, PropertyQuery, PropertyValueQuery, ReadinessQuery,
    SoilTypeQuery, SoilTypeSummaryQuery,
};

/// Public OpenEPI deployment of the soil API.
pub const DEFAULT_BASE_URL: &str = "https://api.openepi.io/soil";

/// Default timeout for HTTP requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of extra attempts after a transient failure.
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Base delay between attempts; attempt `n` waits `n` times this.
const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Longest response excerpt carried in a [`SoilError::Status`] detail.
const MAX_DETAIL_LEN: usize = 200;

/// Configuration for [`SoilClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL the endpoint paths are resolved against.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Number of retry attempts on transient failure.
    pub max_retries: u32,
    /// Base delay between retries in milliseconds.
    pub retry_delay_ms: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            user_agent: concat!("soil/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration pointing at a different deployment.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SOIL_API_URL` | Base URL of the soil API | `https://api.openepi.io/soil` |
    /// | `SOIL_API_TIMEOUT` | Request timeout in seconds | 30 |
    /// | `SOIL_API_MAX_RETRIES` | Retry attempts on transient failure | 2 |
    ///
    /// Unparsable numeric values fall back to the default with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("SOIL_API_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(timeout) = parse_var(&lookup, "SOIL_API_TIMEOUT") {
            config.timeout_secs = timeout;
        }
        if let Some(retries) = parse_var(&lookup, "SOIL_API_MAX_RETRIES") {
            config.max_retries = retries;
        }

        config
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the maximum number of retry attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay between retries.
    pub fn with_retry_delay_ms(mut self, retry_delay_ms: u64) -> Self {
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(variable = key, value = %raw, "Ignoring unparsable value");
            None
        }
    }
}

/// Client for the soil API.
///
/// Holds a connection pool; create one and share it by reference.
pub struct SoilClient {
    client: Client,
    base_url: Url,
    config: ClientConfig,
}

impl SoilClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SoilError::Config`] if the base URL is not an absolute
    /// `http`/`https` URL, or [`SoilError::Http`] if the TLS backend fails to
    /// initialise.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Create a client configured from `SOIL_API_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Normalised base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Layered property values at a point.
    pub fn soil_properties(&self, query: &PropertyQuery) -> Result<SoilPropertyResponse> {
        for (property, depth) in query.unpublished_pairs() {
            tracing::warn!(
                property = property.code(),
                depth = depth.label(),
                "Property is not published at this depth; values will be empty"
            );
        }
        self.fetch(query)
    }

    /// A single property value at a single depth.
    pub fn soil_property_value(&self, query: &PropertyValueQuery) -> Result<PropertyValueResponse> {
        self.fetch(query)
    }

    /// Most probable soil type at a point, plus top-k probabilities if requested.
    pub fn soil_type(&self, query: &SoilTypeQuery) -> Result<SoilTypeResponse> {
        self.fetch(query)
    }

    /// Soil type occurrence counts within a bounding box.
    pub fn soil_type_summary(&self, bbox: &BoundingBox) -> Result<SoilTypeSummaryResponse> {
        self.fetch(&SoilTypeSummaryQuery::new(*bbox))
    }

    /// Liveness probe.
    pub fn liveness(&self) -> Result<Liveness> {
        self.fetch(&LivenessQuery)
    }

    /// Readiness probe.
    ///
    /// The service signals failing dependency checks with a 5xx status and a
    /// JSON body; that body is returned as `Ok` with
    /// [`Readiness::is_ready`] false. Only a 5xx without a readable body is an
    /// error. Failing probes are not retried.
    pub fn readiness(&self) -> Result<Readiness> {
        let url = self.url_for(&ReadinessQuery)?;
        let (status, body) = self.execute(&url, false)?;

        if is_success(status) {
            return decode(&url, &body);
        }
        match serde_json::from_str::<Readiness>(&body) {
            Ok(readiness) => {
                tracing::debug!(status, state = %readiness.status, "Service reported not ready");
                Ok(readiness)
            }
            Err(_) => Err(status_error(&url, status, &body)),
        }
    }

    /// Validate, send, and decode any endpoint request.
    pub fn fetch<E: Endpoint>(&self, endpoint: &E) -> Result<E::Response> {
        endpoint.validate()?;
        let url = self.url_for(endpoint)?;
        let (status, body) = self.execute(&url, true)?;

        if !is_success(status) {
            return Err(status_error(&url, status, &body));
        }
        decode(&url, &body)
    }

    /// Full request URL for `endpoint`, without validating or sending it.
    pub fn url_for<E: Endpoint>(&self, endpoint: &E) -> Result<Url> {
        let mut url = self
            .base_url
            .join(endpoint.path())
            .map_err(|e| SoilError::InvalidUrl {
                url: format!("{}{}", self.base_url, endpoint.path()),
                reason: e.to_string(),
            })?;

        let pairs = endpoint.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Send a GET, retrying transport errors (and 5xx when `retry_server_errors`).
    ///
    /// Returns the final status code and body text.
    fn execute(&self, url: &Url, retry_server_errors: bool) -> Result<(u16, String)> {
        let mut attempt: u32 = 0;
        loop {
            if attempt > 0 {
                // Brief delay before retry
                std::thread::sleep(Duration::from_millis(
                    self.config.retry_delay_ms * u64::from(attempt),
                ));
            }

            let started = Instant::now();
            tracing::debug!(url = %url, attempt, "Sending soil API request");

            let outcome = self
                .client
                .get(url.clone())
                .send()
                .and_then(|response| {
                    let status = response.status().as_u16();
                    response.text().map(|body| (status, body))
                });

            let retries_left = attempt < self.config.max_retries;
            match outcome {
                Ok((status, body)) => {
                    tracing::debug!(
                        url = %url,
                        status,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Soil API response"
                    );
                    if status >= 500 && retry_server_errors && retries_left {
                        tracing::warn!(url = %url, status, attempt, "Server error, retrying");
                    } else {
                        return Ok((status, body));
                    }
                }
                Err(e) => {
                    if retries_left {
                        tracing::warn!(url = %url, error = %e, attempt, "Request failed, retrying");
                    } else {
                        return Err(SoilError::Http(e));
                    }
                }
            }

            attempt += 1;
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().trim_end_matches('/').to_string();
    normalized.push('/');

    let url = Url::parse(&normalized).map_err(|e| SoilError::Config {
        reason: format!("invalid base URL '{}': {}", raw, e),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SoilError::Config {
            reason: format!("unsupported URL scheme '{}' in '{}'", other, raw),
        }),
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn decode<T: serde::de::DeserializeOwned>(url: &Url, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| SoilError::Decode {
        url: url.to_string(),
        source,
    })
}

fn status_error(url: &Url, status: u16, body: &str) -> SoilError {
    SoilError::Status {
        status,
        url: url.to_string(),
        detail: error_detail(status, body),
    }
}

/// Extract a readable message from an error body.
///
/// Understands FastAPI's `{"detail": "..."}` and its validation-error form
/// `{"detail": [{"loc": [...], "msg": "..."}]}`; falls back to a body excerpt,
/// then to the status reason phrase.
fn error_detail(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(serde_json::Value::Array(items)) => {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|item| {
                        let msg = item.get("msg")?.as_str()?;
                        let field = item
                            .get("loc")
                            .and_then(|loc| loc.as_array())
                            .and_then(|loc| loc.last())
                            .and_then(|f| f.as_str());
                        Some(match field {
                            Some(field) => format!("{}: {}", field, msg),
                            None => msg.to_string(),
                        })
                    })
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unknown error")
            .to_string();
    }
    trimmed.chars().take(MAX_DETAIL_LEN).collect()
}
