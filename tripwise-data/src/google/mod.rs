//! Google Maps Platform adapters.
//!
//! [`GoogleDirectionsProvider`] wraps the Directions API and
//! [`GooglePlacesProvider`] wraps Places Nearby Search, Text Search and
//! Place Details. Both share the same
//! [`GoogleConfig`] and treat any status other than `OK` or `ZERO_RESULTS`
//! as a [`ProviderError::Service`] failure.

use std::time::Duration;

use tripwise_core::ProviderError;

use crate::http::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

mod details;
mod directions;
mod places;
mod wire;

pub use details::{PlaceDetails, PlaceReview};
pub use directions::GoogleDirectionsProvider;
pub use places::{GooglePlacesProvider, TEXT_SEARCH_RADIUS_METERS};

/// Default Google Maps web service root.
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Settings shared by the Google adapters.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use tripwise_data::GoogleConfig;
///
/// let config = GoogleConfig::new("api-key")
///     .with_base_url("http://localhost:8080/maps/api")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Clone)]
pub struct GoogleConfig {
    /// Service root; `directions/json` and the `place/*/json` paths are
    /// appended.
    pub base_url: String,
    /// API key sent as the `key` parameter.
    pub api_key: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent header.
    pub user_agent: String,
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl GoogleConfig {
    /// Create a configuration for `api_key` with default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_GOOGLE_BASE_URL.to_owned(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Override the service root, returning `self` for chaining.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout, returning `self` for chaining.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the user agent, returning `self` for chaining.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Accept `OK` and `ZERO_RESULTS`; map anything else to a service error.
///
/// Returns `false` for `ZERO_RESULTS` so callers can short-circuit.
fn check_status(status: &str, message: Option<String>) -> Result<bool, ProviderError> {
    match status {
        wire::STATUS_OK => Ok(true),
        wire::STATUS_ZERO_RESULTS => Ok(false),
        _ => Err(ProviderError::Service {
            status: status.to_owned(),
            message: message.unwrap_or_default(),
        }),
    }
}
