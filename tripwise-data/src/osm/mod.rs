//! OpenStreetMap adapters that need no API key.
//!
//! [`NominatimGeocoder`] resolves free text to coordinates and back,
//! [`OsrmDirectionsProvider`] routes by road between geocoded endpoints and
//! [`OverpassPlacesProvider`] searches OSM tags around a point. OSM carries
//! no ratings or price levels, so every place gets the configured default
//! rating and no price level.
//!
//! The public instances ask for a descriptive user agent and modest request
//! rates; point the base URLs at your own deployments for heavier use.

use std::sync::Arc;
use std::time::Duration;

use crate::http::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpClient, ProviderBuildError, validate_base_url,
};

mod nominatim;
mod osrm;
mod overpass;
mod wire;

pub use nominatim::{GeocodedPlace, NominatimGeocoder, ReverseGeocoded};
pub use osrm::OsrmDirectionsProvider;
pub use overpass::OverpassPlacesProvider;

/// Default Nominatim root.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
/// Default OSRM root.
pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";
/// Default Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Settings shared by the OSM adapters.
///
/// # Examples
/// ```
/// use tripwise_data::OsmConfig;
///
/// let config = OsmConfig::default()
///     .with_osrm_url("http://localhost:5000")
///     .with_default_rating(3.5);
/// assert_eq!(config.max_results, 20);
/// ```
#[derive(Debug, Clone)]
pub struct OsmConfig {
    /// Nominatim root; `search` is appended.
    pub nominatim_url: String,
    /// OSRM root; `route/v1/driving/...` is appended.
    pub osrm_url: String,
    /// Full Overpass interpreter URL.
    pub overpass_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent header; Nominatim rejects anonymous clients.
    pub user_agent: String,
    /// Rating assigned to every Overpass result.
    pub default_rating: f32,
    /// Maximum elements requested from Overpass.
    pub max_results: u32,
}

impl Default for OsmConfig {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_owned(),
            osrm_url: DEFAULT_OSRM_URL.to_owned(),
            overpass_url: DEFAULT_OVERPASS_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            default_rating: 4.0,
            max_results: 20,
        }
    }
}

impl OsmConfig {
    /// Override the Nominatim root, returning `self` for chaining.
    #[must_use]
    pub fn with_nominatim_url(mut self, url: impl Into<String>) -> Self {
        self.nominatim_url = url.into();
        self
    }

    /// Override the OSRM root, returning `self` for chaining.
    #[must_use]
    pub fn with_osrm_url(mut self, url: impl Into<String>) -> Self {
        self.osrm_url = url.into();
        self
    }

    /// Override the Overpass endpoint, returning `self` for chaining.
    #[must_use]
    pub fn with_overpass_url(mut self, url: impl Into<String>) -> Self {
        self.overpass_url = url.into();
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

    /// Override the rating given to Overpass results, returning `self` for
    /// chaining.
    #[must_use]
    pub const fn with_default_rating(mut self, rating: f32) -> Self {
        self.default_rating = rating;
        self
    }

    /// Override the Overpass result cap, returning `self` for chaining.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Validate every base URL and build the shared client.
    fn connect(&self) -> Result<Arc<HttpClient>, ProviderBuildError> {
        for url in [&self.nominatim_url, &self.osrm_url, &self.overpass_url] {
            validate_base_url(url)?;
        }
        HttpClient::new(self.timeout, &self.user_agent).map(Arc::new)
    }
}

/// Round an OSM distance or duration to whole units.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is finite, non-negative and rounded before the cast"
)]
fn whole_units(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round() as u64
}
