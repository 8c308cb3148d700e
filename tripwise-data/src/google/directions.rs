//! Directions API adapter.

use tripwise_core::{DirectionsProvider, DirectionsQuery, ProviderError, Route, TravelMode};
use url::Url;

use super::wire::{DirectionsResponse, WireRoute};
use super::{GoogleConfig, check_status};
use crate::http::{HttpClient, ProviderBuildError, endpoint, validate_base_url};

/// Transit vehicles requested from the Directions API.
const TRANSIT_MODES: &str = "bus|subway|train|tram|rail";

/// Directions provider backed by the Google Directions API.
///
/// Alternatives are always requested so the analyzer has candidates to
/// compare. Transit queries also ask for fewer transfers.
#[derive(Debug)]
pub struct GoogleDirectionsProvider {
    http: HttpClient,
    config: GoogleConfig,
}

impl GoogleDirectionsProvider {
    /// Create a provider for `api_key` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when the HTTP client or runtime
    /// cannot be constructed.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(GoogleConfig::new(api_key))
    }

    /// Create a provider from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when the base URL is invalid or the
    /// HTTP client or runtime cannot be constructed.
    pub fn with_config(config: GoogleConfig) -> Result<Self, ProviderBuildError> {
        validate_base_url(&config.base_url)?;
        let http = HttpClient::new(config.timeout, &config.user_agent)?;
        Ok(Self { http, config })
    }

    fn request_url(&self, query: &DirectionsQuery) -> Result<Url, ProviderError> {
        let departure = query
            .departure_time
            .map_or_else(|| "now".to_owned(), |time| time.timestamp().to_string());
        let mut params = vec![
            ("origin", query.origin.clone()),
            ("destination", query.destination.clone()),
            ("mode", query.mode.query_name()),
            ("alternatives", "true".to_owned()),
            ("departure_time", departure),
        ];
        if query.mode == TravelMode::Transit {
            params.push(("transit_mode", TRANSIT_MODES.to_owned()));
            params.push(("transit_routing_preference", "fewer_transfers".to_owned()));
        }
        params.push(("key", self.config.api_key.clone()));
        endpoint(&self.config.base_url, "directions/json", params)
    }
}

/// Normalise a decoded response, dropping routes without legs.
fn convert_response(response: DirectionsResponse) -> Result<Vec<Route>, ProviderError> {
    if !check_status(&response.status, response.error_message)? {
        return Ok(Vec::new());
    }
    Ok(response
        .routes
        .into_iter()
        .filter_map(WireRoute::into_route)
        .collect())
}

impl DirectionsProvider for GoogleDirectionsProvider {
    fn get_directions(&self, query: &DirectionsQuery) -> Result<Vec<Route>, ProviderError> {
        let url = self.request_url(query)?;
        let response: DirectionsResponse = self.http.get_json(&url)?;
        let routes = convert_response(response)?;
        log::debug!(
            "google directions {} -> {}: {} routes",
            query.origin,
            query.destination,
            routes.len()
        );
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> GoogleDirectionsProvider {
        GoogleDirectionsProvider::with_config(
            GoogleConfig::new("test-key").with_base_url("http://localhost:9/maps/api"),
        )
        .expect("provider should build")
    }

    fn param(url: &Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    #[rstest]
    fn transit_queries_request_alternatives(provider: GoogleDirectionsProvider) {
        let departure = DateTime::parse_from_rfc3339("2026-05-01T08:00:00+09:00").expect("time");
        let query = DirectionsQuery::new("Seoul Station", "Busan Station").departing_at(departure);
        let url = provider.request_url(&query).expect("url");

        assert_eq!(url.path(), "/maps/api/directions/json");
        assert_eq!(param(&url, "mode").as_deref(), Some("transit"));
        assert_eq!(param(&url, "alternatives").as_deref(), Some("true"));
        assert_eq!(param(&url, "departure_time").as_deref(), Some("1777590000"));
        assert_eq!(param(&url, "transit_mode").as_deref(), Some(TRANSIT_MODES));
        assert_eq!(
            param(&url, "transit_routing_preference").as_deref(),
            Some("fewer_transfers")
        );
        assert_eq!(param(&url, "key").as_deref(), Some("test-key"));
    }

    #[rstest]
    fn driving_queries_leave_transit_options_out(provider: GoogleDirectionsProvider) {
        let query = DirectionsQuery::new("Seoul", "Busan").with_mode(TravelMode::Driving);
        let url = provider.request_url(&query).expect("url");
        assert_eq!(param(&url, "mode").as_deref(), Some("driving"));
        assert_eq!(param(&url, "departure_time").as_deref(), Some("now"));
        assert!(param(&url, "transit_mode").is_none());
    }

    #[rstest]
    fn zero_results_is_an_empty_list() {
        let response: DirectionsResponse =
            serde_json::from_str(r#"{ "status": "ZERO_RESULTS", "routes": [] }"#).expect("json");
        assert_eq!(convert_response(response), Ok(Vec::new()));
    }

    #[rstest]
    fn denied_requests_surface_the_status() {
        let response: DirectionsResponse = serde_json::from_str(
            r#"{ "status": "OVER_QUERY_LIMIT", "error_message": "quota", "routes": [] }"#,
        )
        .expect("json");
        assert!(matches!(
            convert_response(response),
            Err(ProviderError::Service { status, .. }) if status == "OVER_QUERY_LIMIT"
        ));
    }

    #[rstest]
    fn rejects_invalid_base_urls() {
        let result =
            GoogleDirectionsProvider::with_config(GoogleConfig::new("k").with_base_url("::"));
        assert!(matches!(result, Err(ProviderBuildError::BaseUrl { .. })));
    }
}
