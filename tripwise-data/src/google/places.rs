//! Places Nearby Search, Text Search and Place Details adapter.

use tripwise_core::{Place, PlaceLocation, PlaceQuery, PlacesProvider, ProviderError};
use url::Url;

use super::details::PlaceDetails;
use super::wire::{DetailsResponse, PlacesResponse, WirePlace};
use super::{GoogleConfig, check_status};
use crate::http::{HttpClient, ProviderBuildError, endpoint, validate_base_url};

/// Radius applied to text searches that are biased towards a location.
pub const TEXT_SEARCH_RADIUS_METERS: u32 = 50_000;

/// Fields requested from Place Details.
const DETAIL_FIELDS: &str =
    "name,rating,formatted_address,photos,opening_hours,website,formatted_phone_number,reviews";

/// Places provider backed by Google Places.
///
/// Nearby results are filtered by the query's rating and price bounds and
/// sorted by rating, highest first, before they are returned. Text search
/// and details lookups return what the service sends.
#[derive(Debug)]
pub struct GooglePlacesProvider {
    http: HttpClient,
    config: GoogleConfig,
}

impl GooglePlacesProvider {
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

    fn request_url(&self, query: &PlaceQuery) -> Result<Url, ProviderError> {
        let mut params = vec![
            ("location", query.location.to_string()),
            ("radius", query.radius_meters.to_string()),
            ("type", query.place_type.as_str().to_owned()),
        ];
        if let Some(keyword) = &query.keyword {
            params.push(("keyword", keyword.clone()));
        }
        params.push(("key", self.config.api_key.clone()));
        endpoint(&self.config.base_url, "place/nearbysearch/json", params)
    }

    fn text_search_url(
        &self,
        text: &str,
        near: Option<&PlaceLocation>,
    ) -> Result<Url, ProviderError> {
        let mut params = vec![("query", text.to_owned())];
        if let Some(location) = near {
            params.push(("location", location.to_string()));
            params.push(("radius", TEXT_SEARCH_RADIUS_METERS.to_string()));
        }
        params.push(("key", self.config.api_key.clone()));
        endpoint(&self.config.base_url, "place/textsearch/json", params)
    }

    fn details_url(&self, place_id: &str) -> Result<Url, ProviderError> {
        endpoint(
            &self.config.base_url,
            "place/details/json",
            [
                ("place_id", place_id.to_owned()),
                ("fields", DETAIL_FIELDS.to_owned()),
                ("key", self.config.api_key.clone()),
            ],
        )
    }

    /// Search places by free text, optionally biased towards `near`.
    ///
    /// Each place takes its category from the first type Google reports.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Service`] for statuses other than `OK` and
    /// `ZERO_RESULTS`, and transport or decoding errors as they occur.
    pub fn text_search(
        &self,
        text: &str,
        near: Option<&PlaceLocation>,
    ) -> Result<Vec<Place>, ProviderError> {
        let url = self.text_search_url(text, near)?;
        let response: PlacesResponse = self.http.get_json(&url)?;
        if !check_status(&response.status, response.error_message)? {
            return Ok(Vec::new());
        }
        let places: Vec<Place> = response
            .results
            .into_iter()
            .map(WirePlace::into_typed_place)
            .collect();
        log::debug!("google text search {text:?}: {} results", places.len());
        Ok(places)
    }

    /// Fetch extended information for `place_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Service`] unless the status is `OK` with a
    /// result, and transport or decoding errors as they occur.
    pub fn details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError> {
        let url = self.details_url(place_id)?;
        let response: DetailsResponse = self.http.get_json(&url)?;
        convert_details(response, place_id)
    }
}

fn convert_details(
    response: DetailsResponse,
    place_id: &str,
) -> Result<PlaceDetails, ProviderError> {
    let status = response.status;
    let found = check_status(&status, response.error_message)?;
    response
        .result
        .filter(|_| found)
        .map(|result| result.into_details(place_id))
        .ok_or_else(|| ProviderError::Service {
            status,
            message: format!("no details for place {place_id}"),
        })
}

fn convert_response(
    response: PlacesResponse,
    query: &PlaceQuery,
) -> Result<Vec<Place>, ProviderError> {
    if !check_status(&response.status, response.error_message)? {
        return Ok(Vec::new());
    }
    let places = response
        .results
        .into_iter()
        .map(|place| WirePlace::into_place(place, query.place_type.clone()))
        .collect();
    Ok(query.filter.rank(places))
}

impl PlacesProvider for GooglePlacesProvider {
    fn get_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, ProviderError> {
        let url = self.request_url(query)?;
        let response: PlacesResponse = self.http.get_json(&url)?;
        let places = convert_response(response, query)?;
        log::debug!(
            "google places {} near {}: {} results",
            query.place_type,
            query.location,
            places.len()
        );
        Ok(places)
    }
}
