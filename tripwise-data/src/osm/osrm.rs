//! Road routing through OSRM.

use std::sync::Arc;

use tripwise_core::location::format_lat_lng;
use tripwise_core::{
    DirectionsProvider, DirectionsQuery, Leg, ProviderError, Route, Step, TravelMode,
};
use url::Url;

use super::nominatim::{GeocodedPlace, NominatimGeocoder};
use super::wire::{OSRM_OK, OsrmResponse, OsrmRoute, OsrmStep};
use super::{OsmConfig, whole_units};
use crate::http::{HttpClient, ProviderBuildError, endpoint};

/// Directions provider backed by OSRM's `route` service.
///
/// Origin and destination are geocoded with Nominatim first. Every route is
/// a single `DRIVING` leg, so it costs nothing under the fare table and has
/// no transfers. The query's mode and departure time are ignored.
#[derive(Debug)]
pub struct OsrmDirectionsProvider {
    http: Arc<HttpClient>,
    geocoder: NominatimGeocoder,
    base_url: String,
}

impl OsrmDirectionsProvider {
    /// Create a provider from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when a base URL is invalid or the HTTP
    /// client or runtime cannot be constructed.
    pub fn new(config: &OsmConfig) -> Result<Self, ProviderBuildError> {
        let http = config.connect()?;
        Ok(Self {
            geocoder: NominatimGeocoder::shared(Arc::clone(&http), config),
            http,
            base_url: config.osrm_url.clone(),
        })
    }

    fn request_url(&self, from: &GeocodedPlace, to: &GeocodedPlace) -> Result<Url, ProviderError> {
        let path = format!(
            "route/v1/driving/{},{};{},{}",
            from.location.x, from.location.y, to.location.x, to.location.y
        );
        endpoint(
            &self.base_url,
            &path,
            [
                ("alternatives", "true".to_owned()),
                ("steps", "true".to_owned()),
                ("overview", "false".to_owned()),
            ],
        )
    }
}

/// Wrap each OSRM route as one driving leg between the geocoded endpoints.
fn convert_response(
    response: OsrmResponse,
    from: &GeocodedPlace,
    to: &GeocodedPlace,
    summary: &str,
) -> Result<Vec<Route>, ProviderError> {
    if response.code != OSRM_OK {
        return Err(ProviderError::Service {
            status: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    Ok(response
        .routes
        .into_iter()
        .map(|route| convert_route(route, from, to, summary))
        .collect())
}

fn convert_route(
    route: OsrmRoute,
    from: &GeocodedPlace,
    to: &GeocodedPlace,
    summary: &str,
) -> Route {
    let distance = whole_units(route.distance);
    let duration = whole_units(route.duration);
    let mut steps: Vec<Step> = route
        .legs
        .into_iter()
        .next()
        .map(|leg| leg.steps.into_iter().map(convert_step).collect())
        .unwrap_or_default();
    if steps.is_empty() {
        steps.push(Step::new(TravelMode::Driving, distance, duration));
    }
    let mut leg = Leg::new(from.location, to.location, distance, duration).with_steps(steps);
    leg.start_address = Some(from.display_name.clone());
    leg.end_address = Some(to.display_name.clone());
    Route::single_leg(leg, Some(summary.to_owned()))
}

fn convert_step(step: OsrmStep) -> Step {
    Step::new(
        TravelMode::Driving,
        whole_units(step.distance),
        whole_units(step.duration),
    )
    .with_instructions(step.instruction())
}

impl DirectionsProvider for OsrmDirectionsProvider {
    fn get_directions(&self, query: &DirectionsQuery) -> Result<Vec<Route>, ProviderError> {
        let from = self.geocoder.geocode(&query.origin)?;
        let to = self.geocoder.geocode(&query.destination)?;
        let url = self.request_url(&from, &to)?;
        let response: OsrmResponse = self.http.get_json(&url)?;
        let summary = format!("Route via {} to {}", query.origin, query.destination);
        let routes = convert_response(response, &from, &to, &summary)?;
        log::debug!(
            "osrm {} -> {}: {} routes",
            format_lat_lng(from.location),
            format_lat_lng(to.location),
            routes.len()
        );
        Ok(routes)
    }
}
