//! Builders and deterministic providers used by unit and behaviour tests.
//!
//! Route builders produce Seoul-to-Busan legs with the supplied steps. The
//! stub providers return canned responses and record every query so tests
//! can assert on call patterns without network access.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use geo::Coord;

use crate::location::from_lat_lng;
use crate::{
    DirectionsProvider, DirectionsQuery, Leg, Place, PlaceQuery, PlaceType, PlacesProvider,
    ProviderError, Route, Step, TransitDetails, TravelMode,
};

/// Seoul Station.
pub const ORIGIN: Coord<f64> = from_lat_lng(37.5547, 126.9706);
/// Busan Station, the anchor of every built leg.
pub const DESTINATION: Coord<f64> = from_lat_lng(35.1151, 129.0422);

/// A transit ride on `vehicle` covering `distance_meters` in ten minutes.
#[must_use]
pub fn transit_step(vehicle: &str, distance_meters: u64) -> Step {
    let mut details = TransitDetails::new(vehicle, format!("{vehicle} line"));
    details.departure_stop = "Departure stop".to_owned();
    details.arrival_stop = "Arrival stop".to_owned();
    Step::new(TravelMode::Transit, distance_meters, 600).with_transit(details)
}

/// A five-minute walk of `distance_meters`.
#[must_use]
pub const fn walking_step(distance_meters: u64) -> Step {
    Step::new(TravelMode::Walking, distance_meters, 300)
}

/// A thirty-minute drive of `distance_meters`.
#[must_use]
pub const fn driving_step(distance_meters: u64) -> Step {
    Step::new(TravelMode::Driving, distance_meters, 1_800)
}

/// A Seoul-to-Busan leg lasting `duration_seconds` made of `steps`.
///
/// The leg distance is the sum of the step distances.
#[must_use]
pub fn leg_with_steps(duration_seconds: u64, steps: Vec<Step>) -> Leg {
    let distance = steps.iter().filter_map(|step| step.distance_meters).sum();
    Leg::new(ORIGIN, DESTINATION, distance, duration_seconds).with_steps(steps)
}

/// A single-leg route whose duration is the sum of its step durations.
#[must_use]
pub fn route_from_steps(steps: Vec<Step>) -> Route {
    let duration = steps.iter().filter_map(|step| step.duration_seconds).sum();
    Route::single_leg(leg_with_steps(duration, steps), None)
}

/// A single-ride route lasting `minutes`.
#[must_use]
pub fn transit_route(vehicle: &str, distance_meters: u64, minutes: u64) -> Route {
    let steps = vec![walking_step(250), transit_step(vehicle, distance_meters)];
    Route::single_leg(leg_with_steps(minutes * 60, steps), None)
}

/// A rated place of `category` near the destination.
#[must_use]
pub fn rated_place(name: &str, category: PlaceType, rating: f32) -> Place {
    Place::new(name, DESTINATION, "Jung-gu, Busan", category).with_rating(rating)
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Stub [`DirectionsProvider`] returning canned routes per origin and
/// destination pair.
///
/// Unknown pairs yield no routes.
#[derive(Debug, Default)]
pub struct StubDirectionsProvider {
    routes: HashMap<(String, String), Vec<Route>>,
    error: Option<ProviderError>,
    queries: Mutex<Vec<DirectionsQuery>>,
}

impl StubDirectionsProvider {
    /// Return `routes` for trips from `origin` to `destination`.
    #[must_use]
    pub fn with_routes(
        mut self,
        origin: impl Into<String>,
        destination: impl Into<String>,
        routes: Vec<Route>,
    ) -> Self {
        self.routes.insert((origin.into(), destination.into()), routes);
        self
    }

    /// Fail every call with `error`.
    #[must_use]
    pub fn with_error(mut self, error: ProviderError) -> Self {
        self.error = Some(error);
        self
    }

    /// Queries received so far, in call order.
    #[must_use]
    pub fn queries(&self) -> Vec<DirectionsQuery> {
        lock(&self.queries).clone()
    }
}

impl DirectionsProvider for StubDirectionsProvider {
    fn get_directions(&self, query: &DirectionsQuery) -> Result<Vec<Route>, ProviderError> {
        lock(&self.queries).push(query.clone());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        let key = (query.origin.clone(), query.destination.clone());
        Ok(self.routes.get(&key).cloned().unwrap_or_default())
    }
}

/// Stub [`PlacesProvider`] returning canned places per category.
///
/// Results are returned unfiltered so callers exercise their own ranking.
#[derive(Debug, Default)]
pub struct StubPlacesProvider {
    places: HashMap<PlaceType, Vec<Place>>,
    error: Option<ProviderError>,
    queries: Mutex<Vec<PlaceQuery>>,
}

impl StubPlacesProvider {
    /// Return `places` for searches of `place_type`.
    #[must_use]
    pub fn with_places(mut self, place_type: PlaceType, places: Vec<Place>) -> Self {
        self.places.insert(place_type, places);
        self
    }

    /// Fail every call with `error`.
    #[must_use]
    pub fn with_error(mut self, error: ProviderError) -> Self {
        self.error = Some(error);
        self
    }

    /// Queries received so far, in call order.
    #[must_use]
    pub fn queries(&self) -> Vec<PlaceQuery> {
        lock(&self.queries).clone()
    }

    /// Number of searches for `place_type`.
    #[must_use]
    pub fn count_for(&self, place_type: &PlaceType) -> usize {
        lock(&self.queries)
            .iter()
            .filter(|query| &query.place_type == place_type)
            .count()
    }
}

impl PlacesProvider for StubPlacesProvider {
    fn get_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, ProviderError> {
        lock(&self.queries).push(query.clone());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.places.get(&query.place_type).cloned().unwrap_or_default())
    }
}
