//! Google Maps web service payloads.
//!
//! Only the fields the engine consumes are modelled; everything else in the
//! response is ignored.
//!
//! See: <https://developers.google.com/maps/documentation/directions/get-directions>

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tripwise_core::location::from_lat_lng;
use tripwise_core::{Leg, Place, PlaceType, Route, Step, TransitDetails, TravelMode};

use super::details::{PlaceDetails, PlaceReview};

/// Status for a successful call.
pub const STATUS_OK: &str = "OK";
/// Status for a valid call that matched nothing.
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A `{ value, text }` pair; only the numeric value is kept.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Quantity {
    pub value: u64,
}

/// Directions API response.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<WireRoute>,
}

#[derive(Debug, Deserialize)]
pub struct WireRoute {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub legs: Vec<WireLeg>,
}

#[derive(Debug, Deserialize)]
pub struct WireLeg {
    #[serde(default)]
    pub distance: Option<Quantity>,
    #[serde(default)]
    pub duration: Option<Quantity>,
    pub start_location: LatLng,
    pub end_location: LatLng,
    #[serde(default)]
    pub start_address: Option<String>,
    #[serde(default)]
    pub end_address: Option<String>,
    #[serde(default)]
    pub steps: Vec<WireStep>,
}

#[derive(Debug, Deserialize)]
pub struct WireStep {
    pub travel_mode: String,
    #[serde(default)]
    pub distance: Option<Quantity>,
    #[serde(default)]
    pub duration: Option<Quantity>,
    #[serde(default)]
    pub html_instructions: Option<String>,
    #[serde(default)]
    pub transit_details: Option<WireTransit>,
}

#[derive(Debug, Deserialize)]
pub struct WireTransit {
    #[serde(default)]
    pub line: Option<WireLine>,
    #[serde(default)]
    pub departure_stop: Option<WireStop>,
    #[serde(default)]
    pub arrival_stop: Option<WireStop>,
    #[serde(default)]
    pub departure_time: Option<WireTime>,
    #[serde(default)]
    pub arrival_time: Option<WireTime>,
    #[serde(default)]
    pub num_stops: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct WireLine {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub vehicle: Option<WireVehicle>,
}

#[derive(Debug, Deserialize)]
pub struct WireVehicle {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct WireStop {
    pub name: String,
}

/// Seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireTime {
    pub value: i64,
}

impl WireRoute {
    /// Normalise into a [`Route`]; `None` when the route has no legs or a leg
    /// has no steps.
    pub fn into_route(self) -> Option<Route> {
        let legs = self.legs.into_iter().map(WireLeg::into_leg).collect();
        Route::new(legs, self.summary.filter(|s| !s.is_empty())).ok()
    }
}

impl WireLeg {
    fn into_leg(self) -> Leg {
        let mut leg = Leg::new(
            from_lat_lng(self.start_location.lat, self.start_location.lng),
            from_lat_lng(self.end_location.lat, self.end_location.lng),
            self.distance.map_or(0, |d| d.value),
            self.duration.map_or(0, |d| d.value),
        )
        .with_steps(self.steps.into_iter().map(WireStep::into_step).collect());
        leg.start_address = self.start_address;
        leg.end_address = self.end_address;
        leg
    }
}

impl WireStep {
    fn into_step(self) -> Step {
        Step {
            travel_mode: TravelMode::from(self.travel_mode),
            distance_meters: self.distance.map(|d| d.value),
            duration_seconds: self.duration.map(|d| d.value),
            instructions: self.html_instructions,
            transit: self.transit_details.and_then(WireTransit::into_details),
        }
    }
}

impl WireTransit {
    /// `None` when the line or its vehicle is missing; such a step is left
    /// for the cost model's malformed-step policy.
    fn into_details(self) -> Option<TransitDetails> {
        let Some(WireLine {
            name,
            short_name,
            vehicle: Some(vehicle),
        }) = self.line
        else {
            log::debug!("transit step without a line vehicle");
            return None;
        };
        let line_name = short_name.or(name).unwrap_or_default();
        let mut details = TransitDetails::new(vehicle.kind, line_name);
        details.departure_stop = self.departure_stop.map(|s| s.name).unwrap_or_default();
        details.arrival_stop = self.arrival_stop.map(|s| s.name).unwrap_or_default();
        details.departure_time = self.departure_time.and_then(WireTime::to_utc);
        details.arrival_time = self.arrival_time.and_then(WireTime::to_utc);
        details.num_stops = self.num_stops;
        Some(details)
    }
}

impl WireTime {
    fn to_utc(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.value, 0)
    }
}

/// Places Nearby Search response.
#[derive(Debug, Deserialize)]
pub struct PlacesResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<WirePlace>,
}

#[derive(Debug, Deserialize)]
pub struct WirePlace {
    pub name: String,
    pub geometry: WireGeometry,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireGeometry {
    pub location: LatLng,
}

impl WirePlace {
    /// Normalise into a [`Place`] of `category`.
    pub fn into_place(self, category: PlaceType) -> Place {
        let vicinity = self
            .vicinity
            .or(self.formatted_address)
            .unwrap_or_default();
        let location = from_lat_lng(self.geometry.location.lat, self.geometry.location.lng);
        let mut place = Place::new(self.name, location, vicinity, category);
        place.rating = self.rating;
        place.price_level = self.price_level;
        place.place_id = self.place_id;
        place
    }

    /// Normalise a text-search hit, taking the category from its first
    /// reported type.
    pub fn into_typed_place(self) -> Place {
        let category = self
            .types
            .first()
            .map_or_else(|| PlaceType::from(GENERIC_TYPE), |name| PlaceType::from(name.as_str()));
        self.into_place(category)
    }
}

/// Category for text-search hits that report no type.
const GENERIC_TYPE: &str = "establishment";

/// Place Details response.
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<WireDetails>,
}

#[derive(Debug, Deserialize)]
pub struct WireDetails {
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<WireOpeningHours>,
    #[serde(default)]
    pub reviews: Vec<WireReview>,
    #[serde(default)]
    pub photos: Vec<WirePhoto>,
}

#[derive(Debug, Deserialize)]
pub struct WireOpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireReview {
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct WirePhoto {
    pub photo_reference: String,
}

impl WireDetails {
    /// Normalise into [`PlaceDetails`] for `place_id`.
    pub fn into_details(self, place_id: &str) -> PlaceDetails {
        let (open_now, opening_hours) = self
            .opening_hours
            .map_or((None, Vec::new()), |hours| (hours.open_now, hours.weekday_text));
        PlaceDetails {
            place_id: place_id.to_owned(),
            name: self.name,
            address: self.formatted_address.unwrap_or_default(),
            rating: self.rating,
            website: self.website,
            phone: self.formatted_phone_number,
            open_now,
            opening_hours,
            reviews: self
                .reviews
                .into_iter()
                .map(|review| PlaceReview {
                    author: review.author_name,
                    rating: review.rating,
                    text: review.text,
                })
                .collect(),
            photo_references: self.photos.into_iter().map(|p| p.photo_reference).collect(),
        }
    }
}
