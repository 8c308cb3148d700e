//! Normalised route schema shared by every directions provider.
//!
//! A [`Route`] is an ordered sequence of [`Leg`]s, each made of [`Step`]s.
//! Transit-capable providers fill in [`TransitDetails`] for transit rides;
//! driving-only providers produce a single `DRIVING` leg.

use std::fmt;

use chrono::{DateTime, Utc};
use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::location::lat_lng;

/// How a step is travelled.
///
/// Serialised as the upper-case mode names used by most directions APIs
/// (`"TRANSIT"`, `"WALKING"`, ...). Unknown names are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TravelMode {
    /// Public transport ride.
    #[default]
    Transit,
    /// On foot.
    Walking,
    /// By car.
    Driving,
    /// By bicycle.
    Bicycling,
    /// Any mode this schema does not model explicitly.
    Other(String),
}

impl TravelMode {
    /// Return the upper-case wire name.
    ///
    /// # Examples
    /// ```
    /// use tripwise_core::TravelMode;
    ///
    /// assert_eq!(TravelMode::Transit.as_str(), "TRANSIT");
    /// ```
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Transit => "TRANSIT",
            Self::Walking => "WALKING",
            Self::Driving => "DRIVING",
            Self::Bicycling => "BICYCLING",
            Self::Other(name) => name,
        }
    }

    /// Return the lower-case name used in directions query strings.
    #[must_use]
    pub fn query_name(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl From<String> for TravelMode {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "TRANSIT" => Self::Transit,
            "WALKING" => Self::Walking,
            "DRIVING" => Self::Driving,
            "BICYCLING" => Self::Bicycling,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for TravelMode {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<TravelMode> for String {
    fn from(mode: TravelMode) -> Self {
        mode.as_str().to_owned()
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of vehicle serving a transit step, normalised to upper case.
///
/// Providers report names such as `"SUBWAY"`, `"BUS"` or
/// `"HIGH_SPEED_TRAIN"`; the fare table is keyed by these names.
///
/// # Examples
/// ```
/// use tripwise_core::VehicleType;
///
/// let vehicle = VehicleType::new("heavy_rail");
/// assert_eq!(vehicle.as_str(), "HEAVY_RAIL");
/// assert!(vehicle.is_rail());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VehicleType(String);

impl VehicleType {
    /// Normalise `name` into a vehicle type.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_uppercase())
    }

    /// Return the normalised name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the vehicle runs on rails and is charged by distance.
    ///
    /// Any name containing `TRAIN` or `RAIL` qualifies.
    #[must_use]
    pub fn is_rail(&self) -> bool {
        self.0.contains("TRAIN") || self.0.contains("RAIL")
    }
}

impl From<String> for VehicleType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for VehicleType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<VehicleType> for String {
    fn from(value: VehicleType) -> Self {
        value.0
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Line, stops and times of a single transit ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitDetails {
    /// Vehicle serving the line.
    pub vehicle_type: VehicleType,
    /// Public line name, e.g. `"Line 2"` or `"KTX"`.
    pub line_name: String,
    /// Stop where the traveller boards.
    pub departure_stop: String,
    /// Stop where the traveller alights.
    pub arrival_stop: String,
    /// Scheduled departure, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DateTime<Utc>>,
    /// Scheduled arrival, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<DateTime<Utc>>,
    /// Number of stops ridden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_stops: Option<u32>,
}

impl TransitDetails {
    /// Describe a ride on `line_name` by `vehicle_type` with unnamed stops
    /// and no schedule.
    pub fn new(vehicle_type: impl Into<VehicleType>, line_name: impl Into<String>) -> Self {
        Self {
            vehicle_type: vehicle_type.into(),
            line_name: line_name.into(),
            departure_stop: String::new(),
            arrival_stop: String::new(),
            departure_time: None,
            arrival_time: None,
            num_stops: None,
        }
    }
}

/// One atomic movement within a leg.
///
/// Distance and duration are optional because upstream data is not always
/// complete; the cost model decides how to treat gaps on transit steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Mode of travel.
    pub travel_mode: TravelMode,
    /// Distance covered in metres.
    #[serde(default)]
    pub distance_meters: Option<u64>,
    /// Time taken in seconds.
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    /// Human-readable instruction, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Transit metadata; only present for transit rides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit: Option<TransitDetails>,
}

impl Step {
    /// Construct a step of `travel_mode` with known distance and duration.
    ///
    /// # Examples
    /// ```
    /// use tripwise_core::{Step, TravelMode};
    ///
    /// let step = Step::new(TravelMode::Walking, 400, 300);
    /// assert!(!step.is_transit());
    /// ```
    #[must_use]
    pub const fn new(travel_mode: TravelMode, distance_meters: u64, duration_seconds: u64) -> Self {
        Self {
            travel_mode,
            distance_meters: Some(distance_meters),
            duration_seconds: Some(duration_seconds),
            instructions: None,
            transit: None,
        }
    }

    /// Attach transit details, returning `self` for chaining.
    #[must_use]
    pub fn with_transit(mut self, transit: TransitDetails) -> Self {
        self.transit = Some(transit);
        self
    }

    /// Attach an instruction, returning `self` for chaining.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Whether the step is a transit ride.
    #[must_use]
    pub fn is_transit(&self) -> bool {
        self.travel_mode == TravelMode::Transit
    }
}

/// One origin-to-destination segment of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    /// Total distance in metres.
    pub distance_meters: u64,
    /// Total duration in seconds.
    pub duration_seconds: u64,
    /// Where the leg starts.
    #[serde(with = "lat_lng")]
    pub start_location: Coord<f64>,
    /// Where the leg ends.
    #[serde(with = "lat_lng")]
    pub end_location: Coord<f64>,
    /// Provider-formatted start address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_address: Option<String>,
    /// Provider-formatted end address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_address: Option<String>,
    /// Ordered steps.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Leg {
    /// Construct a leg between two points with no steps or addresses.
    ///
    /// # Examples
    /// ```
    /// use tripwise_core::Leg;
    /// use tripwise_core::location::from_lat_lng;
    ///
    /// let leg = Leg::new(from_lat_lng(37.55, 126.97), from_lat_lng(35.11, 129.04), 390_000, 9_000);
    /// assert_eq!(leg.transit_step_count(), 0);
    /// ```
    #[must_use]
    pub const fn new(
        start_location: Coord<f64>,
        end_location: Coord<f64>,
        distance_meters: u64,
        duration_seconds: u64,
    ) -> Self {
        Self {
            distance_meters,
            duration_seconds,
            start_location,
            end_location,
            start_address: None,
            end_address: None,
            steps: Vec::new(),
        }
    }

    /// Replace the steps, returning `self` for chaining.
    #[must_use]
    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Number of transit rides in the leg.
    #[must_use]
    pub fn transit_step_count(&self) -> usize {
        self.steps.iter().filter(|step| step.is_transit()).count()
    }
}

/// Errors returned by [`Route::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No legs were supplied.
    #[error("route must contain at least one leg")]
    NoLegs,
    /// A leg has no steps.
    #[error("leg {index} has no steps")]
    EmptyLeg {
        /// Zero-based position of the offending leg.
        index: usize,
    },
}

/// Serialised form of a [`Route`]; validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RouteRecord {
    legs: Vec<Leg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
}

/// A candidate route returned by a directions provider.
///
/// The first leg is stored separately so the "at least one leg" invariant
/// holds by construction.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tripwise_core::{Leg, Route};
///
/// # fn main() -> Result<(), tripwise_core::RouteError> {
/// let leg = Leg::new(Coord { x: 127.0, y: 37.5 }, Coord { x: 127.01, y: 37.51 }, 1_000, 600);
/// let route = Route::new(vec![leg], None)?;
/// assert_eq!(route.first_leg().duration_seconds, 600);
/// assert!(Route::new(Vec::new(), None).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RouteRecord", into = "RouteRecord")]
pub struct Route {
    first_leg: Leg,
    further_legs: Vec<Leg>,
    summary: Option<String>,
}

impl Route {
    /// Validates and constructs a [`Route`].
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NoLegs`] when `legs` is empty and
    /// [`RouteError::EmptyLeg`] when any leg has no steps.
    pub fn new(legs: Vec<Leg>, summary: Option<String>) -> Result<Self, RouteError> {
        if let Some(index) = legs.iter().position(|leg| leg.steps.is_empty()) {
            return Err(RouteError::EmptyLeg { index });
        }
        let mut remaining = legs.into_iter();
        let first_leg = remaining.next().ok_or(RouteError::NoLegs)?;
        Ok(Self {
            first_leg,
            further_legs: remaining.collect(),
            summary,
        })
    }

    /// Construct a single-leg route.
    ///
    /// Unlike [`Self::new`] this does not check that `leg` has steps; a
    /// stepless leg costs nothing and has no transfers.
    #[must_use]
    pub const fn single_leg(leg: Leg, summary: Option<String>) -> Self {
        Self {
            first_leg: leg,
            further_legs: Vec::new(),
            summary,
        }
    }

    /// The leg used for duration, distance, arrival and anchoring.
    #[must_use]
    pub const fn first_leg(&self) -> &Leg {
        &self.first_leg
    }

    /// Iterate over every leg in order.
    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        std::iter::once(&self.first_leg).chain(self.further_legs.iter())
    }

    /// Provider summary, e.g. the main road or line.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

impl TryFrom<RouteRecord> for Route {
    type Error = RouteError;

    fn try_from(record: RouteRecord) -> Result<Self, Self::Error> {
        Self::new(record.legs, record.summary)
    }
}

impl From<Route> for RouteRecord {
    fn from(route: Route) -> Self {
        let mut legs = Vec::with_capacity(route.further_legs.len() + 1);
        legs.push(route.first_leg);
        legs.extend(route.further_legs);
        Self {
            legs,
            summary: route.summary,
        }
    }
}
