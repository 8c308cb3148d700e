//! Facade crate for the Tripwise travel-itinerary engine.
//!
//! This crate re-exports the core domain types and exposes the planner and
//! the HTTP provider adapters behind feature flags.

#![forbid(unsafe_code)]

pub use tripwise_core::{
    Activity, ActivityType, AnalyzerConfig, CostError, CostModel, Currency, DayPlan,
    DirectionsProvider, DirectionsQuery, FareTable, Itinerary, Leg, MalformedStepPolicy, Place,
    PlaceFilter, PlaceQuery, PlaceType, PlacesProvider, Preferences, PreferencesInput,
    ProviderError, RequestValidationError, Route, RouteAnalysis, RouteAnalyzer, RouteMetrics,
    RouteSelection, Savings, Step, Strategy, TimeDifference, TimeSlot, TravelMode, TripRequest,
    TripRequestInput,
};

#[cfg(feature = "planner")]
pub use tripwise_planner::{PlanError, Planner, PlannerConfig, TripPlan, TripPlanner};

#[cfg(feature = "providers-http")]
pub use tripwise_data::{
    GoogleDirectionsProvider, GooglePlacesProvider, NominatimGeocoder, OsrmDirectionsProvider,
    OverpassPlacesProvider, PlaceDetails, PlaceReview, ProviderBuildError, ReverseGeocoded,
};
