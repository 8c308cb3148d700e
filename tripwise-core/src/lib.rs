//! Core domain types for the Tripwise engine.
//!
//! The crate holds everything that makes a decision without touching the
//! network: the normalised route and place schema shared by all providers,
//! the fare-based [`CostModel`], the [`RouteAnalyzer`] that picks the
//! cheapest, fastest and best-value candidates, and the provider traits that
//! adapters implement.
//!
//! Constructors return `Result` to surface invalid input early.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod analysis;
pub mod cost;
pub mod itinerary;
pub mod location;
pub mod place;
pub mod preferences;
pub mod provider;
pub mod request;
pub mod route;

#[doc(hidden)]
pub mod test_support;

pub use analysis::{
    AnalyzerConfig, ParseStrategyError, Recommendations, RouteAnalysis, RouteAnalyzer,
    RouteMetrics, RouteSelection, Savings, Strategy, TimeDifference, format_duration,
};
pub use cost::{CostError, CostModel, Currency, FareTable, MalformedStepPolicy, SymbolPosition};
pub use itinerary::{Activity, ActivityType, DayPlan, Itinerary, ParseTimeSlotError, TimeSlot};
pub use place::{Place, PlaceFilter, PlaceLocation, PlaceQuery, PlaceType};
pub use preferences::{Preferences, PreferencesInput};
pub use provider::{DirectionsProvider, DirectionsQuery, PlacesProvider, ProviderError};
pub use request::{DurationInput, RequestValidationError, TripRequest, TripRequestInput};
pub use route::{Leg, Route, RouteError, Step, TransitDetails, TravelMode, VehicleType};
