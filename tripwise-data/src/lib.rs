//! HTTP provider adapters for the Tripwise engine.
//!
//! Every adapter implements [`tripwise_core::DirectionsProvider`] or
//! [`tripwise_core::PlacesProvider`] and normalises upstream payloads into
//! the core route and place schema. Two families are provided:
//!
//! - [`google`]: Directions, Places Nearby and Text Search, and Place
//!   Details. Transit-aware, rated places, requires an API key.
//! - [`osm`]: OSRM routing with Nominatim geocoding, and Overpass place
//!   search. Keyless, driving-only routes, unrated places.
//!
//! Adapters are blocking. Each owns a small Tokio runtime and reuses the
//! caller's runtime when invoked from a multi-threaded one.

pub mod google;
mod http;
pub mod osm;

pub use google::{
    GoogleConfig, GoogleDirectionsProvider, GooglePlacesProvider, PlaceDetails, PlaceReview,
};
pub use http::{DEFAULT_USER_AGENT, ProviderBuildError};
pub use osm::{
    GeocodedPlace, NominatimGeocoder, OsmConfig, OsrmDirectionsProvider, OverpassPlacesProvider,
    ReverseGeocoded,
};
