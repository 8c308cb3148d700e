//! Coordinate helpers shared by the route and place schema.
//!
//! Coordinates are WGS84 `geo::Coord<f64>` values with `x = longitude` and
//! `y = latitude`. On the wire they are written as `{ "lat": .., "lng": .. }`
//! so that every provider produces the same JSON shape.

use geo::Coord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<Coord<f64>> for LatLng {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }
}

impl From<LatLng> for Coord<f64> {
    fn from(value: LatLng) -> Self {
        Self {
            x: value.lng,
            y: value.lat,
        }
    }
}

/// Build a coordinate from latitude and longitude, in that order.
///
/// # Examples
/// ```
/// use tripwise_core::location::from_lat_lng;
///
/// let coord = from_lat_lng(37.5, 127.0);
/// assert_eq!(coord.x, 127.0);
/// assert_eq!(coord.y, 37.5);
/// ```
#[must_use]
pub const fn from_lat_lng(lat: f64, lng: f64) -> Coord<f64> {
    Coord { x: lng, y: lat }
}

/// Parse a `"lat,lng"` pair.
///
/// Returns `None` when the text is not two finite numbers separated by a
/// comma, or when the values fall outside the WGS84 range.
///
/// # Examples
/// ```
/// use tripwise_core::location::parse_lat_lng;
///
/// let coord = parse_lat_lng("37.5665, 126.978").expect("valid pair");
/// assert_eq!(coord.y, 37.5665);
/// assert!(parse_lat_lng("Seoul Station").is_none());
/// ```
#[must_use]
pub fn parse_lat_lng(text: &str) -> Option<Coord<f64>> {
    let (lat_text, lng_text) = text.split_once(',')?;
    let lat: f64 = lat_text.trim().parse().ok()?;
    let lng: f64 = lng_text.trim().parse().ok()?;
    let valid = lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng);
    valid.then_some(from_lat_lng(lat, lng))
}

/// Render a coordinate as `"lat,lng"`.
#[must_use]
pub fn format_lat_lng(coord: Coord<f64>) -> String {
    format!("{},{}", coord.y, coord.x)
}

/// Serde adapter writing a coordinate as `{ "lat", "lng" }`.
pub mod lat_lng {
    use super::{Coord, Deserialize, Deserializer, LatLng, Serialize, Serializer};

    /// Serialise `coord` as a latitude/longitude object.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(coord: &Coord<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        LatLng::from(*coord).serialize(serializer)
    }

    /// Deserialise a latitude/longitude object.
    ///
    /// # Errors
    ///
    /// Fails when the object lacks numeric `lat` and `lng` fields.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Coord<f64>, D::Error> {
        LatLng::deserialize(deserializer).map(Coord::from)
    }
}

/// Serde adapter writing a coordinate as `{ "location": { "lat", "lng" } }`.
///
/// Used for the `geometry` field of places, matching the nearby-search shape
/// most place providers emit.
pub mod geometry {
    use super::{Coord, Deserialize, Deserializer, LatLng, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Geometry {
        location: LatLng,
    }

    /// Serialise `coord` wrapped in a `location` object.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(coord: &Coord<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        Geometry {
            location: LatLng::from(*coord),
        }
        .serialize(serializer)
    }

    /// Deserialise a `location` object.
    ///
    /// # Errors
    ///
    /// Fails when the nested location is missing or malformed.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Coord<f64>, D::Error> {
        Geometry::deserialize(deserializer).map(|geometry| geometry.location.into())
    }
}
