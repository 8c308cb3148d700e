//! Places returned by places providers and the queries that fetch them.
//!
//! Every provider normalises its results into [`Place`], whose JSON form is
//! `{ name, geometry: { location: { lat, lng } }, vicinity, rating, priceLevel }`
//! regardless of upstream origin. Providers without ratings assign a fixed
//! default so results survive a minimum-rating filter.
//!
//! # Examples
//! ```
//! use tripwise_core::PlaceType;
//!
//! assert_eq!(PlaceType::ShoppingMall.as_str(), "shopping_mall");
//! assert_eq!(PlaceType::from("night_club"), PlaceType::NightClub);
//! ```

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::location::{format_lat_lng, parse_lat_lng};

/// Category of place requested from a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlaceType {
    /// Sightseeing spots.
    TouristAttraction,
    /// Places to eat.
    Restaurant,
    /// Shopping centres.
    ShoppingMall,
    /// Bars and clubs.
    NightClub,
    /// Any other provider category, kept verbatim.
    Other(String),
}

impl PlaceType {
    /// Return the snake-case category name used by place search APIs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::TouristAttraction => "tourist_attraction",
            Self::Restaurant => "restaurant",
            Self::ShoppingMall => "shopping_mall",
            Self::NightClub => "night_club",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for PlaceType {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "tourist_attraction" => Self::TouristAttraction,
            "restaurant" => Self::Restaurant,
            "shopping_mall" => Self::ShoppingMall,
            "night_club" => Self::NightClub,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for PlaceType {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<PlaceType> for String {
    fn from(value: PlaceType) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// A point of interest in the normalised place schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Display name.
    pub name: String,
    /// Coordinates, written as `geometry.location`.
    #[serde(rename = "geometry", with = "crate::location::geometry")]
    pub location: Coord<f64>,
    /// Short address.
    pub vicinity: String,
    /// Rating between 0 and 5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Price level between 1 and 4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    /// Category the place was found under.
    pub category: PlaceType,
    /// Provider identifier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl Place {
    /// Construct an unrated place of `category` at `location`.
    pub fn new(
        name: impl Into<String>,
        location: Coord<f64>,
        vicinity: impl Into<String>,
        category: PlaceType,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            vicinity: vicinity.into(),
            rating: None,
            price_level: None,
            category,
            place_id: None,
        }
    }

    /// Set the rating, returning `self` for chaining.
    #[must_use]
    pub const fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set the price level, returning `self` for chaining.
    #[must_use]
    pub const fn with_price_level(mut self, price_level: u8) -> Self {
        self.price_level = Some(price_level);
        self
    }

    fn rating_or_zero(&self) -> f32 {
        self.rating.unwrap_or(0.0)
    }
}

/// Rating and price constraints applied to place results.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceFilter {
    /// Minimum rating; places without a rating count as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f32>,
    /// Maximum price level; places without a price level always pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price_level: Option<u8>,
}

impl PlaceFilter {
    /// Whether `place` satisfies both constraints.
    #[must_use]
    pub fn accepts(&self, place: &Place) -> bool {
        let rated = self
            .min_rating
            .is_none_or(|min| place.rating_or_zero() >= min);
        let priced = match (self.max_price_level, place.price_level) {
            (Some(max), Some(level)) => level <= max,
            _ => true,
        };
        rated && priced
    }

    /// Filter `places` and sort the survivors by rating, highest first.
    ///
    /// The sort is stable: equally rated places keep their provider order.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use tripwise_core::{Place, PlaceFilter, PlaceType};
    ///
    /// let at = |name: &str, rating: f32| {
    ///     Place::new(name, Coord::zero(), "", PlaceType::Restaurant).with_rating(rating)
    /// };
    /// let filter = PlaceFilter { min_rating: Some(4.0), max_price_level: Some(2) };
    /// let ranked = filter.rank(vec![
    ///     at("ok", 4.1),
    ///     at("poor", 3.2),
    ///     at("pricey", 4.9).with_price_level(4),
    ///     at("great", 4.7),
    /// ]);
    /// let names: Vec<_> = ranked.iter().map(|p| p.name.as_str()).collect();
    /// assert_eq!(names, ["great", "ok"]);
    /// ```
    #[must_use]
    pub fn rank(&self, mut places: Vec<Place>) -> Vec<Place> {
        places.retain(|place| self.accepts(place));
        places.sort_by(|a, b| descending_rating(a, b));
        places
    }
}

fn descending_rating(a: &Place, b: &Place) -> Ordering {
    b.rating_or_zero().total_cmp(&a.rating_or_zero())
}

/// Where to search for places: coordinates or free text to be geocoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlaceLocation {
    /// A known coordinate.
    Coordinates(Coord<f64>),
    /// An address or place name.
    Text(String),
}

impl From<Coord<f64>> for PlaceLocation {
    fn from(value: Coord<f64>) -> Self {
        Self::Coordinates(value)
    }
}

impl From<String> for PlaceLocation {
    fn from(value: String) -> Self {
        parse_lat_lng(&value).map_or(Self::Text(value), Self::Coordinates)
    }
}

impl From<&str> for PlaceLocation {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<PlaceLocation> for String {
    fn from(value: PlaceLocation) -> Self {
        value.to_string()
    }
}

impl FromStr for PlaceLocation {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for PlaceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates(coord) => f.write_str(&format_lat_lng(*coord)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Default search radius in metres.
pub const DEFAULT_RADIUS_METERS: u32 = 5_000;

/// A nearby-search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceQuery {
    /// Centre of the search.
    pub location: PlaceLocation,
    /// Search radius in metres.
    pub radius_meters: u32,
    /// Category to search for.
    pub place_type: PlaceType,
    /// Free-text keyword; `None` means no keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Constraints applied to results.
    #[serde(default)]
    pub filter: PlaceFilter,
}

impl PlaceQuery {
    /// Search for `place_type` around `location` within the default radius.
    pub fn new(location: impl Into<PlaceLocation>, place_type: PlaceType) -> Self {
        Self {
            location: location.into(),
            radius_meters: DEFAULT_RADIUS_METERS,
            place_type,
            keyword: None,
            filter: PlaceFilter::default(),
        }
    }

    /// Set the radius, returning `self` for chaining.
    #[must_use]
    pub const fn with_radius(mut self, radius_meters: u32) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    /// Set the keyword, returning `self` for chaining. Blank keywords clear it.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let text = keyword.into();
        self.keyword = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Set the filter, returning `self` for chaining.
    #[must_use]
    pub const fn with_filter(mut self, filter: PlaceFilter) -> Self {
        self.filter = filter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::from_lat_lng;
    use rstest::rstest;

    fn place(name: &str, rating: Option<f32>, price_level: Option<u8>) -> Place {
        Place {
            rating,
            price_level,
            ..Place::new(name, Coord::zero(), "Jung-gu", PlaceType::Restaurant)
        }
    }

    #[rstest]
    #[case::missing_rating_fails(None, None, false)]
    #[case::below_minimum(Some(3.9), None, false)]
    #[case::at_minimum(Some(4.0), None, true)]
    #[case::missing_price_passes(Some(4.5), None, true)]
    #[case::cheap_enough(Some(4.5), Some(2), true)]
    #[case::too_expensive(Some(4.5), Some(3), false)]
    fn filter_applies_rating_and_price(
        #[case] rating: Option<f32>,
        #[case] price_level: Option<u8>,
        #[case] accepted: bool,
    ) {
        let filter = PlaceFilter {
            min_rating: Some(4.0),
            max_price_level: Some(2),
        };
        assert_eq!(filter.accepts(&place("x", rating, price_level)), accepted);
    }

    #[rstest]
    fn missing_rating_passes_without_minimum() {
        let filter = PlaceFilter::default();
        assert!(filter.accepts(&place("x", None, Some(4))));
    }

    #[rstest]
    fn ranking_is_stable_for_equal_ratings() {
        let ranked = PlaceFilter::default().rank(vec![
            place("first", Some(4.2), None),
            place("unrated", None, None),
            place("second", Some(4.2), None),
            place("best", Some(4.8), None),
        ]);
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["best", "first", "second", "unrated"]);
    }

    #[rstest]
    #[case("37.5665,126.978", PlaceLocation::Coordinates(from_lat_lng(37.5665, 126.978)))]
    #[case("Haeundae Beach", PlaceLocation::Text("Haeundae Beach".into()))]
    fn location_parses_coordinates_or_text(#[case] input: &str, #[case] expected: PlaceLocation) {
        assert_eq!(PlaceLocation::from(input), expected);
    }

    #[rstest]
    fn blank_keyword_is_dropped() {
        let query = PlaceQuery::new("Busan", PlaceType::Restaurant).with_keyword("  ");
        assert_eq!(query.keyword, None);
        assert_eq!(query.radius_meters, DEFAULT_RADIUS_METERS);
    }

    #[rstest]
    fn place_serialises_with_geometry() {
        let venue = place("Gwangjang Market", Some(4.4), Some(1));
        let json = serde_json::to_value(&venue).expect("serialise place");
        assert_eq!(json["geometry"]["location"]["lat"], 0.0);
        assert_eq!(json["priceLevel"], 1);
        assert_eq!(json["category"], "restaurant");
        let decoded: Place = serde_json::from_value(json).expect("deserialise place");
        assert_eq!(decoded, venue);
    }
}
