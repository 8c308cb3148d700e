//! Place search through the Overpass API.

use std::sync::Arc;

use geo::Coord;
use tripwise_core::location::from_lat_lng;
use tripwise_core::{Place, PlaceLocation, PlaceQuery, PlaceType, PlacesProvider, ProviderError};
use url::Url;

use super::OsmConfig;
use super::nominatim::NominatimGeocoder;
use super::wire::{OverpassElement, OverpassResponse};
use crate::http::{HttpClient, ProviderBuildError};

/// Vicinity used when an element has neither street nor city tags.
const NO_ADDRESS: &str = "Address not available";

/// Places provider backed by an Overpass `around` query.
///
/// Place types map to OSM tag selectors:
///
/// | Place type           | Selector                 |
/// |----------------------|--------------------------|
/// | `tourist_attraction` | `["tourism"]`            |
/// | `restaurant`         | `["amenity"="restaurant"]` |
/// | `night_club`         | `["amenity"="nightclub"]`  |
/// | `shopping_mall`      | `["shop"="mall"]`        |
/// | anything else        | `["amenity"="<type>"]`   |
///
/// The query keyword is not sent; OSM has no free-text tag search. Results
/// are unranked and carry the configured default rating, so callers apply
/// their own filters.
#[derive(Debug)]
pub struct OverpassPlacesProvider {
    http: Arc<HttpClient>,
    geocoder: NominatimGeocoder,
    url: Url,
    default_rating: f32,
    max_results: u32,
}

impl OverpassPlacesProvider {
    /// Create a provider from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when a base URL is invalid or the HTTP
    /// client or runtime cannot be constructed.
    pub fn new(config: &OsmConfig) -> Result<Self, ProviderBuildError> {
        let http = config.connect()?;
        let url = Url::parse(&config.overpass_url).map_err(|source| {
            ProviderBuildError::BaseUrl {
                url: config.overpass_url.clone(),
                source,
            }
        })?;
        Ok(Self {
            geocoder: NominatimGeocoder::shared(Arc::clone(&http), config),
            http,
            url,
            default_rating: config.default_rating,
            max_results: config.max_results,
        })
    }

    fn anchor(&self, location: &PlaceLocation) -> Result<Coord<f64>, ProviderError> {
        match location {
            PlaceLocation::Coordinates(coord) => Ok(*coord),
            PlaceLocation::Text(text) => Ok(self.geocoder.geocode(text)?.location),
        }
    }

    fn convert_element(&self, element: OverpassElement, category: &PlaceType) -> Option<Place> {
        let name = element.tag("name")?.to_owned();
        let (lat, lon) = element.lat_lon()?;
        let vicinity = element
            .tag("addr:street")
            .or_else(|| element.tag("addr:city"))
            .unwrap_or(NO_ADDRESS)
            .to_owned();
        let mut place = Place::new(name, from_lat_lng(lat, lon), vicinity, category.clone())
            .with_rating(self.default_rating);
        place.place_id = Some(format!("{}/{}", element.kind, element.id));
        Some(place)
    }
}

/// OSM tag selector for `place_type`.
fn tag_selector(place_type: &PlaceType) -> String {
    match place_type {
        PlaceType::TouristAttraction => r#"["tourism"]"#.to_owned(),
        PlaceType::Restaurant => r#"["amenity"="restaurant"]"#.to_owned(),
        PlaceType::NightClub => r#"["amenity"="nightclub"]"#.to_owned(),
        PlaceType::ShoppingMall => r#"["shop"="mall"]"#.to_owned(),
        PlaceType::Other(name) => format!(r#"["amenity"="{}"]"#, name.replace('"', "")),
    }
}

/// Overpass QL for nodes and ways matching `place_type` within `radius`.
fn overpass_query(
    place_type: &PlaceType,
    anchor: Coord<f64>,
    radius_meters: u32,
    max_results: u32,
) -> String {
    let selector = tag_selector(place_type);
    let around = format!("(around:{radius_meters},{},{})", anchor.y, anchor.x);
    format!(
        "[out:json];(node{selector}{around};way{selector}{around};);out center {max_results};"
    )
}

impl PlacesProvider for OverpassPlacesProvider {
    fn get_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, ProviderError> {
        let anchor = self.anchor(&query.location)?;
        let ql = overpass_query(
            &query.place_type,
            anchor,
            query.radius_meters,
            self.max_results,
        );
        let response: OverpassResponse =
            self.http.post_form_json(&self.url, &[("data", ql.as_str())])?;
        let places: Vec<Place> = response
            .elements
            .into_iter()
            .filter_map(|element| self.convert_element(element, &query.place_type))
            .collect();
        log::debug!(
            "overpass {} near {}: {} places",
            query.place_type,
            query.location,
            places.len()
        );
        Ok(places)
    }
}
