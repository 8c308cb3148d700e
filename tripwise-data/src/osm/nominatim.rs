//! Forward and reverse geocoding through Nominatim.

use std::collections::BTreeMap;
use std::sync::Arc;

use geo::Coord;
use tripwise_core::ProviderError;
use tripwise_core::location::{format_lat_lng, from_lat_lng, parse_lat_lng};
use url::Url;

use super::OsmConfig;
use super::wire::{NominatimHit, NominatimReverse};
use crate::http::{HttpClient, ProviderBuildError, endpoint};

/// A resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    /// Coordinates of the best match.
    pub location: Coord<f64>,
    /// Full display name, or the input text for coordinate pairs.
    pub display_name: String,
}

/// The address found at a coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseGeocoded {
    /// Full display name.
    pub display_name: String,
    /// Structured address parts keyed by Nominatim's names, e.g. `road`,
    /// `city` or `postcode`.
    pub address: BTreeMap<String, String>,
}

/// Resolves free text to coordinates with Nominatim `search`, and
/// coordinates to addresses with `reverse`.
///
/// Text that already parses as `"lat,lng"` is returned without a request.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Arc<HttpClient>,
    base_url: String,
}

impl NominatimGeocoder {
    /// Create a geocoder from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when a base URL is invalid or the HTTP
    /// client or runtime cannot be constructed.
    pub fn new(config: &OsmConfig) -> Result<Self, ProviderBuildError> {
        Ok(Self::shared(config.connect()?, config))
    }

    pub(super) fn shared(http: Arc<HttpClient>, config: &OsmConfig) -> Self {
        Self {
            http,
            base_url: config.nominatim_url.clone(),
        }
    }

    /// Resolve `text` to its best match.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Geocode`] when nothing matches,
    /// [`ProviderError::Parse`] when the coordinates are malformed, and
    /// transport errors as they occur.
    pub fn geocode(&self, text: &str) -> Result<GeocodedPlace, ProviderError> {
        if let Some(location) = parse_lat_lng(text) {
            return Ok(GeocodedPlace {
                location,
                display_name: text.trim().to_owned(),
            });
        }
        let hits: Vec<NominatimHit> = self.http.get_json(&self.request_url(text)?)?;
        let place = hits
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Geocode {
                query: text.to_owned(),
            })
            .and_then(|hit| convert_hit(hit, text))?;
        log::debug!(
            "geocoded {text:?} to {},{}",
            place.location.y,
            place.location.x
        );
        Ok(place)
    }

    /// Find the address at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Geocode`] when Nominatim has no address
    /// there, and transport or decoding errors as they occur.
    pub fn reverse(&self, location: Coord<f64>) -> Result<ReverseGeocoded, ProviderError> {
        let response: NominatimReverse = self.http.get_json(&self.reverse_url(location)?)?;
        let found = convert_reverse(response, location)?;
        log::debug!(
            "reverse geocoded {} to {:?}",
            format_lat_lng(location),
            found.display_name
        );
        Ok(found)
    }

    fn reverse_url(&self, location: Coord<f64>) -> Result<Url, ProviderError> {
        endpoint(
            &self.base_url,
            "reverse",
            [
                ("lat", location.y.to_string()),
                ("lon", location.x.to_string()),
                ("format", "json".to_owned()),
            ],
        )
    }

    fn request_url(&self, text: &str) -> Result<Url, ProviderError> {
        endpoint(
            &self.base_url,
            "search",
            [
                ("q", text.to_owned()),
                ("format", "json".to_owned()),
                ("limit", "1".to_owned()),
            ],
        )
    }
}

fn convert_hit(hit: NominatimHit, text: &str) -> Result<GeocodedPlace, ProviderError> {
    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ProviderError::Parse {
                message: format!("invalid coordinate {value:?} for {text:?}"),
            })
    };
    let location = from_lat_lng(parse(&hit.lat)?, parse(&hit.lon)?);
    Ok(GeocodedPlace {
        location,
        display_name: hit.display_name.unwrap_or_else(|| text.to_owned()),
    })
}

fn convert_reverse(
    response: NominatimReverse,
    location: Coord<f64>,
) -> Result<ReverseGeocoded, ProviderError> {
    match response {
        NominatimReverse {
            display_name: Some(display_name),
            address,
            error: None,
        } => Ok(ReverseGeocoded {
            display_name,
            address,
        }),
        _ => Err(ProviderError::Geocode {
            query: format_lat_lng(location),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn geocoder() -> NominatimGeocoder {
        // Port 9 is discard; tests here never reach the network.
        NominatimGeocoder::new(&OsmConfig::default().with_nominatim_url("http://127.0.0.1:9"))
            .expect("geocoder should build")
    }

    #[rstest]
    fn coordinate_pairs_skip_the_lookup(geocoder: NominatimGeocoder) {
        let place = geocoder.geocode(" 35.1151,129.0422 ").expect("coordinates");
        assert_eq!(place.location, from_lat_lng(35.1151, 129.0422));
        assert_eq!(place.display_name, "35.1151,129.0422");
    }

    #[rstest]
    fn search_url_asks_for_one_json_hit(geocoder: NominatimGeocoder) {
        let url = geocoder.request_url("Busan Station").expect("url");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9/search?q=Busan+Station&format=json&limit=1"
        );
    }

    #[rstest]
    fn reverse_url_sends_lat_and_lon(geocoder: NominatimGeocoder) {
        let url = geocoder
            .reverse_url(from_lat_lng(35.1151, 129.0422))
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9/reverse?lat=35.1151&lon=129.0422&format=json"
        );
    }

    #[rstest]
    fn reverse_hits_keep_address_parts() {
        let response: NominatimReverse = serde_json::from_str(
            r#"{
                "display_name": "Busan Station, Jungang-daero, Dong-gu, Busan",
                "address": { "railway": "Busan Station", "city": "Busan", "postcode": "48732" }
            }"#,
        )
        .expect("reverse");
        let found =
            convert_reverse(response, from_lat_lng(35.1151, 129.0422)).expect("an address");
        assert_eq!(found.display_name, "Busan Station, Jungang-daero, Dong-gu, Busan");
        assert_eq!(found.address.get("city").map(String::as_str), Some("Busan"));
    }

    #[rstest]
    fn reverse_misses_are_geocode_errors() {
        let response: NominatimReverse =
            serde_json::from_str(r#"{ "error": "Unable to geocode" }"#).expect("reverse");
        assert_eq!(
            convert_reverse(response, from_lat_lng(0.0, -160.0)),
            Err(ProviderError::Geocode {
                query: "0,-160".into()
            })
        );
    }

    #[rstest]
    fn string_coordinates_are_parsed() {
        let hit: NominatimHit = serde_json::from_str(
            r#"{ "lat": "35.1151", "lon": "129.0422", "display_name": "Busan Station, Busan" }"#,
        )
        .expect("hit");
        let place = convert_hit(hit, "Busan Station").expect("place");
        assert_eq!(place.location.x, 129.0422);
        assert_eq!(place.display_name, "Busan Station, Busan");
    }

    #[rstest]
    fn malformed_coordinates_are_parse_errors() {
        let hit = NominatimHit {
            lat: "north".into(),
            lon: "129.0".into(),
            display_name: None,
        };
        assert!(matches!(
            convert_hit(hit, "Busan"),
            Err(ProviderError::Parse { .. })
        ));
    }
}
