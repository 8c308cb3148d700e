//! Nominatim, OSRM and Overpass payloads.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// OSRM code for a successful request.
pub const OSRM_OK: &str = "Ok";

/// One Nominatim `search` hit. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
pub struct NominatimHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Nominatim `reverse` response; `error` is set when nothing is there.
#[derive(Debug, Deserialize)]
pub struct NominatimReverse {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: BTreeMap<String, String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// OSRM `route` service response.
///
/// See: <https://project-osrm.org/docs/v5.24.0/api/#route-service>
#[derive(Debug, Deserialize)]
pub struct OsrmResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    pub legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmLeg {
    #[serde(default)]
    pub steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmStep {
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    pub name: Option<String>,
    pub maneuver: OsrmManeuver,
}

#[derive(Debug, Deserialize)]
pub struct OsrmManeuver {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub modifier: Option<String>,
}

impl OsrmStep {
    /// Human-readable maneuver, e.g. `"turn left onto Jungang-daero"`.
    pub fn instruction(&self) -> String {
        let mut text = self.maneuver.kind.clone();
        if let Some(modifier) = &self.maneuver.modifier {
            text.push(' ');
            text.push_str(modifier);
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            text.push_str(" onto ");
            text.push_str(name);
        }
        text
    }
}

/// Overpass JSON output.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassElement {
    /// Node coordinates, or the computed centre for ways.
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => self.center.map(|c| (c.lat, c.lon)),
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{ "type": "turn", "modifier": "left" }"#, Some("Jungang-daero"), "turn left onto Jungang-daero")]
    #[case(r#"{ "type": "depart" }"#, None, "depart")]
    #[case(r#"{ "type": "arrive", "modifier": "right" }"#, Some(""), "arrive right")]
    fn instructions_read_naturally(
        #[case] maneuver: &str,
        #[case] name: Option<&str>,
        #[case] expected: &str,
    ) {
        let step = OsrmStep {
            distance: 0.0,
            duration: 0.0,
            name: name.map(str::to_owned),
            maneuver: serde_json::from_str(maneuver).expect("maneuver"),
        };
        assert_eq!(step.instruction(), expected);
    }

    #[rstest]
    fn ways_fall_back_to_their_centre() {
        let element: OverpassElement = serde_json::from_str(
            r#"{ "type": "way", "id": 7, "center": { "lat": 35.2, "lon": 129.1 }, "tags": {} }"#,
        )
        .expect("element");
        assert_eq!(element.lat_lon(), Some((35.2, 129.1)));
        assert_eq!(element.tag("name"), None);
    }
}
