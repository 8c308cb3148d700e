//! Place Details payload exposed to callers.

use serde::{Deserialize, Serialize};

/// Extended information about one place, from Place Details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    /// Identifier the details were requested for.
    pub place_id: String,
    /// Display name.
    pub name: String,
    /// Formatted address; empty when the service omits it.
    pub address: String,
    /// Average rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Official website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Local phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Whether the place is open at request time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    /// One line per weekday, e.g. `"Monday: 9:00 AM – 6:00 PM"`.
    #[serde(default)]
    pub opening_hours: Vec<String>,
    /// Most relevant user reviews.
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
    /// Photo references usable with the Place Photos API.
    #[serde(default)]
    pub photo_references: Vec<String>,
}

/// A single user review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceReview {
    /// Reviewer display name.
    pub author: String,
    /// Star rating, 1 to 5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Review body.
    pub text: String,
}
