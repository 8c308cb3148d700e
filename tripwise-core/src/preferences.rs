//! Traveller preferences driving place selection.
//!
//! [`PreferencesInput`] mirrors the loosely typed request payload where every
//! field is optional. Converting it into [`Preferences`] resolves each
//! default once, so the itinerary builder never consults an optional field.

use serde::{Deserialize, Serialize};

use crate::PlaceFilter;

/// Minimum rating used when none is supplied.
pub const DEFAULT_MIN_RATING: f32 = 4.0;
/// Price ceiling for sightseeing and shopping when none is supplied.
pub const DEFAULT_ATTRACTION_PRICE_LEVEL: u8 = 3;
/// Price ceiling for restaurants when none is supplied.
pub const DEFAULT_DINING_PRICE_LEVEL: u8 = 2;

/// Preferences as received from a client.
///
/// Blank keyword strings count as absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferencesInput {
    /// Keywords for morning sightseeing.
    pub attraction_keywords: Option<String>,
    /// Preferred cuisine; used when `food_keywords` is absent.
    pub cuisine: Option<String>,
    /// Keywords for restaurant searches.
    pub food_keywords: Option<String>,
    /// Keywords for the afternoon slot.
    pub afternoon_keywords: Option<String>,
    /// Minimum place rating.
    pub min_rating: Option<f32>,
    /// Price ceiling applied to every priced slot.
    pub price_level: Option<u8>,
    /// Search shopping malls in the afternoon instead of attractions.
    pub include_shopping: Option<bool>,
    /// Add an evening nightlife slot.
    pub include_nightlife: Option<bool>,
    /// Drop every sightseeing and shopping slot.
    pub skip_attractions: Option<bool>,
}

/// Fully resolved traveller preferences.
///
/// # Examples
/// ```
/// use tripwise_core::{Preferences, PreferencesInput};
///
/// let prefs = Preferences::from(PreferencesInput {
///     cuisine: Some("korean".into()),
///     price_level: Some(4),
///     ..PreferencesInput::default()
/// });
/// assert_eq!(prefs.food_keywords, "korean");
/// assert_eq!(prefs.dining_price_level, 4);
/// assert_eq!(prefs.min_rating, 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Keywords for morning sightseeing.
    pub attraction_keywords: String,
    /// Keywords for restaurant searches.
    pub food_keywords: String,
    /// Keywords for the afternoon slot.
    pub afternoon_keywords: String,
    /// Minimum place rating.
    pub min_rating: f32,
    /// Price ceiling for sightseeing and shopping.
    pub attraction_price_level: u8,
    /// Price ceiling for restaurants.
    pub dining_price_level: u8,
    /// Search shopping malls in the afternoon.
    pub include_shopping: bool,
    /// Add an evening nightlife slot.
    pub include_nightlife: bool,
    /// Drop sightseeing and shopping slots.
    pub skip_attractions: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::from(PreferencesInput::default())
    }
}

impl From<PreferencesInput> for Preferences {
    fn from(input: PreferencesInput) -> Self {
        let food_keywords = non_blank(input.food_keywords)
            .or_else(|| non_blank(input.cuisine))
            .unwrap_or_default();
        Self {
            attraction_keywords: non_blank(input.attraction_keywords).unwrap_or_default(),
            food_keywords,
            afternoon_keywords: non_blank(input.afternoon_keywords).unwrap_or_default(),
            min_rating: input.min_rating.unwrap_or(DEFAULT_MIN_RATING),
            attraction_price_level: input.price_level.unwrap_or(DEFAULT_ATTRACTION_PRICE_LEVEL),
            dining_price_level: input.price_level.unwrap_or(DEFAULT_DINING_PRICE_LEVEL),
            include_shopping: input.include_shopping.unwrap_or(false),
            include_nightlife: input.include_nightlife.unwrap_or(false),
            skip_attractions: input.skip_attractions.unwrap_or(false),
        }
    }
}

impl Preferences {
    /// Filter for sightseeing and shopping slots.
    #[must_use]
    pub const fn attraction_filter(&self) -> PlaceFilter {
        PlaceFilter {
            min_rating: Some(self.min_rating),
            max_price_level: Some(self.attraction_price_level),
        }
    }

    /// Filter for restaurant slots.
    #[must_use]
    pub const fn dining_filter(&self) -> PlaceFilter {
        PlaceFilter {
            min_rating: Some(self.min_rating),
            max_price_level: Some(self.dining_price_level),
        }
    }

    /// Filter for the nightlife slot: rating only.
    #[must_use]
    pub const fn nightlife_filter(&self) -> PlaceFilter {
        PlaceFilter {
            min_rating: Some(self.min_rating),
            max_price_level: None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_resolved() {
        let prefs = Preferences::default();
        assert_eq!(prefs.attraction_keywords, "");
        assert_eq!(prefs.food_keywords, "");
        assert_eq!(prefs.min_rating, DEFAULT_MIN_RATING);
        assert_eq!(prefs.attraction_price_level, 3);
        assert_eq!(prefs.dining_price_level, 2);
        assert!(!prefs.include_shopping);
        assert!(!prefs.include_nightlife);
        assert!(!prefs.skip_attractions);
    }

    #[rstest]
    #[case(Some("bbq"), Some("korean"), "bbq")]
    #[case(None, Some("korean"), "korean")]
    #[case(Some(" "), Some("korean"), "korean")]
    #[case(None, None, "")]
    fn food_keywords_fall_back_to_cuisine(
        #[case] food: Option<&str>,
        #[case] cuisine: Option<&str>,
        #[case] expected: &str,
    ) {
        let prefs = Preferences::from(PreferencesInput {
            food_keywords: food.map(str::to_owned),
            cuisine: cuisine.map(str::to_owned),
            ..PreferencesInput::default()
        });
        assert_eq!(prefs.food_keywords, expected);
    }

    #[rstest]
    fn deserialises_camel_case_payload() {
        let input: PreferencesInput = serde_json::from_str(
            r#"{ "attractionKeywords": "palace", "minRating": 4.5, "includeNightlife": true }"#,
        )
        .expect("valid preferences");
        let prefs = Preferences::from(input);
        assert_eq!(prefs.attraction_keywords, "palace");
        assert_eq!(prefs.min_rating, 4.5);
        assert!(prefs.include_nightlife);
        assert_eq!(prefs.nightlife_filter().max_price_level, None);
    }
}
