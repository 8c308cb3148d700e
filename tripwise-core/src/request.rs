//! Trip requests and their boundary validation.
//!
//! [`TripRequestInput`] accepts the loosely typed payload a client sends;
//! [`TripRequest::try_from`] checks required fields and parses values before
//! anything reaches the planner.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DirectionsQuery, Preferences, PreferencesInput, TravelMode};

/// Errors raised while validating a trip request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    /// A required field was absent or blank.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the field in the request payload.
        field: &'static str,
    },
    /// The trip length was zero days.
    #[error("duration must be at least one day")]
    ZeroDuration,
    /// The trip length was not a whole number of days.
    #[error("invalid duration {value:?}: expected a whole number of days")]
    InvalidDuration {
        /// Rejected value.
        value: String,
    },
    /// The departure time could not be parsed.
    #[error("invalid departure time {value:?}: expected RFC 3339")]
    InvalidDepartureTime {
        /// Rejected value.
        value: String,
    },
}

/// Trip length as sent by a client: a number or numeric text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    /// `"duration": 3`
    Days(u64),
    /// `"duration": "3"`
    Text(String),
}

impl From<u64> for DurationInput {
    fn from(value: u64) -> Self {
        Self::Days(value)
    }
}

/// Unvalidated itinerary request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TripRequestInput {
    /// Start of the trip.
    pub origin: Option<String>,
    /// Where the traveller stays.
    pub destination: Option<String>,
    /// Outbound departure, RFC 3339 or `YYYY-MM-DDTHH:MM[:SS]` in UTC.
    pub departure_time: Option<String>,
    /// Days at the destination.
    pub duration: Option<DurationInput>,
    /// Travel mode name; transit when absent.
    pub travel_mode: Option<String>,
    /// Optional preferences.
    pub preferences: PreferencesInput,
}

/// A validated itinerary request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    /// Start of the trip.
    pub origin: String,
    /// Where the traveller stays.
    pub destination: String,
    /// Outbound departure.
    pub departure_time: DateTime<FixedOffset>,
    /// Days at the destination; at least one.
    pub duration_days: u32,
    /// Mode requested from the directions provider.
    pub travel_mode: TravelMode,
    /// Resolved preferences.
    pub preferences: Preferences,
}

impl TripRequest {
    /// The outbound directions query.
    #[must_use]
    pub fn outbound_query(&self) -> DirectionsQuery {
        DirectionsQuery::new(self.origin.clone(), self.destination.clone())
            .departing_at(self.departure_time)
            .with_mode(self.travel_mode.clone())
    }
}

impl TryFrom<TripRequestInput> for TripRequest {
    type Error = RequestValidationError;

    /// Validate `input`.
    ///
    /// # Examples
    /// ```
    /// use tripwise_core::{RequestValidationError, TripRequest, TripRequestInput};
    ///
    /// let input = TripRequestInput {
    ///     origin: Some("Seoul".into()),
    ///     destination: Some("Busan".into()),
    ///     departure_time: Some("2026-05-01T08:00:00+09:00".into()),
    ///     duration: Some(2.into()),
    ///     ..TripRequestInput::default()
    /// };
    /// let request = TripRequest::try_from(input)?;
    /// assert_eq!(request.duration_days, 2);
    /// # Ok::<(), RequestValidationError>(())
    /// ```
    fn try_from(input: TripRequestInput) -> Result<Self, Self::Error> {
        let origin = required("origin", input.origin)?;
        let destination = required("destination", input.destination)?;
        let departure_text = required("departureTime", input.departure_time)?;
        let duration = input
            .duration
            .ok_or(RequestValidationError::MissingField { field: "duration" })?;

        Ok(Self {
            origin,
            destination,
            departure_time: parse_departure_time(&departure_text)?,
            duration_days: parse_duration(duration)?,
            travel_mode: input
                .travel_mode
                .filter(|mode| !mode.trim().is_empty())
                .map_or(TravelMode::Transit, TravelMode::from),
            preferences: Preferences::from(input.preferences),
        })
    }
}

/// Parse a departure time.
///
/// RFC 3339 timestamps keep their offset. Timestamps without an offset, as
/// produced by HTML `datetime-local` inputs, are taken as UTC.
///
/// # Errors
///
/// Returns [`RequestValidationError::InvalidDepartureTime`] for anything else.
///
/// # Examples
/// ```
/// use tripwise_core::request::parse_departure_time;
///
/// let local = parse_departure_time("2026-05-01T08:00+09:00")?;
/// assert_eq!(local.offset().local_minus_utc(), 9 * 3600);
/// let naive = parse_departure_time("2026-05-01T08:00")?;
/// assert_eq!(naive.offset().local_minus_utc(), 0);
/// # Ok::<(), tripwise_core::RequestValidationError>(())
/// ```
pub fn parse_departure_time(text: &str) -> Result<DateTime<FixedOffset>, RequestValidationError> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M%:z") {
        return Ok(parsed);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| RequestValidationError::InvalidDepartureTime {
            value: text.to_owned(),
        })
}

fn required(field: &'static str, value: Option<String>) -> Result<String, RequestValidationError> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or(RequestValidationError::MissingField { field })
}

fn parse_duration(input: DurationInput) -> Result<u32, RequestValidationError> {
    let days = match input {
        DurationInput::Days(days) => days,
        DurationInput::Text(text) => {
            text.trim()
                .parse::<u64>()
                .map_err(|_| RequestValidationError::InvalidDuration {
                    value: text.clone(),
                })?
        }
    };
    if days == 0 {
        return Err(RequestValidationError::ZeroDuration);
    }
    u32::try_from(days).map_err(|_| RequestValidationError::InvalidDuration {
        value: days.to_string(),
    })
}
