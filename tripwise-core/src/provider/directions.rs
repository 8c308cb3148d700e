use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::ProviderError;
use crate::{Route, TravelMode};

/// A request for candidate routes between two places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsQuery {
    /// Start address, place name or `"lat,lng"`.
    pub origin: String,
    /// End address, place name or `"lat,lng"`.
    pub destination: String,
    /// Desired departure; `None` means "now" to the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DateTime<FixedOffset>>,
    /// Requested travel mode.
    #[serde(default)]
    pub mode: TravelMode,
}

impl DirectionsQuery {
    /// Request transit directions from `origin` to `destination`.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure_time: None,
            mode: TravelMode::Transit,
        }
    }

    /// Set the departure time, returning `self` for chaining.
    #[must_use]
    pub const fn departing_at(mut self, departure_time: DateTime<FixedOffset>) -> Self {
        self.departure_time = Some(departure_time);
        self
    }

    /// Set the travel mode, returning `self` for chaining.
    #[must_use]
    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    /// The same query with origin and destination swapped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.destination.clone(),
            destination: self.origin.clone(),
            departure_time: self.departure_time,
            mode: self.mode.clone(),
        }
    }
}

/// Fetch candidate routes.
///
/// An empty result means the provider found no route; callers surface that
/// as their own "no route" failure.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tripwise_core::{DirectionsProvider, DirectionsQuery, Leg, ProviderError, Route};
///
/// struct StraightLine;
///
/// impl DirectionsProvider for StraightLine {
///     fn get_directions(&self, _query: &DirectionsQuery) -> Result<Vec<Route>, ProviderError> {
///         let leg = Leg::new(Coord::zero(), Coord { x: 1.0, y: 1.0 }, 150_000, 7_200);
///         Ok(vec![Route::single_leg(leg, None)])
///     }
/// }
///
/// let routes = StraightLine.get_directions(&DirectionsQuery::new("Seoul", "Busan"))?;
/// assert_eq!(routes.len(), 1);
/// # Ok::<(), ProviderError>(())
/// ```
pub trait DirectionsProvider: Send + Sync {
    /// Return every candidate route for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the upstream call fails or reports a
    /// non-success status.
    fn get_directions(&self, query: &DirectionsQuery) -> Result<Vec<Route>, ProviderError>;
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for Arc<T> {
    fn get_directions(&self, query: &DirectionsQuery) -> Result<Vec<Route>, ProviderError> {
        (**self).get_directions(query)
    }
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for &T {
    fn get_directions(&self, query: &DirectionsQuery) -> Result<Vec<Route>, ProviderError> {
        (**self).get_directions(query)
    }
}
