use std::sync::Arc;

use super::ProviderError;
use crate::{Place, PlaceQuery};

/// Search for places near a location.
///
/// Zero matches is success and yields an empty list. Implementations may
/// pre-filter by the query's [`PlaceFilter`](crate::PlaceFilter); callers
/// still rank the results themselves.
pub trait PlacesProvider: Send + Sync {
    /// Return places matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the upstream call fails or reports a
    /// status other than success or "no results".
    fn get_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, ProviderError>;
}

impl<T: PlacesProvider + ?Sized> PlacesProvider for Arc<T> {
    fn get_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, ProviderError> {
        (**self).get_places(query)
    }
}

impl<T: PlacesProvider + ?Sized> PlacesProvider for &T {
    fn get_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, ProviderError> {
        (**self).get_places(query)
    }
}
