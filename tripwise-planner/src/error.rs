//! Errors returned while planning a trip.

use thiserror::Error;
use tripwise_core::{CostError, ProviderError};

/// Failure of a whole planning run; no partial plan is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The directions provider returned no candidate routes.
    #[error("no route found from {origin} to {destination}")]
    NoRoute {
        /// Start of the failed query.
        origin: String,
        /// End of the failed query.
        destination: String,
    },
    /// A directions or places call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// A route could not be priced.
    #[error(transparent)]
    Cost(#[from] CostError),
    /// A derived time or date fell outside the calendar `chrono` supports.
    #[error("{what} is out of range")]
    ScheduleOutOfRange {
        /// Which value overflowed.
        what: &'static str,
    },
}
