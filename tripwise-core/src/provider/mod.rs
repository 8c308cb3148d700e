//! Seams between the engine and external map services.
//!
//! [`DirectionsProvider`] and [`PlacesProvider`] are synchronous so the core
//! stays embeddable in non-async callers; HTTP adapters block internally.
//! Both are `Send + Sync` so one provider can serve concurrent strategy
//! builds. Implementations normalise upstream payloads into [`Route`] and
//! [`Place`] and never leak provider-specific shapes.
//!
//! [`Route`]: crate::Route
//! [`Place`]: crate::Place

mod directions;
mod error;
mod places;

pub use directions::{DirectionsProvider, DirectionsQuery};
pub use error::ProviderError;
pub use places::PlacesProvider;
