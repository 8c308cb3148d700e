//! Trip planning on top of the Tripwise core.
//!
//! [`TripPlanner`] fetches outbound directions, lets the
//! [`RouteAnalyzer`](tripwise_core::RouteAnalyzer) pick one route per
//! strategy, and expands each pick into a round-trip [`Itinerary`] through
//! the [`ItineraryBuilder`]. Day plans come from the fixed slot table in
//! [`DayPlanner`].
//!
//! Providers are injected through the core traits, so the planner runs the
//! same way against HTTP adapters and in-memory stubs. Setting
//! [`PlannerConfig::parallel`] fans the strategy builds and day plans out
//! over `rayon`; results are identical to the sequential run.
//!
//! [`Itinerary`]: tripwise_core::Itinerary

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod day;
mod error;
mod itinerary;
mod plan;

pub use config::PlannerConfig;
pub use day::DayPlanner;
pub use error::PlanError;
pub use itinerary::ItineraryBuilder;
pub use plan::{Comparison, Planner, RouteOptions, RouteSummary, StrategyPlan, TripPlan, TripPlanner};
