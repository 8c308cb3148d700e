//! The end-to-end planner and its output bundle.

use serde::{Deserialize, Serialize};
use tripwise_core::{
    Currency, DirectionsProvider, Itinerary, PlacesProvider, Recommendations, RouteAnalysis,
    RouteAnalyzer, RouteMetrics, Savings, Strategy, TimeDifference, TripRequest, format_duration,
};

use crate::{ItineraryBuilder, PlanError, PlannerConfig};

/// Human-readable digest of one strategy's outbound route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    /// Outbound fare, e.g. `"42,000원"`.
    pub cost: String,
    /// Outbound plus return fare.
    pub round_trip_cost: String,
    /// Outbound travel time, e.g. `"2 h 30 min"`.
    pub duration: String,
    /// Outbound distance, e.g. `"400.3 km"`.
    pub distance: String,
    /// Transfers on the outbound route.
    pub transfers: usize,
    /// Why the route was chosen.
    pub rationale: String,
}

impl RouteSummary {
    /// Summarise `itinerary`, formatting fares with `currency`.
    #[must_use]
    pub fn describe(itinerary: &Itinerary, currency: &Currency) -> Self {
        let metrics = &itinerary.outbound.metrics;
        Self {
            cost: currency.format(to_signed(metrics.cost)),
            round_trip_cost: currency.format(to_signed(itinerary.round_trip_cost())),
            duration: format_duration(metrics.duration_seconds),
            distance: format!("{:.1} km", metrics.distance_km),
            transfers: metrics.transfer_count,
            rationale: itinerary.outbound.rationale.clone(),
        }
    }
}

fn to_signed(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

/// An itinerary paired with its summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPlan {
    /// The full round trip.
    pub itinerary: Itinerary,
    /// Display digest of the outbound route.
    pub summary: RouteSummary,
}

/// One plan per strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptions {
    /// Lowest fare.
    pub cheapest: StrategyPlan,
    /// Shortest travel time.
    pub fastest: StrategyPlan,
    /// Lowest fare per minute among reasonably quick routes.
    pub best_value: StrategyPlan,
}

impl RouteOptions {
    /// The plan built for `strategy`.
    #[must_use]
    pub const fn get(&self, strategy: Strategy) -> &StrategyPlan {
        match strategy {
            Strategy::Cheapest => &self.cheapest,
            Strategy::Fastest => &self.fastest,
            Strategy::BestValue => &self.best_value,
        }
    }
}

/// Outbound comparison between the candidate routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    /// Fare saved by taking the cheapest route instead of the fastest.
    pub savings: Savings,
    /// Extra time the cheapest route takes over the fastest.
    pub time_difference: TimeDifference,
    /// Metrics for every outbound candidate, in provider order.
    pub all_routes: Vec<RouteMetrics>,
}

/// Everything produced for one trip request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    /// Round-trip itineraries per strategy.
    pub route_options: RouteOptions,
    /// Outbound comparison figures.
    pub comparison: Comparison,
    /// Candidate indices recommended per goal.
    pub recommendations: Recommendations,
}

/// Object-safe entry point so callers can swap planners at runtime.
pub trait Planner: Send + Sync {
    /// Plan `request`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] when any provider call fails, when a route
    /// cannot be priced, or when either direction has no route.
    fn plan(&self, request: &TripRequest) -> Result<TripPlan, PlanError>;
}

/// Plans trips with the injected providers.
///
/// # Examples
/// ```
/// use tripwise_core::test_support::{StubDirectionsProvider, StubPlacesProvider, transit_route};
/// use tripwise_core::{TripRequest, TripRequestInput};
/// use tripwise_planner::{Planner, TripPlanner};
///
/// let directions = StubDirectionsProvider::default()
///     .with_routes("Seoul", "Busan", vec![transit_route("HIGH_SPEED_TRAIN", 400_000, 150)])
///     .with_routes("Busan", "Seoul", vec![transit_route("HIGH_SPEED_TRAIN", 400_000, 155)]);
/// let planner = TripPlanner::new(directions, StubPlacesProvider::default());
/// let request = TripRequest::try_from(TripRequestInput {
///     origin: Some("Seoul".into()),
///     destination: Some("Busan".into()),
///     departure_time: Some("2026-05-01T08:00:00+09:00".into()),
///     duration: Some(2.into()),
///     ..TripRequestInput::default()
/// })?;
/// let plan = planner.plan(&request)?;
/// assert_eq!(plan.route_options.fastest.summary.cost, "42,000원");
/// assert_eq!(plan.route_options.fastest.itinerary.days.len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TripPlanner<D, P> {
    directions: D,
    places: P,
    analyzer: RouteAnalyzer,
    config: PlannerConfig,
}

impl<D, P> TripPlanner<D, P>
where
    D: DirectionsProvider,
    P: PlacesProvider,
{
    /// Construct a planner using default configuration.
    pub fn new(directions: D, places: P) -> Self {
        Self::with_config(directions, places, PlannerConfig::default())
    }

    /// Construct a planner with explicit configuration.
    pub fn with_config(directions: D, places: P, config: PlannerConfig) -> Self {
        Self {
            directions,
            places,
            analyzer: config.route_analyzer(),
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    fn build_strategy(
        &self,
        builder: &ItineraryBuilder<'_, D, P>,
        request: &TripRequest,
        analysis: &RouteAnalysis,
        strategy: Strategy,
    ) -> Result<StrategyPlan, PlanError> {
        let itinerary = builder.build(request, strategy, analysis.selection(strategy).clone())?;
        let summary = RouteSummary::describe(&itinerary, self.analyzer.cost_model().currency());
        Ok(StrategyPlan { itinerary, summary })
    }
}

impl<D, P> Planner for TripPlanner<D, P>
where
    D: DirectionsProvider,
    P: PlacesProvider,
{
    fn plan(&self, request: &TripRequest) -> Result<TripPlan, PlanError> {
        let query = request.outbound_query();
        log::debug!(
            "planning {} -> {} for {} days",
            query.origin,
            query.destination,
            request.duration_days
        );
        let routes = self.directions.get_directions(&query)?;
        let analysis = self
            .analyzer
            .analyze(&routes)?
            .ok_or_else(|| PlanError::NoRoute {
                origin: query.origin.clone(),
                destination: query.destination.clone(),
            })?;

        let builder = ItineraryBuilder::new(&self.directions, &self.places, &self.analyzer)
            .parallel(self.config.parallel);
        let build = |strategy| self.build_strategy(&builder, request, &analysis, strategy);
        let (cheapest, (fastest, best_value)) = if self.config.parallel {
            rayon::join(
                || build(Strategy::Cheapest),
                || rayon::join(|| build(Strategy::Fastest), || build(Strategy::BestValue)),
            )
        } else {
            (
                build(Strategy::Cheapest),
                (build(Strategy::Fastest), build(Strategy::BestValue)),
            )
        };

        let comparison = Comparison {
            savings: analysis.savings(self.analyzer.cost_model()),
            time_difference: analysis.time_difference(),
            all_routes: analysis.all_routes.clone(),
        };
        Ok(TripPlan {
            route_options: RouteOptions {
                cheapest: cheapest?,
                fastest: fastest?,
                best_value: best_value?,
            },
            comparison,
            recommendations: analysis.recommendations,
        })
    }
}
