//! Score candidate routes and pick one per strategy.
//!
//! [`RouteAnalyzer::analyze`] prices every candidate with the
//! [`CostModel`](crate::CostModel), measures its first leg and selects:
//!
//! - the cheapest route (minimum cost);
//! - the fastest route (minimum first-leg duration);
//! - the best-value route (minimum cost per minute among routes no slower
//!   than the fastest duration times the configured slack, `3/2` by default).
//!
//! Every tie resolves to the earliest route in input order.

mod comparison;
mod metrics;

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use comparison::{Savings, TimeDifference, format_duration};
pub use metrics::RouteMetrics;

use crate::{CostError, CostModel, Route};

/// Route selection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Minimum total fare.
    Cheapest,
    /// Minimum travel time.
    Fastest,
    /// Minimum fare per minute among routes that are not much slower than
    /// the fastest.
    BestValue,
}

impl Strategy {
    /// Every strategy, in output order.
    pub const ALL: [Self; 3] = [Self::Cheapest, Self::Fastest, Self::BestValue];

    /// Return the camel-case name used in JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cheapest => "cheapest",
            Self::Fastest => "fastest",
            Self::BestValue => "bestValue",
        }
    }

    /// Human-readable reason attached to a selection.
    #[must_use]
    pub const fn rationale(self) -> &'static str {
        match self {
            Self::Cheapest => "Cheapest route",
            Self::Fastest => "Fastest route",
            Self::BestValue => "Best value route",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy: {0}")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    /// Parse a strategy name, accepting camel, snake and kebab case.
    ///
    /// # Examples
    /// ```
    /// use tripwise_core::Strategy;
    ///
    /// assert_eq!("best-value".parse::<Strategy>(), Ok(Strategy::BestValue));
    /// assert!("scenic".parse::<Strategy>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalised.as_str() {
            "cheapest" => Ok(Self::Cheapest),
            "fastest" => Ok(Self::Fastest),
            "bestvalue" => Ok(Self::BestValue),
            _ => Err(ParseStrategyError(s.to_owned())),
        }
    }
}

/// Tuning for [`RouteAnalyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Numerator of the best-value duration slack.
    pub best_value_slack_numerator: u64,
    /// Denominator of the best-value duration slack.
    pub best_value_slack_denominator: NonZeroU64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            best_value_slack_numerator: 3,
            best_value_slack_denominator: NonZeroU64::MIN.saturating_add(1),
        }
    }
}

impl AnalyzerConfig {
    /// Whether `duration` falls within the slack of `fastest`.
    ///
    /// Compares `duration × denominator ≤ fastest × numerator` in integers.
    #[must_use]
    pub fn within_slack(&self, duration: u64, fastest: u64) -> bool {
        let lhs = u128::from(duration) * u128::from(self.best_value_slack_denominator.get());
        let rhs = u128::from(fastest) * u128::from(self.best_value_slack_numerator);
        lhs <= rhs
    }
}

/// A route chosen under one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSelection {
    /// Strategy that picked the route.
    pub strategy: Strategy,
    /// The chosen route.
    pub route: Route,
    /// Its metrics.
    pub metrics: RouteMetrics,
    /// Why it was chosen.
    pub rationale: String,
}

/// Indices of the selected route for each traveller goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    /// Index of the cheapest route.
    pub save_money: usize,
    /// Index of the fastest route.
    pub save_time: usize,
    /// Index of the best-value route.
    pub balanced: usize,
}

/// Result of analysing a non-empty set of candidate routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAnalysis {
    /// Metrics for every candidate, in input order.
    pub all_routes: Vec<RouteMetrics>,
    /// Minimum-cost selection.
    pub cheapest: RouteSelection,
    /// Minimum-duration selection.
    pub fastest: RouteSelection,
    /// Best-value selection.
    pub best_value: RouteSelection,
    /// Selection indices.
    pub recommendations: Recommendations,
}

impl RouteAnalysis {
    /// Borrow the selection made under `strategy`.
    #[must_use]
    pub const fn selection(&self, strategy: Strategy) -> &RouteSelection {
        match strategy {
            Strategy::Cheapest => &self.cheapest,
            Strategy::Fastest => &self.fastest,
            Strategy::BestValue => &self.best_value,
        }
    }

    /// Take the selection made under `strategy`, dropping the others.
    #[must_use]
    pub fn into_selection(self, strategy: Strategy) -> RouteSelection {
        match strategy {
            Strategy::Cheapest => self.cheapest,
            Strategy::Fastest => self.fastest,
            Strategy::BestValue => self.best_value,
        }
    }

    /// Money saved by the cheapest route relative to the fastest.
    #[must_use]
    pub fn savings(&self, model: &CostModel) -> Savings {
        Savings::between(&self.fastest.metrics, &self.cheapest.metrics, model.currency())
    }

    /// Extra time taken by the cheapest route relative to the fastest.
    #[must_use]
    pub fn time_difference(&self) -> TimeDifference {
        TimeDifference::between(&self.cheapest.metrics, &self.fastest.metrics)
    }
}

/// Scores routes and selects one per [`Strategy`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tripwise_core::{Leg, Route, RouteAnalyzer, Step, TransitDetails, TravelMode};
///
/// let candidate = |vehicle: &str, km: u64, minutes: u64| {
///     let ride = Step::new(TravelMode::Transit, km * 1_000, minutes * 60)
///         .with_transit(TransitDetails::new(vehicle, "1"));
///     let leg = Leg::new(Coord::zero(), Coord::zero(), km * 1_000, minutes * 60)
///         .with_steps(vec![ride]);
///     Route::single_leg(leg, None)
/// };
/// let routes = [candidate("BUS", 15, 90), candidate("HIGH_SPEED_TRAIN", 100, 40)];
///
/// let analysis = RouteAnalyzer::default().analyze(&routes)?.expect("two candidates");
/// assert_eq!(analysis.recommendations.save_money, 0);
/// assert_eq!(analysis.recommendations.save_time, 1);
/// assert!(RouteAnalyzer::default().analyze(&[])?.is_none());
/// # Ok::<(), tripwise_core::CostError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteAnalyzer {
    cost_model: CostModel,
    config: AnalyzerConfig,
}

impl RouteAnalyzer {
    /// Construct an analyzer pricing routes with `cost_model`.
    #[must_use]
    pub fn new(cost_model: CostModel) -> Self {
        Self {
            cost_model,
            config: AnalyzerConfig::default(),
        }
    }

    /// Replace the analyzer configuration, returning `self` for chaining.
    #[must_use]
    pub const fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// The cost model used for pricing.
    #[must_use]
    pub const fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// Measure every route and make the three selections.
    ///
    /// Returns `Ok(None)` for an empty slice. The input is never modified,
    /// so repeated calls produce identical results.
    ///
    /// # Errors
    ///
    /// Propagates [`CostError`] when the cost model rejects a step.
    pub fn analyze(&self, routes: &[Route]) -> Result<Option<RouteAnalysis>, CostError> {
        let all_routes = routes
            .iter()
            .enumerate()
            .map(|(index, route)| {
                self.cost_model
                    .route_cost(route)
                    .map(|cost| RouteMetrics::measure(index, route, cost))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let Some(cheapest) = all_routes.iter().min_by_key(|m| m.cost) else {
            return Ok(None);
        };
        let Some(fastest) = all_routes.iter().min_by_key(|m| m.duration_seconds) else {
            return Ok(None);
        };
        let fastest_duration = fastest.duration_seconds;
        // The fastest route always satisfies the slack, so this is never empty.
        let best_value = all_routes
            .iter()
            .filter(|m| self.config.within_slack(m.duration_seconds, fastest_duration))
            .min_by(|a, b| a.cost_per_minute.total_cmp(&b.cost_per_minute))
            .unwrap_or(fastest);

        log::debug!(
            "analysed {} routes: cheapest #{} fastest #{} best value #{}",
            all_routes.len(),
            cheapest.index,
            fastest.index,
            best_value.index
        );

        let recommendations = Recommendations {
            save_money: cheapest.index,
            save_time: fastest.index,
            balanced: best_value.index,
        };
        let select = |strategy: Strategy, metrics: &RouteMetrics| {
            routes.get(metrics.index).map(|route| RouteSelection {
                strategy,
                route: route.clone(),
                metrics: metrics.clone(),
                rationale: strategy.rationale().to_owned(),
            })
        };
        let (Some(cheapest), Some(fastest), Some(best_value)) = (
            select(Strategy::Cheapest, cheapest),
            select(Strategy::Fastest, fastest),
            select(Strategy::BestValue, best_value),
        ) else {
            return Ok(None);
        };

        Ok(Some(RouteAnalysis {
            all_routes,
            cheapest,
            fastest,
            best_value,
            recommendations,
        }))
    }
}
