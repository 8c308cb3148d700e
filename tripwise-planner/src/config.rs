//! Planner configuration.

use serde::{Deserialize, Serialize};
use tripwise_core::{AnalyzerConfig, CostModel, FareTable, RouteAnalyzer};

/// Configuration for [`TripPlanner`](crate::TripPlanner).
///
/// Deserialises from JSON with every field optional, so a config file only
/// needs to name what it overrides.
///
/// # Examples
/// ```
/// use tripwise_planner::PlannerConfig;
///
/// let config: PlannerConfig = serde_json::from_str(r#"{ "parallel": true }"#)?;
/// assert!(config.parallel);
/// assert_eq!(config.fares.currency.code, "KRW");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Build strategies and days concurrently.
    pub parallel: bool,
    /// Best-value selection settings.
    pub analyzer: AnalyzerConfig,
    /// Fares used to price every route.
    pub fares: FareTable,
}

impl PlannerConfig {
    /// Toggle concurrent builds, returning `self` for chaining.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Replace the fare table, returning `self` for chaining.
    #[must_use]
    pub fn with_fares(mut self, fares: FareTable) -> Self {
        self.fares = fares;
        self
    }

    /// Replace the analyzer settings, returning `self` for chaining.
    #[must_use]
    pub const fn with_analyzer(mut self, analyzer: AnalyzerConfig) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Analyzer pricing with the configured fares.
    #[must_use]
    pub fn route_analyzer(&self) -> RouteAnalyzer {
        RouteAnalyzer::new(CostModel::new(self.fares.clone())).with_config(self.analyzer)
    }
}
