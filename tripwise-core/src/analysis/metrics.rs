use serde::{Deserialize, Serialize};

use crate::Route;

/// Derived, immutable figures for one candidate route.
///
/// Duration, distance and transfers describe the first leg only; the cost
/// covers every leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetrics {
    /// Position of the route in the analysed slice.
    pub index: usize,
    /// Total fare in whole currency units.
    pub cost: u64,
    /// First-leg duration in seconds.
    pub duration_seconds: u64,
    /// First-leg duration rounded to whole minutes.
    pub duration_minutes: u64,
    /// First-leg distance in metres.
    pub distance_meters: u64,
    /// First-leg distance in kilometres, one decimal place.
    pub distance_km: f64,
    /// Vehicle changes: transit rides in the first leg minus one.
    pub transfer_count: usize,
    /// Cost divided by duration in minutes; zero for a zero duration.
    pub cost_per_minute: f64,
}

impl RouteMetrics {
    /// Measure `route` given its precomputed `cost`.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use tripwise_core::{Leg, Route, RouteMetrics, Step, TransitDetails, TravelMode};
    ///
    /// let ride = |vehicle: &str| {
    ///     Step::new(TravelMode::Transit, 3_000, 600).with_transit(TransitDetails::new(vehicle, "1"))
    /// };
    /// let leg = Leg::new(Coord::zero(), Coord::zero(), 9_000, 1_800)
    ///     .with_steps(vec![ride("BUS"), ride("SUBWAY"), ride("BUS")]);
    /// let metrics = RouteMetrics::measure(0, &Route::single_leg(leg, None), 3_650);
    /// assert_eq!(metrics.transfer_count, 2);
    /// assert_eq!(metrics.duration_minutes, 30);
    /// ```
    #[must_use]
    pub fn measure(index: usize, route: &Route, cost: u64) -> Self {
        let leg = route.first_leg();
        Self {
            index,
            cost,
            duration_seconds: leg.duration_seconds,
            duration_minutes: rounded_minutes(leg.duration_seconds),
            distance_meters: leg.distance_meters,
            distance_km: kilometres_one_decimal(leg.distance_meters),
            transfer_count: leg.transit_step_count().saturating_sub(1),
            cost_per_minute: cost_per_minute(cost, leg.duration_seconds),
        }
    }
}

#[expect(
    clippy::integer_division,
    reason = "whole minutes, rounded half up"
)]
const fn rounded_minutes(seconds: u64) -> u64 {
    seconds.saturating_add(30) / 60
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "display value"
)]
fn kilometres_one_decimal(meters: u64) -> f64 {
    (meters as f64 / 100.0).round() / 10.0
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "cost per minute is a ratio"
)]
fn cost_per_minute(cost: u64, duration_seconds: u64) -> f64 {
    if duration_seconds == 0 {
        return 0.0;
    }
    cost as f64 * 60.0 / duration_seconds as f64
}
