//! Pairwise comparisons between analysed routes.

use serde::{Deserialize, Serialize};

use super::RouteMetrics;
use crate::Currency;

/// Money saved by taking the cheaper of two routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    /// `expensive.cost - cheap.cost`; negative when the "cheap" route costs more.
    pub amount: i64,
    /// Amount as a share of the expensive cost, in percent, one decimal.
    pub percentage: f64,
    /// Amount formatted in the fare table's currency.
    pub formatted: String,
}

impl Savings {
    /// Compare `expensive` against `cheap`.
    ///
    /// The caller picks the pair; the planner diffs the fastest route against
    /// the cheapest. A zero `expensive` cost yields a zero percentage.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use tripwise_core::{Currency, Leg, Route, RouteMetrics, Savings};
    ///
    /// let route = Route::single_leg(Leg::new(Coord::zero(), Coord::zero(), 1_000, 600), None);
    /// let fast = RouteMetrics::measure(0, &route, 8_000);
    /// let cheap = RouteMetrics::measure(1, &route, 5_000);
    /// let savings = Savings::between(&fast, &cheap, &Currency::default());
    /// assert_eq!(savings.amount, 3_000);
    /// assert_eq!(savings.percentage, 37.5);
    /// assert_eq!(savings.formatted, "3,000원");
    /// ```
    #[must_use]
    pub fn between(expensive: &RouteMetrics, cheap: &RouteMetrics, currency: &Currency) -> Self {
        let amount = signed_difference(expensive.cost, cheap.cost);
        Self {
            amount,
            percentage: percentage_of(amount, expensive.cost),
            formatted: currency.format(amount),
        }
    }
}

/// Extra travel time of one route over another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeDifference {
    /// `slower - faster` in whole minutes; negative if `slower` is quicker.
    pub minutes: i64,
    /// Absolute difference as `"1 h 5 min"`.
    pub formatted: String,
}

impl TimeDifference {
    /// How much longer `slower` takes than `faster`.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use tripwise_core::{Leg, Route, RouteMetrics, TimeDifference};
    ///
    /// let trip = |seconds| Route::single_leg(Leg::new(Coord::zero(), Coord::zero(), 0, seconds), None);
    /// let slow = RouteMetrics::measure(0, &trip(3_600), 0);
    /// let fast = RouteMetrics::measure(1, &trip(2_400), 0);
    /// assert_eq!(TimeDifference::between(&slow, &fast).minutes, 20);
    /// ```
    #[must_use]
    pub fn between(slower: &RouteMetrics, faster: &RouteMetrics) -> Self {
        let seconds = signed_difference(slower.duration_seconds, faster.duration_seconds);
        Self {
            minutes: signed_difference(slower.duration_minutes, faster.duration_minutes),
            formatted: format_duration(seconds.unsigned_abs()),
        }
    }
}

/// Format a duration in seconds as hours and minutes.
///
/// # Examples
/// ```
/// use tripwise_core::format_duration;
///
/// assert_eq!(format_duration(2_700), "45 min");
/// assert_eq!(format_duration(7_500), "2 h 5 min");
/// ```
#[must_use]
#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "whole hours and minutes"
)]
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if hours > 0 {
        format!("{hours} h {minutes} min")
    } else {
        format!("{minutes} min")
    }
}

fn signed_difference(left: u64, right: u64) -> i64 {
    let magnitude = i64::try_from(left.abs_diff(right)).unwrap_or(i64::MAX);
    if left >= right { magnitude } else { -magnitude }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "percentages are fractional"
)]
fn percentage_of(amount: i64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = amount as f64 / total as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Route;
    use crate::test_support::leg_with_steps;
    use rstest::rstest;

    fn metrics(cost: u64, duration_seconds: u64) -> RouteMetrics {
        let route = Route::single_leg(leg_with_steps(duration_seconds, Vec::new()), None);
        RouteMetrics::measure(0, &route, cost)
    }

    #[rstest]
    fn zero_expensive_cost_has_zero_percentage() {
        let savings = Savings::between(&metrics(0, 60), &metrics(0, 60), &Currency::default());
        assert_eq!(savings.amount, 0);
        assert_eq!(savings.percentage, 0.0);
    }

    #[rstest]
    fn negative_savings_are_reported() {
        let savings = Savings::between(&metrics(3_000, 60), &metrics(4_000, 60), &Currency::default());
        assert_eq!(savings.amount, -1_000);
        assert!((savings.percentage + 33.3).abs() < 1e-9);
        assert_eq!(savings.formatted, "-1,000원");
    }

    #[rstest]
    fn percentage_rounds_to_one_decimal() {
        let savings = Savings::between(&metrics(3_000, 60), &metrics(2_000, 60), &Currency::default());
        assert!((savings.percentage - 33.3).abs() < 1e-9);
    }

    #[rstest]
    fn time_difference_can_be_negative() {
        let difference = TimeDifference::between(&metrics(0, 1_800), &metrics(0, 3_600));
        assert_eq!(difference.minutes, -30);
        assert_eq!(difference.formatted, "30 min");
    }

    #[rstest]
    #[case(0, "0 min")]
    #[case(59, "0 min")]
    #[case(3_600, "1 h 0 min")]
    #[case(5_400, "1 h 30 min")]
    fn formats_durations(#[case] seconds: u64, #[case] expected: &str) {
        assert_eq!(format_duration(seconds), expected);
    }
}
