//! Round-trip itinerary assembly for one strategy.

use chrono::{DateTime, Days, FixedOffset, TimeDelta};
use rayon::prelude::*;
use tripwise_core::{
    DayPlan, DirectionsProvider, Itinerary, PlacesProvider, RouteAnalyzer, RouteSelection,
    Strategy, TripRequest,
};

use crate::{DayPlanner, PlanError};

/// Expands an outbound route selection into a full [`Itinerary`].
///
/// The outbound route's first leg fixes both the arrival time and the anchor
/// coordinate used for every place search. The return trip is looked up
/// separately and selected with the same strategy as the outbound trip.
pub struct ItineraryBuilder<'a, D, P> {
    directions: &'a D,
    places: &'a P,
    analyzer: &'a RouteAnalyzer,
    parallel: bool,
}

impl<'a, D, P> ItineraryBuilder<'a, D, P>
where
    D: DirectionsProvider,
    P: PlacesProvider,
{
    /// Build itineraries with the given providers and analyzer.
    pub const fn new(directions: &'a D, places: &'a P, analyzer: &'a RouteAnalyzer) -> Self {
        Self {
            directions,
            places,
            analyzer,
            parallel: false,
        }
    }

    /// Plan days concurrently, returning `self` for chaining.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build the itinerary for `request` travelling out on `outbound`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NoRoute`] when the return query finds nothing,
    /// and propagates provider and pricing failures.
    pub fn build(
        &self,
        request: &TripRequest,
        strategy: Strategy,
        outbound: RouteSelection,
    ) -> Result<Itinerary, PlanError> {
        let first_leg = outbound.route.first_leg();
        let travel_time = i64::try_from(first_leg.duration_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds);
        let arrival_time = shift(request.departure_time, travel_time, "arrival time")?;
        let stay = TimeDelta::try_days(i64::from(request.duration_days));
        let return_departure_time = shift(arrival_time, stay, "return departure time")?;

        let day_planner =
            DayPlanner::new(self.places, first_leg.end_location, &request.preferences);
        let plan_day = |offset: u32| -> Result<DayPlan, PlanError> {
            let date = arrival_time
                .date_naive()
                .checked_add_days(Days::new(u64::from(offset)))
                .ok_or(PlanError::ScheduleOutOfRange { what: "day date" })?;
            Ok(day_planner.plan(offset + 1, date)?)
        };
        let days = if self.parallel {
            (0..request.duration_days)
                .into_par_iter()
                .map(plan_day)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..request.duration_days)
                .map(plan_day)
                .collect::<Result<Vec<_>, _>>()?
        };

        let return_query = request
            .outbound_query()
            .reversed()
            .departing_at(return_departure_time);
        let return_routes = self.directions.get_directions(&return_query)?;
        let return_trip = self
            .analyzer
            .analyze(&return_routes)?
            .ok_or_else(|| PlanError::NoRoute {
                origin: return_query.origin.clone(),
                destination: return_query.destination.clone(),
            })?
            .into_selection(strategy);

        log::debug!(
            "{strategy} itinerary: {} days, outbound route {}, return route {}",
            days.len(),
            outbound.metrics.index,
            return_trip.metrics.index
        );

        Ok(Itinerary {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            departure_time: request.departure_time,
            arrival_time,
            duration_days: request.duration_days,
            strategy,
            outbound,
            return_departure_time,
            return_trip,
            days,
        })
    }
}

fn shift(
    time: DateTime<FixedOffset>,
    delta: Option<TimeDelta>,
    what: &'static str,
) -> Result<DateTime<FixedOffset>, PlanError> {
    delta
        .and_then(|step| time.checked_add_signed(step))
        .ok_or(PlanError::ScheduleOutOfRange { what })
}
