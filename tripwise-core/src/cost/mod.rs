//! Price transit steps and whole routes.
//!
//! [`CostModel`] maps a [`Step`] to a whole number of currency units using an
//! injected [`FareTable`]. Walking, driving and any other non-transit steps
//! are free. A transit step pays the base fare of its vehicle type, plus a
//! per-kilometre charge for rail vehicles and a surcharge for long bus rides.
//!
//! Transit steps lacking transit details or a distance are handled per
//! [`MalformedStepPolicy`]: skipped at zero cost by default, or rejected.

mod currency;
mod error;
mod fare;

pub use currency::{Currency, SymbolPosition};
pub use error::CostError;
pub use fare::{DistanceSurcharge, FareTable, MalformedStepPolicy};

use crate::{Route, Step};

/// Fare-table driven pricing of steps and routes.
///
/// # Examples
/// ```
/// use tripwise_core::{CostModel, Step, TransitDetails, TravelMode};
///
/// let model = CostModel::default();
/// let bus = Step::new(TravelMode::Transit, 15_000, 2_400)
///     .with_transit(TransitDetails::new("BUS", "9401"));
/// let ktx = Step::new(TravelMode::Transit, 100_000, 1_800)
///     .with_transit(TransitDetails::new("HIGH_SPEED_TRAIN", "KTX"));
/// assert_eq!(model.step_cost(&bus), Ok(1_700));
/// assert_eq!(model.step_cost(&ktx), Ok(18_000));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostModel {
    fares: FareTable,
}

impl CostModel {
    /// Construct a cost model over `fares`.
    #[must_use]
    pub const fn new(fares: FareTable) -> Self {
        Self { fares }
    }

    /// The injected fare table.
    #[must_use]
    pub const fn fares(&self) -> &FareTable {
        &self.fares
    }

    /// Currency every cost is expressed in.
    #[must_use]
    pub const fn currency(&self) -> &Currency {
        &self.fares.currency
    }

    /// Price a single step.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::MalformedStep`] for a transit step lacking transit
    /// details or distance when the fare table rejects malformed steps.
    pub fn step_cost(&self, step: &Step) -> Result<u64, CostError> {
        if !step.is_transit() {
            return Ok(0);
        }
        let (Some(transit), Some(distance_meters)) = (step.transit.as_ref(), step.distance_meters)
        else {
            return self.malformed(step);
        };
        Ok(self.fare_for(&transit.vehicle_type, distance_meters))
    }

    /// Price a route: the sum of [`Self::step_cost`] over every transit step
    /// of every leg.
    ///
    /// # Errors
    ///
    /// Propagates [`CostError::MalformedStep`] from [`Self::step_cost`].
    pub fn route_cost(&self, route: &Route) -> Result<u64, CostError> {
        route
            .legs()
            .flat_map(|leg| leg.steps.iter())
            .filter(|step| step.is_transit())
            .try_fold(0_u64, |total, step| {
                self.step_cost(step).map(|cost| total.saturating_add(cost))
            })
    }

    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "fares combine flat amounts with fractional per-kilometre rates"
    )]
    fn fare_for(&self, vehicle: &crate::VehicleType, distance_meters: u64) -> u64 {
        let distance_km = distance_meters as f64 / 1_000.0;
        let mut cost = self.fares.base_fare(vehicle) as f64;

        if vehicle.is_rail() {
            cost += distance_km * self.fares.rail_rate_per_km(vehicle);
        }

        let surcharge = &self.fares.long_distance_surcharge;
        if *vehicle == surcharge.vehicle_type && distance_km > surcharge.threshold_km {
            cost += (distance_km - surcharge.threshold_km) * surcharge.per_km;
        }

        round_to_units(cost)
    }

    fn malformed(&self, step: &Step) -> Result<u64, CostError> {
        let missing = if step.transit.is_none() {
            "transit details"
        } else {
            "distance"
        };
        match self.fares.malformed_steps {
            MalformedStepPolicy::Skip => {
                log::warn!("pricing transit step without {missing} at zero");
                Ok(0)
            }
            MalformedStepPolicy::Reject => Err(CostError::MalformedStep { missing }),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is finite, non-negative and rounded before the cast"
)]
fn round_to_units(cost: f64) -> u64 {
    if !cost.is_finite() || cost <= 0.0 {
        return 0;
    }
    cost.round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        driving_step, leg_with_steps, route_from_steps, transit_step, walking_step,
    };
    use crate::{Route, TravelMode};
    use rstest::{fixture, rstest};

    #[fixture]
    fn model() -> CostModel {
        CostModel::default()
    }

    #[rstest]
    #[case::subway_has_no_distance_charge("SUBWAY", 5_000, 1_250)]
    #[case::short_bus("BUS", 8_000, 1_200)]
    #[case::bus_at_threshold("BUS", 10_000, 1_200)]
    #[case::long_bus("BUS", 15_000, 1_700)]
    #[case::high_speed_train("HIGH_SPEED_TRAIN", 100_000, 18_000)]
    #[case::commuter_train("COMMUTER_TRAIN", 25_000, 4_000)]
    #[case::unknown_rail_uses_generic_rate("MONORAIL", 2_000, 2_100)]
    #[case::unknown_vehicle("FERRY", 30_000, 2_000)]
    #[case::tram("TRAM", 4_000, 1_200)]
    #[case::rounds_half_up("TRAIN", 10, 5_001)]
    fn prices_transit_steps(
        model: CostModel,
        #[case] vehicle: &str,
        #[case] distance_meters: u64,
        #[case] expected: u64,
    ) {
        let step = transit_step(vehicle, distance_meters);
        assert_eq!(model.step_cost(&step), Ok(expected));
    }

    #[rstest]
    fn vehicle_names_are_case_insensitive(model: CostModel) {
        let step = transit_step("high_speed_train", 100_000);
        assert_eq!(model.step_cost(&step), Ok(18_000));
    }

    #[rstest]
    fn non_transit_steps_are_free(model: CostModel) {
        assert_eq!(model.step_cost(&walking_step(1_200)), Ok(0));
        assert_eq!(model.step_cost(&driving_step(40_000)), Ok(0));
    }

    #[rstest]
    fn transit_without_details_is_skipped_by_default(model: CostModel) {
        let step = Step::new(TravelMode::Transit, 5_000, 600);
        assert_eq!(model.step_cost(&step), Ok(0));
    }

    #[rstest]
    fn transit_without_distance_is_skipped_by_default(model: CostModel) {
        let mut step = transit_step("SUBWAY", 5_000);
        step.distance_meters = None;
        assert_eq!(model.step_cost(&step), Ok(0));
    }

    #[rstest]
    fn reject_policy_fails_fast() {
        let model =
            CostModel::new(FareTable::default().with_malformed_steps(MalformedStepPolicy::Reject));
        let route = route_from_steps(vec![
            transit_step("BUS", 3_000),
            Step::new(TravelMode::Transit, 5_000, 600),
        ]);
        assert_eq!(
            model.route_cost(&route),
            Err(CostError::MalformedStep {
                missing: "transit details"
            })
        );
    }

    #[rstest]
    fn skipped_step_does_not_abort_route(model: CostModel) {
        let route = route_from_steps(vec![
            transit_step("BUS", 3_000),
            Step::new(TravelMode::Transit, 5_000, 600),
            transit_step("SUBWAY", 7_000),
        ]);
        assert_eq!(model.route_cost(&route), Ok(2_450));
    }

    #[rstest]
    fn route_cost_sums_transit_steps_across_legs(model: CostModel) {
        let outbound = leg_with_steps(
            1_800,
            vec![
                walking_step(300),
                transit_step("SUBWAY", 5_000),
                walking_step(200),
            ],
        );
        let onward = leg_with_steps(3_600, vec![transit_step("HIGH_SPEED_TRAIN", 100_000)]);
        let route = Route::new(vec![outbound, onward], None).expect("two legs");
        assert_eq!(model.route_cost(&route), Ok(19_250));
    }

    #[rstest]
    fn route_without_transit_is_free(model: CostModel) {
        let route = route_from_steps(vec![walking_step(500), driving_step(20_000)]);
        assert_eq!(model.route_cost(&route), Ok(0));
    }

    #[rstest]
    fn custom_tables_are_honoured() {
        let mut fares = FareTable::default();
        fares.base_fares.insert("SUBWAY".into(), 1_400);
        let model = CostModel::new(fares);
        assert_eq!(model.step_cost(&transit_step("SUBWAY", 5_000)), Ok(1_400));
    }
}
