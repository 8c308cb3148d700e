//! Fare tables: immutable lookup data injected into the cost model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Currency;
use crate::VehicleType;

/// How the cost model treats a transit step with missing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedStepPolicy {
    /// Price the step at zero, log a warning and carry on.
    #[default]
    Skip,
    /// Fail the whole computation with [`super::CostError::MalformedStep`].
    Reject,
}

/// Per-kilometre surcharge applied beyond a distance threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceSurcharge {
    /// Vehicle type the surcharge applies to; matched exactly.
    pub vehicle_type: VehicleType,
    /// Distance included in the base fare, in kilometres.
    pub threshold_km: f64,
    /// Charge per kilometre beyond the threshold.
    pub per_km: f64,
}

/// Base fares and distance rates keyed by vehicle type.
///
/// The default table prices trips in Korean won:
///
/// | Vehicle | Base | Per km |
/// |---|---|---|
/// | `BUS` | 1200 | – |
/// | `SUBWAY` | 1250 | – |
/// | `TRAIN`, `HEAVY_RAIL` | 5000 | 50 |
/// | `HIGH_SPEED_TRAIN` | 10000 | 80 |
/// | `COMMUTER_TRAIN` | 3000 | 40 |
/// | `TRAM` | 1200 | – |
/// | other | 2000 | 50 if rail |
///
/// Buses add 100 per km beyond 10 km.
///
/// Tables deserialise from JSON so a deployment can ship regional fares.
///
/// # Examples
/// ```
/// use tripwise_core::{FareTable, VehicleType};
///
/// let table = FareTable::default();
/// assert_eq!(table.base_fare(&VehicleType::new("SUBWAY")), 1250);
/// assert_eq!(table.base_fare(&VehicleType::new("FERRY")), 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareTable {
    /// Flat boarding fare per vehicle type.
    pub base_fares: BTreeMap<VehicleType, u64>,
    /// Boarding fare for vehicle types missing from `base_fares`.
    pub default_base_fare: u64,
    /// Distance rate for rail vehicles, per kilometre.
    pub rail_rates_per_km: BTreeMap<VehicleType, f64>,
    /// Distance rate for rail vehicles missing from `rail_rates_per_km`.
    pub generic_rail_rate_per_km: f64,
    /// Long-distance surcharge.
    pub long_distance_surcharge: DistanceSurcharge,
    /// Treatment of transit steps lacking details or distance.
    pub malformed_steps: MalformedStepPolicy,
    /// Currency every amount is expressed in.
    pub currency: Currency,
}

impl Default for FareTable {
    fn default() -> Self {
        let base_fares = [
            ("BUS", 1_200),
            ("SUBWAY", 1_250),
            ("TRAIN", 5_000),
            ("HEAVY_RAIL", 5_000),
            ("HIGH_SPEED_TRAIN", 10_000),
            ("COMMUTER_TRAIN", 3_000),
            ("TRAM", 1_200),
        ]
        .into_iter()
        .map(|(name, fare)| (VehicleType::new(name), fare))
        .collect();
        let rail_rates_per_km = [
            ("TRAIN", 50.0),
            ("HEAVY_RAIL", 50.0),
            ("HIGH_SPEED_TRAIN", 80.0),
            ("COMMUTER_TRAIN", 40.0),
        ]
        .into_iter()
        .map(|(name, rate)| (VehicleType::new(name), rate))
        .collect();
        Self {
            base_fares,
            default_base_fare: 2_000,
            rail_rates_per_km,
            generic_rail_rate_per_km: 50.0,
            long_distance_surcharge: DistanceSurcharge {
                vehicle_type: VehicleType::new("BUS"),
                threshold_km: 10.0,
                per_km: 100.0,
            },
            malformed_steps: MalformedStepPolicy::default(),
            currency: Currency::default(),
        }
    }
}

impl FareTable {
    /// Boarding fare for `vehicle`, falling back to the default fare.
    #[must_use]
    pub fn base_fare(&self, vehicle: &VehicleType) -> u64 {
        self.base_fares
            .get(vehicle)
            .copied()
            .unwrap_or(self.default_base_fare)
    }

    /// Per-kilometre rate for a rail `vehicle`.
    #[must_use]
    pub fn rail_rate_per_km(&self, vehicle: &VehicleType) -> f64 {
        self.rail_rates_per_km
            .get(vehicle)
            .copied()
            .unwrap_or(self.generic_rail_rate_per_km)
    }

    /// Replace the malformed-step policy, returning `self` for chaining.
    #[must_use]
    pub const fn with_malformed_steps(mut self, policy: MalformedStepPolicy) -> Self {
        self.malformed_steps = policy;
        self
    }

    /// Replace the currency, returning `self` for chaining.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}
