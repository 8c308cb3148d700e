//! Day-by-day itinerary types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{Place, RouteSelection, Strategy};

/// Fixed time slots of a day plan, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeSlot {
    /// `09:00` sightseeing.
    Morning,
    /// `11:30` sightseeing.
    LateMorning,
    /// `13:00` lunch.
    Lunch,
    /// `15:00` sightseeing or shopping.
    Afternoon,
    /// `19:00` dinner.
    Dinner,
    /// `21:00` nightlife.
    Evening,
}

impl TimeSlot {
    /// Every slot in chronological order.
    pub const ALL: [Self; 6] = [
        Self::Morning,
        Self::LateMorning,
        Self::Lunch,
        Self::Afternoon,
        Self::Dinner,
        Self::Evening,
    ];

    /// Clock label, e.g. `"09:00"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "09:00",
            Self::LateMorning => "11:30",
            Self::Lunch => "13:00",
            Self::Afternoon => "15:00",
            Self::Dinner => "19:00",
            Self::Evening => "21:00",
        }
    }

    /// Description attached to activities in this slot.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Morning => "Morning sightseeing",
            Self::LateMorning => "Late morning activity",
            Self::Lunch => "Lunch",
            Self::Afternoon => "Afternoon activity",
            Self::Dinner => "Dinner",
            Self::Evening => "Evening entertainment",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned for labels that are not one of the fixed slots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time slot: {0}")]
pub struct ParseTimeSlotError(String);

impl FromStr for TimeSlot {
    type Err = ParseTimeSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.label() == s.trim())
            .ok_or_else(|| ParseTimeSlotError(s.to_owned()))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Kind of activity scheduled in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    /// Sightseeing.
    Attraction,
    /// A meal.
    Restaurant,
    /// Shopping.
    Shopping,
    /// Bars and clubs.
    Nightlife,
}

/// A place visited in one time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// When the activity starts.
    #[serde(rename = "time")]
    pub time_slot: TimeSlot,
    /// What kind of activity it is.
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Where it happens.
    #[serde(flatten)]
    pub place: Place,
    /// Short label, e.g. `"Lunch"`.
    pub description: String,
}

impl Activity {
    /// Schedule `place` in `time_slot`, using the slot's description.
    #[must_use]
    pub fn new(time_slot: TimeSlot, activity_type: ActivityType, place: Place) -> Self {
        Self {
            time_slot,
            activity_type,
            place,
            description: time_slot.description().to_owned(),
        }
    }
}

/// Activities for one calendar day at the destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// One-based day number.
    pub day: u32,
    /// Calendar date at the destination.
    pub date: NaiveDate,
    /// Activities in slot order.
    pub activities: Vec<Activity>,
}

impl DayPlan {
    /// Activity types in slot order.
    pub fn activity_types(&self) -> impl Iterator<Item = ActivityType> + '_ {
        self.activities.iter().map(|activity| activity.activity_type)
    }
}

/// A round trip with a day plan for each day at the destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    /// Where the trip starts and ends.
    pub origin: String,
    /// Where the traveller stays.
    pub destination: String,
    /// Outbound departure.
    pub departure_time: DateTime<FixedOffset>,
    /// Outbound arrival: departure plus the first-leg duration.
    pub arrival_time: DateTime<FixedOffset>,
    /// Number of days at the destination.
    pub duration_days: u32,
    /// Strategy used for both directions.
    pub strategy: Strategy,
    /// Outbound route selection.
    pub outbound: RouteSelection,
    /// Return departure: arrival plus `duration_days` whole days.
    pub return_departure_time: DateTime<FixedOffset>,
    /// Return route selection, priced independently.
    pub return_trip: RouteSelection,
    /// Day plans in day order.
    pub days: Vec<DayPlan>,
}

impl Itinerary {
    /// Combined fare of the outbound and return routes.
    #[must_use]
    pub const fn round_trip_cost(&self) -> u64 {
        self.outbound
            .metrics
            .cost
            .saturating_add(self.return_trip.metrics.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlaceType;
    use geo::Coord;
    use rstest::rstest;

    #[rstest]
    fn slots_are_chronological() {
        let labels: Vec<&str> = TimeSlot::ALL.iter().map(|slot| slot.label()).collect();
        assert_eq!(labels, ["09:00", "11:30", "13:00", "15:00", "19:00", "21:00"]);
        assert!(TimeSlot::Lunch < TimeSlot::Dinner);
    }

    #[rstest]
    #[case("13:00", Ok(TimeSlot::Lunch))]
    #[case("12:00", Err(ParseTimeSlotError("12:00".into())))]
    fn parses_slot_labels(
        #[case] label: &str,
        #[case] expected: Result<TimeSlot, ParseTimeSlotError>,
    ) {
        assert_eq!(label.parse::<TimeSlot>(), expected);
    }

    #[rstest]
    fn activity_flattens_place_fields() {
        let place = Place::new(
            "Bukchon",
            Coord { x: 126.98, y: 37.58 },
            "Jongno-gu",
            PlaceType::TouristAttraction,
        )
        .with_rating(4.6);
        let activity = Activity::new(TimeSlot::Morning, ActivityType::Attraction, place);
        let json = serde_json::to_value(&activity).expect("serialise activity");
        assert_eq!(json["time"], "09:00");
        assert_eq!(json["type"], "attraction");
        assert_eq!(json["name"], "Bukchon");
        assert_eq!(json["vicinity"], "Jongno-gu");
        assert_eq!(json["description"], "Morning sightseeing");

        let decoded: Activity = serde_json::from_value(json).expect("deserialise activity");
        assert_eq!(decoded, activity);
    }
}
