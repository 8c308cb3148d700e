//! Day plans built from the fixed slot table.

use chrono::NaiveDate;
use tripwise_core::{
    Activity, ActivityType, DayPlan, Place, PlaceFilter, PlaceLocation, PlaceQuery, PlaceType,
    PlacesProvider, Preferences, ProviderError, TimeSlot,
};

/// Search radius for sightseeing and shopping.
const SIGHTSEEING_RADIUS_METERS: u32 = 5_000;
/// Search radius for restaurants and nightlife.
const NEARBY_RADIUS_METERS: u32 = 3_000;
/// Keyword sent with every nightlife search.
const NIGHTLIFE_KEYWORD: &str = "bar";

/// Fills the slot table for one destination anchor.
///
/// Each day issues at most four searches: attractions, restaurants, the
/// afternoon category and nightlife. Lunch and dinner share the restaurant
/// results, as do the two morning slots. A slot whose search returns nothing
/// after ranking is left out.
pub struct DayPlanner<'a, P> {
    places: &'a P,
    anchor: PlaceLocation,
    preferences: &'a Preferences,
}

impl<'a, P: PlacesProvider> DayPlanner<'a, P> {
    /// Plan days around `anchor` using `places`.
    pub fn new(
        places: &'a P,
        anchor: impl Into<PlaceLocation>,
        preferences: &'a Preferences,
    ) -> Self {
        Self {
            places,
            anchor: anchor.into(),
            preferences,
        }
    }

    /// Build the plan for day number `day` falling on `date`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProviderError`]; an empty search is not an error.
    pub fn plan(&self, day: u32, date: NaiveDate) -> Result<DayPlan, ProviderError> {
        let prefs = self.preferences;
        let mut activities = Vec::new();

        if !prefs.skip_attractions {
            let mut attractions = self
                .search(
                    PlaceType::TouristAttraction,
                    SIGHTSEEING_RADIUS_METERS,
                    &prefs.attraction_keywords,
                    prefs.attraction_filter(),
                )?
                .into_iter();
            for slot in [TimeSlot::Morning, TimeSlot::LateMorning] {
                if let Some(place) = attractions.next() {
                    activities.push(Activity::new(slot, ActivityType::Attraction, place));
                }
            }
        }

        let mut restaurants = self
            .search(
                PlaceType::Restaurant,
                NEARBY_RADIUS_METERS,
                &prefs.food_keywords,
                prefs.dining_filter(),
            )?
            .into_iter();
        if let Some(place) = restaurants.next() {
            activities.push(Activity::new(TimeSlot::Lunch, ActivityType::Restaurant, place));
        }

        if !prefs.skip_attractions {
            let (place_type, activity_type) = if prefs.include_shopping {
                (PlaceType::ShoppingMall, ActivityType::Shopping)
            } else {
                (PlaceType::TouristAttraction, ActivityType::Attraction)
            };
            let afternoon = self.search(
                place_type,
                SIGHTSEEING_RADIUS_METERS,
                &prefs.afternoon_keywords,
                prefs.attraction_filter(),
            )?;
            if let Some(place) = afternoon.into_iter().next() {
                activities.push(Activity::new(TimeSlot::Afternoon, activity_type, place));
            }
        }

        if let Some(place) = restaurants.next() {
            activities.push(Activity::new(TimeSlot::Dinner, ActivityType::Restaurant, place));
        }

        if prefs.include_nightlife {
            let nightlife = self.search(
                PlaceType::NightClub,
                NEARBY_RADIUS_METERS,
                NIGHTLIFE_KEYWORD,
                prefs.nightlife_filter(),
            )?;
            if let Some(place) = nightlife.into_iter().next() {
                activities.push(Activity::new(TimeSlot::Evening, ActivityType::Nightlife, place));
            }
        }

        log::debug!("day {day} ({date}): {} activities", activities.len());
        Ok(DayPlan {
            day,
            date,
            activities,
        })
    }

    fn search(
        &self,
        place_type: PlaceType,
        radius_meters: u32,
        keyword: &str,
        filter: PlaceFilter,
    ) -> Result<Vec<Place>, ProviderError> {
        let query = PlaceQuery::new(self.anchor.clone(), place_type)
            .with_radius(radius_meters)
            .with_keyword(keyword)
            .with_filter(filter);
        let found = self.places.get_places(&query)?;
        log::debug!(
            "{} search near {} returned {} places",
            query.place_type,
            query.location,
            found.len()
        );
        Ok(filter.rank(found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tripwise_core::test_support::{DESTINATION, StubPlacesProvider, rated_place};
    use tripwise_core::{PreferencesInput, ProviderError};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date")
    }

    #[fixture]
    fn stocked() -> StubPlacesProvider {
        StubPlacesProvider::default()
            .with_places(
                PlaceType::TouristAttraction,
                vec![
                    rated_place("Gamcheon", PlaceType::TouristAttraction, 4.3),
                    rated_place("Haedong Yonggungsa", PlaceType::TouristAttraction, 4.8),
                    rated_place("Closed pier", PlaceType::TouristAttraction, 2.1),
                ],
            )
            .with_places(
                PlaceType::Restaurant,
                vec![
                    rated_place("Dwaeji Gukbap", PlaceType::Restaurant, 4.5),
                    rated_place("Milmyeon", PlaceType::Restaurant, 4.2)
                        .with_price_level(1),
                    rated_place("Hanwoo House", PlaceType::Restaurant, 4.9)
                        .with_price_level(4),
                ],
            )
            .with_places(
                PlaceType::ShoppingMall,
                vec![rated_place("Shinsegae Centum", PlaceType::ShoppingMall, 4.4)],
            )
            .with_places(
                PlaceType::NightClub,
                vec![rated_place("Seomyeon Bar", PlaceType::NightClub, 4.0)],
            )
    }

    fn plan_with(places: &StubPlacesProvider, input: PreferencesInput) -> DayPlan {
        let prefs = Preferences::from(input);
        DayPlanner::new(places, DESTINATION, &prefs)
            .plan(1, date())
            .expect("day plan")
    }

    #[rstest]
    fn fills_default_slots_in_order(stocked: StubPlacesProvider) {
        let plan = plan_with(&stocked, PreferencesInput::default());
        let slots: Vec<(TimeSlot, &str)> = plan
            .activities
            .iter()
            .map(|a| (a.time_slot, a.place.name.as_str()))
            .collect();
        assert_eq!(
            slots,
            [
                (TimeSlot::Morning, "Haedong Yonggungsa"),
                (TimeSlot::LateMorning, "Gamcheon"),
                (TimeSlot::Lunch, "Dwaeji Gukbap"),
                (TimeSlot::Afternoon, "Haedong Yonggungsa"),
                (TimeSlot::Dinner, "Milmyeon"),
            ]
        );
        assert_eq!(stocked.count_for(&PlaceType::Restaurant), 1);
        assert_eq!(stocked.count_for(&PlaceType::NightClub), 0);
    }

    #[rstest]
    fn skipping_attractions_leaves_meals(stocked: StubPlacesProvider) {
        let plan = plan_with(
            &stocked,
            PreferencesInput {
                skip_attractions: Some(true),
                include_shopping: Some(true),
                ..PreferencesInput::default()
            },
        );
        assert!(plan.activity_types().all(|t| t == ActivityType::Restaurant));
        assert_eq!(stocked.count_for(&PlaceType::TouristAttraction), 0);
        assert_eq!(stocked.count_for(&PlaceType::ShoppingMall), 0);
    }

    #[rstest]
    fn shopping_and_nightlife_extend_the_day(stocked: StubPlacesProvider) {
        let plan = plan_with(
            &stocked,
            PreferencesInput {
                include_shopping: Some(true),
                include_nightlife: Some(true),
                ..PreferencesInput::default()
            },
        );
        let afternoon = plan
            .activities
            .iter()
            .find(|a| a.time_slot == TimeSlot::Afternoon)
            .expect("afternoon slot");
        assert_eq!(afternoon.activity_type, ActivityType::Shopping);
        assert_eq!(afternoon.description, "Afternoon activity");
        assert_eq!(
            plan.activities.last().map(|a| a.activity_type),
            Some(ActivityType::Nightlife)
        );

        let night_query = stocked
            .queries()
            .into_iter()
            .find(|q| q.place_type == PlaceType::NightClub)
            .expect("nightlife query");
        assert_eq!(night_query.keyword.as_deref(), Some("bar"));
        assert_eq!(night_query.radius_meters, 3_000);
        assert_eq!(night_query.filter.max_price_level, None);
    }

    #[rstest]
    fn single_restaurant_means_no_dinner(stocked: StubPlacesProvider) {
        let places = stocked.with_places(
            PlaceType::Restaurant,
            vec![rated_place("Only one", PlaceType::Restaurant, 4.6)],
        );
        let plan = plan_with(&places, PreferencesInput::default());
        assert!(plan.activities.iter().any(|a| a.time_slot == TimeSlot::Lunch));
        assert!(!plan.activities.iter().any(|a| a.time_slot == TimeSlot::Dinner));
    }

    #[rstest]
    fn queries_carry_keywords_and_radii(stocked: StubPlacesProvider) {
        plan_with(
            &stocked,
            PreferencesInput {
                attraction_keywords: Some("temple".into()),
                cuisine: Some("seafood".into()),
                ..PreferencesInput::default()
            },
        );
        let queries = stocked.queries();
        let first = queries.first().expect("attraction query");
        assert_eq!(first.keyword.as_deref(), Some("temple"));
        assert_eq!(first.radius_meters, 5_000);
        assert_eq!(first.location, PlaceLocation::Coordinates(DESTINATION));
        let dining = queries.get(1).expect("restaurant query");
        assert_eq!(dining.keyword.as_deref(), Some("seafood"));
        assert_eq!(dining.radius_meters, 3_000);
        assert_eq!(dining.filter.max_price_level, Some(2));
    }

    #[rstest]
    fn provider_failure_aborts_the_day() {
        let places = StubPlacesProvider::default().with_error(ProviderError::Parse {
            message: "truncated".into(),
        });
        let prefs = Preferences::default();
        let result = DayPlanner::new(&places, DESTINATION, &prefs).plan(1, date());
        assert!(matches!(result, Err(ProviderError::Parse { .. })));
    }
}
