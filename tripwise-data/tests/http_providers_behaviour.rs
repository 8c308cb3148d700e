//! Behavioural tests for the HTTP adapters against a scripted local server.

mod support;

use std::cell::RefCell;
use std::time::Duration;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::{Reply, ScriptedServer};
use tripwise_core::{
    CostError, CostModel, DirectionsProvider, DirectionsQuery, FareTable, MalformedStepPolicy,
    Place, PlaceFilter, PlaceLocation, PlaceQuery, PlaceType, PlacesProvider, ProviderError,
    Route, TravelMode, VehicleType,
};
use tripwise_core::location::parse_lat_lng;
use tripwise_data::{
    GoogleConfig, GoogleDirectionsProvider, GooglePlacesProvider, NominatimGeocoder, OsmConfig,
    OsrmDirectionsProvider, OverpassPlacesProvider, PlaceDetails, ReverseGeocoded,
};

const API_KEY: &str = "test-secret-key";

type ServerCell = RefCell<Option<ScriptedServer>>;
type RoutesCell = RefCell<Option<Result<Vec<Route>, ProviderError>>>;
type PlacesCell = RefCell<Option<Result<Vec<Place>, ProviderError>>>;
type DetailsCell = RefCell<Option<Result<PlaceDetails, ProviderError>>>;
type AddressCell = RefCell<Option<Result<ReverseGeocoded, ProviderError>>>;

#[fixture]
fn server() -> ServerCell {
    RefCell::new(None)
}

#[fixture]
fn routes() -> RoutesCell {
    RefCell::new(None)
}

#[fixture]
fn places() -> PlacesCell {
    RefCell::new(None)
}

#[fixture]
fn details() -> DetailsCell {
    RefCell::new(None)
}

#[fixture]
fn address() -> AddressCell {
    RefCell::new(None)
}

fn google_config(server: &ServerCell) -> GoogleConfig {
    let guard = server.borrow();
    let running = guard.as_ref().expect("server must be started");
    GoogleConfig::new(API_KEY)
        .with_base_url(format!("{}/maps/api", running.base_url()))
        .with_timeout(Duration::from_secs(1))
}

fn osm_config(server: &ServerCell) -> OsmConfig {
    let guard = server.borrow();
    let running = guard.as_ref().expect("server must be started");
    let base = running.base_url();
    OsmConfig::default()
        .with_nominatim_url(base)
        .with_osrm_url(base)
        .with_overpass_url(format!("{base}/api/interpreter"))
}

fn start(server: &ServerCell, replies: Vec<Reply>) {
    server.replace(Some(ScriptedServer::start(replies)));
}

fn returned_routes(routes: &RoutesCell) -> Vec<Route> {
    routes
        .borrow()
        .clone()
        .expect("directions were requested")
        .expect("directions succeeded")
}

fn recorded_targets(server: &ServerCell) -> Vec<String> {
    let guard = server.borrow();
    let running = guard.as_ref().expect("server must be started");
    running
        .requests()
        .iter()
        .map(|request| request.target().to_owned())
        .collect()
}

// --- Given steps ---

#[given("a Google service answering with {fixture}")]
fn google_answering(#[from(server)] server: &ServerCell, fixture: String) {
    start(server, vec![Reply::fixture(&fixture)]);
}

#[given("a Google service reporting no results")]
fn google_zero_results(#[from(server)] server: &ServerCell) {
    start(
        server,
        vec![Reply::ok(r#"{ "status": "ZERO_RESULTS", "routes": [] }"#)],
    );
}

#[given("a Google service failing with status {status}")]
fn google_failing(#[from(server)] server: &ServerCell, status: u16) {
    start(
        server,
        vec![Reply::Json {
            status,
            body: r#"{ "error": "backend unavailable" }"#.to_owned(),
        }],
    );
}

#[given("a Google service that never answers")]
fn google_stalling(#[from(server)] server: &ServerCell) {
    start(server, vec![Reply::Stall(Duration::from_secs(3))]);
}

#[given("an OSM service answering with {fixtures}")]
fn osm_answering(#[from(server)] server: &ServerCell, fixtures: String) {
    let replies = fixtures.split(',').map(|name| Reply::fixture(name.trim())).collect();
    start(server, replies);
}

#[given("an OSM geocoder that finds nothing")]
fn osm_geocoder_empty(#[from(server)] server: &ServerCell) {
    start(server, vec![Reply::ok("[]")]);
}

// --- When steps ---

#[when("I request transit directions from {origin} to {destination}")]
fn request_transit(
    #[from(server)] server: &ServerCell,
    #[from(routes)] routes: &RoutesCell,
    origin: String,
    destination: String,
) {
    let provider =
        GoogleDirectionsProvider::with_config(google_config(server)).expect("provider builds");
    let query = DirectionsQuery::new(origin, destination);
    routes.replace(Some(provider.get_directions(&query)));
}

#[when("I request driving directions from {origin} to {destination}")]
fn request_driving(
    #[from(server)] server: &ServerCell,
    #[from(routes)] routes: &RoutesCell,
    origin: String,
    destination: String,
) {
    let provider = OsrmDirectionsProvider::new(&osm_config(server)).expect("provider builds");
    let query = DirectionsQuery::new(origin, destination).with_mode(TravelMode::Driving);
    routes.replace(Some(provider.get_directions(&query)));
}

#[when("I search for affordable restaurants near Busan Station")]
fn search_google_restaurants(
    #[from(server)] server: &ServerCell,
    #[from(places)] places: &PlacesCell,
) {
    let provider =
        GooglePlacesProvider::with_config(google_config(server)).expect("provider builds");
    let query = PlaceQuery::new("Busan Station", PlaceType::Restaurant)
        .with_radius(3_000)
        .with_filter(PlaceFilter {
            min_rating: Some(4.0),
            max_price_level: Some(2),
        });
    places.replace(Some(provider.get_places(&query)));
}

#[when("I search for restaurants around {location}")]
fn search_overpass_restaurants(
    #[from(server)] server: &ServerCell,
    #[from(places)] places: &PlacesCell,
    location: String,
) {
    let provider = OverpassPlacesProvider::new(&osm_config(server)).expect("provider builds");
    let query = PlaceQuery::new(location, PlaceType::Restaurant).with_radius(3_000);
    places.replace(Some(provider.get_places(&query)));
}

#[when("I search for restaurants matching {keyword} around {location}")]
fn search_overpass_with_keyword(
    #[from(server)] server: &ServerCell,
    #[from(places)] places: &PlacesCell,
    keyword: String,
    location: String,
) {
    let provider = OverpassPlacesProvider::new(&osm_config(server)).expect("provider builds");
    let query = PlaceQuery::new(location, PlaceType::Restaurant)
        .with_radius(3_000)
        .with_keyword(keyword);
    places.replace(Some(provider.get_places(&query)));
}

#[when("I look up details for place {place_id}")]
fn look_up_details(
    #[from(server)] server: &ServerCell,
    #[from(details)] details: &DetailsCell,
    place_id: String,
) {
    let provider =
        GooglePlacesProvider::with_config(google_config(server)).expect("provider builds");
    details.replace(Some(provider.details(&place_id)));
}

#[when("I search the text {text} near {location}")]
fn search_text_near(
    #[from(server)] server: &ServerCell,
    #[from(places)] places: &PlacesCell,
    text: String,
    location: String,
) {
    let provider =
        GooglePlacesProvider::with_config(google_config(server)).expect("provider builds");
    let near = PlaceLocation::from(location);
    places.replace(Some(provider.text_search(&text, Some(&near))));
}

#[when("I reverse geocode {coordinates}")]
fn reverse_geocode(
    #[from(server)] server: &ServerCell,
    #[from(address)] address: &AddressCell,
    coordinates: String,
) {
    let geocoder = NominatimGeocoder::new(&osm_config(server)).expect("geocoder builds");
    let location = parse_lat_lng(&coordinates).expect("step passes a lat,lng pair");
    address.replace(Some(geocoder.reverse(location)));
}

// --- Then steps ---

#[then("{count} routes are returned")]
fn routes_returned(#[from(routes)] routes: &RoutesCell, count: usize) {
    assert_eq!(returned_routes(routes).len(), count);
}

#[then("the first route rides a {vehicle}")]
fn first_route_rides(#[from(routes)] routes: &RoutesCell, vehicle: String) {
    let found = returned_routes(routes);
    let first = found.first().expect("at least one route");
    let vehicles: Vec<VehicleType> = first
        .first_leg()
        .steps
        .iter()
        .filter_map(|step| step.transit.as_ref())
        .map(|transit| transit.vehicle_type.clone())
        .collect();
    assert_eq!(vehicles, [VehicleType::new(vehicle)]);
}

#[then("skipping malformed steps prices the first route by its priced rides")]
fn skip_prices_known_rides(#[from(routes)] routes: &RoutesCell) {
    let found = returned_routes(routes);
    let first = found.first().expect("at least one route");
    let model = CostModel::default();
    let priced_rides: u64 = first
        .first_leg()
        .steps
        .iter()
        .filter(|step| step.transit.is_some())
        .map(|step| model.step_cost(step).expect("complete rides price"))
        .sum();
    assert!(priced_rides > 0);
    assert_eq!(model.route_cost(first), Ok(priced_rides));
}

#[then("rejecting malformed steps refuses to price the first route")]
fn reject_refuses_route(#[from(routes)] routes: &RoutesCell) {
    let found = returned_routes(routes);
    let first = found.first().expect("at least one route");
    let model =
        CostModel::new(FareTable::default().with_malformed_steps(MalformedStepPolicy::Reject));
    assert_eq!(
        model.route_cost(first),
        Err(CostError::MalformedStep {
            missing: "transit details"
        })
    );
}

#[then("the request asked for alternatives with the API key")]
fn request_had_alternatives(#[from(server)] server: &ServerCell) {
    let targets = recorded_targets(server);
    let target = targets.first().expect("one request");
    assert!(target.starts_with("/maps/api/directions/json?"), "{target}");
    assert!(target.contains("alternatives=true"), "{target}");
    assert!(target.contains("mode=transit"), "{target}");
    assert!(target.contains(&format!("key={API_KEY}")), "{target}");
}

#[then("an HTTP {status} error is returned without the API key")]
fn http_error_is_redacted(#[from(routes)] routes: &RoutesCell, status: u16) {
    let outcome = routes.borrow().clone().expect("directions were requested");
    let err = outcome.expect_err("request should fail");
    assert!(
        matches!(&err, ProviderError::Http { status: got, .. } if *got == status),
        "expected HTTP {status}, got {err:?}"
    );
    assert!(!err.to_string().contains(API_KEY), "{err}");
}

#[then("every step is driven")]
fn every_step_driven(#[from(routes)] routes: &RoutesCell) {
    let found = returned_routes(routes);
    assert!(
        found
            .iter()
            .flat_map(|route| route.first_leg().steps.iter())
            .all(|step| step.travel_mode == TravelMode::Driving)
    );
}

#[then("the first route arrives at {address}")]
fn first_route_arrives(#[from(routes)] routes: &RoutesCell, address: String) {
    let found = returned_routes(routes);
    let first = found.first().expect("at least one route");
    assert_eq!(first.first_leg().end_address.as_deref(), Some(address.as_str()));
}

#[then("the service saw requests for {paths}")]
fn service_saw_paths(#[from(server)] server: &ServerCell, paths: String) {
    let targets = recorded_targets(server);
    let expected: Vec<&str> = paths.split(',').map(str::trim).collect();
    assert_eq!(targets.len(), expected.len(), "{targets:?}");
    for (target, prefix) in targets.iter().zip(expected) {
        assert!(target.starts_with(prefix), "{target} should start with {prefix}");
    }
}

#[then("the places are {names}")]
fn places_are(#[from(places)] places: &PlacesCell, names: String) {
    let found = places
        .borrow()
        .clone()
        .expect("places were searched")
        .expect("search succeeded");
    let actual: Vec<String> = found.into_iter().map(|place| place.name).collect();
    let expected: Vec<String> = names.split(',').map(|n| n.trim().to_owned()).collect();
    assert_eq!(actual, expected);
}

#[then("the first place is a {category}")]
fn first_place_category(#[from(places)] places: &PlacesCell, category: String) {
    let found = places
        .borrow()
        .clone()
        .expect("places were searched")
        .expect("search succeeded");
    let first = found.first().expect("at least one place");
    assert_eq!(first.category, PlaceType::from(category));
}

#[then("the text search asked for a {radius} metre radius")]
fn text_search_radius(#[from(server)] server: &ServerCell, radius: u32) {
    let targets = recorded_targets(server);
    let target = targets.first().expect("one request");
    assert!(target.starts_with("/maps/api/place/textsearch/json?"), "{target}");
    assert!(target.contains(&format!("radius={radius}")), "{target}");
    assert!(target.contains("query=gukbap"), "{target}");
}

#[then("the details describe {name} with {count} reviews")]
fn details_describe(#[from(details)] details: &DetailsCell, name: String, count: usize) {
    let found = details
        .borrow()
        .clone()
        .expect("details were requested")
        .expect("details succeeded");
    assert_eq!(found.name, name);
    assert_eq!(found.place_id, "ChIJgamcheon");
    assert_eq!(found.reviews.len(), count);
    assert_eq!(found.phone.as_deref(), Some("051-204-1444"));
    assert_eq!(found.photo_references, ["gamcheon-photo-1"]);
}

#[then("the address lies in {city}")]
fn address_lies_in(#[from(address)] address: &AddressCell, city: String) {
    let found = address
        .borrow()
        .clone()
        .expect("reverse geocoding was requested")
        .expect("reverse geocoding succeeded");
    assert_eq!(found.address.get("city"), Some(&city));
    assert!(found.display_name.starts_with("Busan Station"), "{}", found.display_name);
}

#[then("the search was posted as form data")]
fn search_was_posted(#[from(server)] server: &ServerCell) {
    let guard = server.borrow();
    let requests = guard.as_ref().expect("server must be started").requests();
    let request = requests.first().expect("one request");
    assert!(request.request_line.starts_with("POST /api/interpreter"));
    assert!(
        request
            .headers
            .iter()
            .any(|h| h.starts_with("content-type: application/x-www-form-urlencoded"))
    );
    assert!(request.body.starts_with("data="), "{}", request.body);
}

#[then("the posted query selects restaurants without mentioning {keyword}")]
fn posted_query_ignores_keyword(#[from(server)] server: &ServerCell, keyword: String) {
    let guard = server.borrow();
    let requests = guard.as_ref().expect("server must be started").requests();
    let request = requests.first().expect("one request");
    assert!(request.body.contains("restaurant"), "{}", request.body);
    assert!(request.body.contains("around"), "{}", request.body);
    assert!(!request.body.contains(&keyword), "{}", request.body);
}

#[then("a geocoding error is returned")]
fn geocoding_error(#[from(routes)] routes: &RoutesCell) {
    let outcome = routes.borrow().clone().expect("directions were requested");
    assert_eq!(
        outcome,
        Err(ProviderError::Geocode {
            query: "Atlantis".into()
        })
    );
}

#[then("a timeout error is returned")]
fn timeout_error(#[from(routes)] routes: &RoutesCell) {
    let outcome = routes.borrow().clone().expect("directions were requested");
    assert!(
        matches!(outcome, Err(ProviderError::Timeout { timeout_secs: 1, .. })),
        "expected a timeout, got {outcome:?}"
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/http_providers.feature", name = $title)]
        fn $fn_name(
            server: ServerCell,
            routes: RoutesCell,
            places: PlacesCell,
            details: DetailsCell,
            address: AddressCell,
        ) {
            let _ = (server, routes, places, details, address);
        }
    };
}

register_scenario!(google_transit_directions, "Google transit directions are normalised");
register_scenario!(google_zero_results_scenario, "Google reporting no route yields an empty list");
register_scenario!(partial_transit_details, "Rides without a vehicle are left to the fare policy");
register_scenario!(google_places_ranked, "Google places are filtered and ranked");
register_scenario!(google_place_details, "Google place details are normalised");
register_scenario!(google_text_search, "Google text search is biased towards a location");
register_scenario!(server_errors_redacted, "Server errors keep the API key out of the message");
register_scenario!(osrm_geocoded_routes, "OSRM routes between geocoded endpoints");
register_scenario!(overpass_around_coordinate, "Overpass searches around a coordinate");
register_scenario!(overpass_ignores_keyword, "Overpass ignores the search keyword");
register_scenario!(reverse_geocoding, "Coordinates are reverse geocoded to an address");
register_scenario!(unknown_places_fail, "Unknown places fail to geocode");
register_scenario!(slow_services_time_out, "Slow services time out");
