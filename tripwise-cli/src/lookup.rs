//! Single-provider lookups: `directions` and `places`.
//!
//! Both commands reuse the planner's provider selection and print the
//! normalised results, which makes them handy for checking credentials and
//! fare inputs before planning.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tripwise_core::request::parse_departure_time;
use tripwise_core::{
    DirectionsProvider, DirectionsQuery, Place, PlaceFilter, PlaceQuery, PlaceType,
    PlacesProvider, Route, TravelMode,
};

use crate::files::write_json;
use crate::providers::{ProviderFactory, ProviderKind, ProviderSettings};
use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_DEPARTURE_TIME, ARG_DESTINATION, ARG_KEYWORD, ARG_LOCATION,
    ARG_MIN_RATING, ARG_ORIGIN, ARG_PLACE_TYPE, ARG_PRICE_LEVEL, ARG_PROVIDER, ARG_RADIUS,
    ARG_TIMEOUT_SECS, ARG_TRAVEL_MODE, CliError, ENV_DIRECTIONS_API_KEY,
    ENV_DIRECTIONS_DESTINATION, ENV_DIRECTIONS_ORIGIN, ENV_PLACES_API_KEY, ENV_PLACES_LOCATION,
};

/// CLI arguments for the `directions` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Fetch candidate routes between two places")]
#[ortho_config(prefix = "TRIPWISE")]
pub(crate) struct DirectionsArgs {
    /// Start address, place name or `lat,lng`.
    #[arg(long = ARG_ORIGIN, value_name = "place")]
    #[serde(default)]
    pub(crate) origin: Option<String>,
    /// End address, place name or `lat,lng`.
    #[arg(long = ARG_DESTINATION, value_name = "place")]
    #[serde(default)]
    pub(crate) destination: Option<String>,
    /// Departure time; the provider assumes now when unset.
    #[arg(long = ARG_DEPARTURE_TIME, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) departure_time: Option<String>,
    /// Travel mode (transit when unset).
    #[arg(long = ARG_TRAVEL_MODE, value_name = "mode")]
    #[serde(default)]
    pub(crate) travel_mode: Option<String>,
    /// Map services to query.
    #[arg(long = ARG_PROVIDER, value_enum)]
    #[serde(default)]
    pub(crate) provider: Option<ProviderKind>,
    /// Google Maps API key.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Override the provider's base URL.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl DirectionsArgs {
    pub(crate) fn into_config(self) -> Result<DirectionsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DirectionsConfig::try_from(merged)
    }
}

/// Resolved `directions` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DirectionsConfig {
    pub(crate) query: DirectionsQuery,
    pub(crate) providers: ProviderSettings,
}

impl TryFrom<DirectionsArgs> for DirectionsConfig {
    type Error = CliError;

    fn try_from(args: DirectionsArgs) -> Result<Self, Self::Error> {
        let origin = required(args.origin, ARG_ORIGIN, ENV_DIRECTIONS_ORIGIN)?;
        let destination =
            required(args.destination, ARG_DESTINATION, ENV_DIRECTIONS_DESTINATION)?;
        let mode = args
            .travel_mode
            .filter(|mode| !mode.trim().is_empty())
            .map_or(TravelMode::Transit, TravelMode::from);
        let mut query = DirectionsQuery::new(origin, destination).with_mode(mode);
        if let Some(text) = args.departure_time {
            query = query.departing_at(parse_departure_time(&text)?);
        }
        let providers = ProviderSettings::resolve(
            args.provider,
            args.api_key,
            args.base_url,
            args.timeout_secs,
            ENV_DIRECTIONS_API_KEY,
        );
        Ok(Self { query, providers })
    }
}

/// CLI arguments for the `places` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search for places near a location. Results below the \
                 minimum rating or above the price level are dropped and \
                 the rest are sorted by rating, highest first.",
    about = "Search for rated places near a location"
)]
#[ortho_config(prefix = "TRIPWISE")]
pub(crate) struct PlacesArgs {
    /// Address, place name or `lat,lng` to search around.
    #[arg(long = ARG_LOCATION, value_name = "place")]
    #[serde(default)]
    pub(crate) location: Option<String>,
    /// Search radius in metres (5000 when unset).
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<u32>,
    /// Place category (`tourist_attraction` when unset).
    #[arg(long = ARG_PLACE_TYPE, value_name = "category")]
    #[serde(default)]
    pub(crate) place_type: Option<String>,
    /// Free-text keyword.
    #[arg(long = ARG_KEYWORD, value_name = "text")]
    #[serde(default)]
    pub(crate) keyword: Option<String>,
    /// Minimum rating.
    #[arg(long = ARG_MIN_RATING, value_name = "rating")]
    #[serde(default)]
    pub(crate) min_rating: Option<f32>,
    /// Highest accepted price level.
    #[arg(long = ARG_PRICE_LEVEL, value_name = "level")]
    #[serde(default)]
    pub(crate) price_level: Option<u8>,
    /// Map services to query.
    #[arg(long = ARG_PROVIDER, value_enum)]
    #[serde(default)]
    pub(crate) provider: Option<ProviderKind>,
    /// Google Maps API key.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Override the provider's base URL.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl PlacesArgs {
    pub(crate) fn into_config(self) -> Result<PlacesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlacesConfig::try_from(merged)
    }
}

/// Resolved `places` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlacesConfig {
    pub(crate) query: PlaceQuery,
    pub(crate) providers: ProviderSettings,
}

impl TryFrom<PlacesArgs> for PlacesConfig {
    type Error = CliError;

    fn try_from(args: PlacesArgs) -> Result<Self, Self::Error> {
        let location = required(args.location, ARG_LOCATION, ENV_PLACES_LOCATION)?;
        let place_type = args
            .place_type
            .filter(|name| !name.trim().is_empty())
            .map_or(PlaceType::TouristAttraction, PlaceType::from);
        let mut query = PlaceQuery::new(location, place_type).with_filter(PlaceFilter {
            min_rating: args.min_rating,
            max_price_level: args.price_level,
        });
        if let Some(radius) = args.radius {
            query = query.with_radius(radius);
        }
        if let Some(keyword) = args.keyword {
            query = query.with_keyword(keyword);
        }
        let providers = ProviderSettings::resolve(
            args.provider,
            args.api_key,
            args.base_url,
            args.timeout_secs,
            ENV_PLACES_API_KEY,
        );
        Ok(Self { query, providers })
    }
}

fn required(
    value: Option<String>,
    field: &'static str,
    env: &'static str,
) -> Result<String, CliError> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or(CliError::MissingArgument { field, env })
}

pub(crate) fn run_directions_with(
    args: DirectionsArgs,
    factory: &dyn ProviderFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let routes = execute_directions(args, factory)?;
    write_json(writer, &routes)
}

fn execute_directions(
    args: DirectionsArgs,
    factory: &dyn ProviderFactory,
) -> Result<Vec<Route>, CliError> {
    let config = args.into_config()?;
    let provider = factory.directions(&config.providers)?;
    let routes = provider.get_directions(&config.query)?;
    log::info!(
        "{} routes from {} to {}",
        routes.len(),
        config.query.origin,
        config.query.destination
    );
    Ok(routes)
}

pub(crate) fn run_places_with(
    args: PlacesArgs,
    factory: &dyn ProviderFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let places = execute_places(args, factory)?;
    write_json(writer, &places)
}

/// Providers may pre-filter, but ranking always happens here so every
/// provider prints the same order.
fn execute_places(args: PlacesArgs, factory: &dyn ProviderFactory) -> Result<Vec<Place>, CliError> {
    let config = args.into_config()?;
    let provider = factory.places(&config.providers)?;
    let found = provider.get_places(&config.query)?;
    let ranked = config.query.filter.rank(found);
    log::info!(
        "{} {} near {}",
        ranked.len(),
        config.query.place_type,
        config.query.location
    );
    Ok(ranked)
}

#[cfg(test)]
pub(crate) fn directions_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<DirectionsConfig, CliError> {
    let merged = DirectionsArgs::merge_from_layers(layers).map_err(CliError::from)?;
    DirectionsConfig::try_from(merged)
}
