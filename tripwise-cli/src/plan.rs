//! Plan command implementation for the Tripwise CLI.

use std::convert::Infallible;
use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tripwise_core::{DurationInput, PreferencesInput, TripRequest, TripRequestInput};
use tripwise_planner::{Planner, PlannerConfig, TripPlan, TripPlanner};

use crate::files::{load_json, write_json};
use crate::providers::{ProviderFactory, ProviderKind, ProviderSettings};
use crate::{
    ARG_AFTERNOON_KEYWORDS, ARG_API_KEY, ARG_ATTRACTION_KEYWORDS, ARG_BASE_URL, ARG_CUISINE,
    ARG_DEPARTURE_TIME, ARG_DESTINATION, ARG_DURATION, ARG_FARES, ARG_FOOD_KEYWORDS,
    ARG_INCLUDE_NIGHTLIFE, ARG_INCLUDE_SHOPPING, ARG_MIN_RATING, ARG_ORIGIN, ARG_PARALLEL,
    ARG_PLANNER_CONFIG, ARG_PRICE_LEVEL, ARG_PROVIDER, ARG_REQUEST, ARG_SKIP_ATTRACTIONS,
    ARG_TIMEOUT_SECS, ARG_TRAVEL_MODE, CliError, ENV_PLAN_API_KEY, ENV_PLAN_DEPARTURE_TIME,
    ENV_PLAN_DESTINATION, ENV_PLAN_DURATION, ENV_PLAN_ORIGIN, ENV_PLAN_REQUEST,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a multi-day round trip. The request can be a JSON \
                 trip request file, individual flags, or both; flags \
                 override fields read from the file. The output holds the \
                 cheapest, fastest and best-value itineraries with a \
                 comparison of every outbound route.",
    about = "Plan round-trip itineraries"
)]
#[ortho_config(prefix = "TRIPWISE")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file containing a trip request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Where the trip starts.
    #[arg(long = ARG_ORIGIN, value_name = "place")]
    #[serde(default)]
    pub(crate) origin: Option<String>,
    /// Where the traveller stays.
    #[arg(long = ARG_DESTINATION, value_name = "place")]
    #[serde(default)]
    pub(crate) destination: Option<String>,
    /// Outbound departure, RFC 3339 or `YYYY-MM-DDTHH:MM` in UTC.
    #[arg(long = ARG_DEPARTURE_TIME, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) departure_time: Option<String>,
    /// Days spent at the destination.
    #[arg(long = ARG_DURATION, value_name = "days", value_parser = duration_arg)]
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub(crate) duration: Option<DurationInput>,
    /// Travel mode for both directions (transit when unset).
    #[arg(long = ARG_TRAVEL_MODE, value_name = "mode")]
    #[serde(default)]
    pub(crate) travel_mode: Option<String>,
    /// Keywords for morning sightseeing.
    #[arg(long = ARG_ATTRACTION_KEYWORDS, value_name = "text")]
    #[serde(default)]
    pub(crate) attraction_keywords: Option<String>,
    /// Preferred cuisine.
    #[arg(long = ARG_CUISINE, value_name = "text")]
    #[serde(default)]
    pub(crate) cuisine: Option<String>,
    /// Keywords for restaurant searches; overrides the cuisine.
    #[arg(long = ARG_FOOD_KEYWORDS, value_name = "text")]
    #[serde(default)]
    pub(crate) food_keywords: Option<String>,
    /// Keywords for the afternoon slot.
    #[arg(long = ARG_AFTERNOON_KEYWORDS, value_name = "text")]
    #[serde(default)]
    pub(crate) afternoon_keywords: Option<String>,
    /// Minimum place rating.
    #[arg(long = ARG_MIN_RATING, value_name = "rating")]
    #[serde(default)]
    pub(crate) min_rating: Option<f32>,
    /// Price ceiling for every priced slot (0-4).
    #[arg(long = ARG_PRICE_LEVEL, value_name = "level")]
    #[serde(default)]
    pub(crate) price_level: Option<u8>,
    /// Search shopping malls in the afternoon.
    #[arg(
        long = ARG_INCLUDE_SHOPPING,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) include_shopping: Option<bool>,
    /// Add an evening nightlife slot.
    #[arg(
        long = ARG_INCLUDE_NIGHTLIFE,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) include_nightlife: Option<bool>,
    /// Leave sightseeing and shopping out of every day.
    #[arg(
        long = ARG_SKIP_ATTRACTIONS,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) skip_attractions: Option<bool>,
    /// Path to a JSON planner configuration.
    #[arg(long = ARG_PLANNER_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) planner_config: Option<Utf8PathBuf>,
    /// Path to a JSON fare table; replaces the planner configuration's fares.
    #[arg(long = ARG_FARES, value_name = "path")]
    #[serde(default)]
    pub(crate) fares: Option<Utf8PathBuf>,
    /// Build strategies and days concurrently.
    #[arg(
        long = ARG_PARALLEL,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) parallel: Option<bool>,
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

/// Durations stay text until request validation so that zero and
/// non-numeric values report the same errors as request files.
fn duration_arg(text: &str) -> Result<DurationInput, Infallible> {
    Ok(DurationInput::Text(text.to_owned()))
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    /// Optional JSON trip request.
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Request fields given as flags; they win over the file.
    pub(crate) overrides: TripRequestInput,
    /// Optional JSON planner configuration.
    pub(crate) planner_config_path: Option<Utf8PathBuf>,
    /// Optional JSON fare table.
    pub(crate) fares_path: Option<Utf8PathBuf>,
    pub(crate) parallel: Option<bool>,
    pub(crate) providers: ProviderSettings,
}

impl PlanConfig {
    /// Merge the request file with the flag overrides and validate it.
    pub(crate) fn trip_request(&self) -> Result<TripRequest, CliError> {
        let base = self.request_path.as_deref().map_or_else(
            || Ok(TripRequestInput::default()),
            |path| load_json(path, "trip request"),
        )?;
        let merged = overlay_request(base, self.overrides.clone());
        Ok(TripRequest::try_from(merged)?)
    }

    /// Planner settings after applying the fare table and parallel flag.
    pub(crate) fn planner(&self) -> Result<PlannerConfig, CliError> {
        let mut config = self.planner_config_path.as_deref().map_or_else(
            || Ok(PlannerConfig::default()),
            |path| load_json(path, "planner config"),
        )?;
        if let Some(path) = &self.fares_path {
            config = config.with_fares(load_json(path, "fare table")?);
        }
        if let Some(parallel) = self.parallel {
            config = config.with_parallel(parallel);
        }
        Ok(config)
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        if args.request_path.is_none() {
            require_flags(&args)?;
        }
        let providers = ProviderSettings::resolve(
            args.provider,
            args.api_key,
            args.base_url,
            args.timeout_secs,
            ENV_PLAN_API_KEY,
        );
        Ok(Self {
            request_path: args.request_path,
            overrides: TripRequestInput {
                origin: args.origin,
                destination: args.destination,
                departure_time: args.departure_time,
                duration: args.duration,
                travel_mode: args.travel_mode,
                preferences: PreferencesInput {
                    attraction_keywords: args.attraction_keywords,
                    cuisine: args.cuisine,
                    food_keywords: args.food_keywords,
                    afternoon_keywords: args.afternoon_keywords,
                    min_rating: args.min_rating,
                    price_level: args.price_level,
                    include_shopping: args.include_shopping,
                    include_nightlife: args.include_nightlife,
                    skip_attractions: args.skip_attractions,
                },
            },
            planner_config_path: args.planner_config,
            fares_path: args.fares,
            parallel: args.parallel,
            providers,
        })
    }
}

/// Without a request file every required trip field must come from the
/// flags. Naming the request file is the better hint when none was given.
fn require_flags(args: &PlanArgs) -> Result<(), CliError> {
    let required = [
        (args.origin.is_some(), ARG_ORIGIN, ENV_PLAN_ORIGIN),
        (args.destination.is_some(), ARG_DESTINATION, ENV_PLAN_DESTINATION),
        (
            args.departure_time.is_some(),
            ARG_DEPARTURE_TIME,
            ENV_PLAN_DEPARTURE_TIME,
        ),
        (args.duration.is_some(), ARG_DURATION, ENV_PLAN_DURATION),
    ];
    if required.iter().all(|(present, _, _)| !present) {
        return Err(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_PLAN_REQUEST,
        });
    }
    required
        .into_iter()
        .find(|(present, _, _)| !present)
        .map_or(Ok(()), |(_, field, env)| {
            Err(CliError::MissingArgument { field, env })
        })
}

fn overlay_request(base: TripRequestInput, overrides: TripRequestInput) -> TripRequestInput {
    let prefs = overrides.preferences;
    let fallback = base.preferences;
    TripRequestInput {
        origin: overrides.origin.or(base.origin),
        destination: overrides.destination.or(base.destination),
        departure_time: overrides.departure_time.or(base.departure_time),
        duration: overrides.duration.or(base.duration),
        travel_mode: overrides.travel_mode.or(base.travel_mode),
        preferences: PreferencesInput {
            attraction_keywords: prefs.attraction_keywords.or(fallback.attraction_keywords),
            cuisine: prefs.cuisine.or(fallback.cuisine),
            food_keywords: prefs.food_keywords.or(fallback.food_keywords),
            afternoon_keywords: prefs.afternoon_keywords.or(fallback.afternoon_keywords),
            min_rating: prefs.min_rating.or(fallback.min_rating),
            price_level: prefs.price_level.or(fallback.price_level),
            include_shopping: prefs.include_shopping.or(fallback.include_shopping),
            include_nightlife: prefs.include_nightlife.or(fallback.include_nightlife),
            skip_attractions: prefs.skip_attractions.or(fallback.skip_attractions),
        },
    }
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    factory: &dyn ProviderFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let plan = execute_plan(args, factory)?;
    write_json(writer, &plan)
}

fn execute_plan(args: PlanArgs, factory: &dyn ProviderFactory) -> Result<TripPlan, CliError> {
    let config = args.into_config()?;
    let request = config.trip_request()?;
    let planner_config = config.planner()?;
    let directions = factory.directions(&config.providers)?;
    let places = factory.places(&config.providers)?;
    log::info!(
        "planning {} -> {} ({} days)",
        request.origin,
        request.destination,
        request.duration_days
    );
    let planner = TripPlanner::with_config(directions, places, planner_config);
    Ok(planner.plan(&request)?)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
