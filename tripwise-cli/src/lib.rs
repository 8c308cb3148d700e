//! Command-line interface for the Tripwise engine.
//!
//! `tripwise plan` builds the three round-trip itineraries for a request,
//! while `tripwise directions` and `tripwise places` query a single provider.
//! Every command layers its arguments through `ortho_config`, so values can
//! come from flags, `TRIPWISE_CMDS_<COMMAND>_<FIELD>` environment variables
//! or configuration files. Output is pretty-printed JSON on stdout.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod files;
mod lookup;
mod plan;
mod providers;

pub use error::CliError;
pub use providers::ProviderKind;

use lookup::{DirectionsArgs, PlacesArgs};
use plan::PlanArgs;
use providers::HttpProviderFactory;

const ARG_REQUEST: &str = "request";
const ARG_ORIGIN: &str = "origin";
const ARG_DESTINATION: &str = "destination";
const ARG_DEPARTURE_TIME: &str = "departure-time";
const ARG_DURATION: &str = "duration";
const ARG_TRAVEL_MODE: &str = "travel-mode";
const ARG_ATTRACTION_KEYWORDS: &str = "attraction-keywords";
const ARG_CUISINE: &str = "cuisine";
const ARG_FOOD_KEYWORDS: &str = "food-keywords";
const ARG_AFTERNOON_KEYWORDS: &str = "afternoon-keywords";
const ARG_MIN_RATING: &str = "min-rating";
const ARG_PRICE_LEVEL: &str = "price-level";
const ARG_INCLUDE_SHOPPING: &str = "include-shopping";
const ARG_INCLUDE_NIGHTLIFE: &str = "include-nightlife";
const ARG_SKIP_ATTRACTIONS: &str = "skip-attractions";
const ARG_PLANNER_CONFIG: &str = "planner-config";
const ARG_FARES: &str = "fares";
const ARG_PARALLEL: &str = "parallel";
const ARG_LOCATION: &str = "location";
const ARG_RADIUS: &str = "radius";
const ARG_PLACE_TYPE: &str = "type";
const ARG_KEYWORD: &str = "keyword";
const ARG_PROVIDER: &str = "provider";
const ARG_API_KEY: &str = "api-key";
const ARG_BASE_URL: &str = "base-url";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";

const ENV_PLAN_REQUEST: &str = "TRIPWISE_CMDS_PLAN_REQUEST_PATH";
const ENV_PLAN_ORIGIN: &str = "TRIPWISE_CMDS_PLAN_ORIGIN";
const ENV_PLAN_DESTINATION: &str = "TRIPWISE_CMDS_PLAN_DESTINATION";
const ENV_PLAN_DEPARTURE_TIME: &str = "TRIPWISE_CMDS_PLAN_DEPARTURE_TIME";
const ENV_PLAN_DURATION: &str = "TRIPWISE_CMDS_PLAN_DURATION";
const ENV_PLAN_API_KEY: &str = "TRIPWISE_CMDS_PLAN_API_KEY";
const ENV_DIRECTIONS_ORIGIN: &str = "TRIPWISE_CMDS_DIRECTIONS_ORIGIN";
const ENV_DIRECTIONS_DESTINATION: &str = "TRIPWISE_CMDS_DIRECTIONS_DESTINATION";
const ENV_DIRECTIONS_API_KEY: &str = "TRIPWISE_CMDS_DIRECTIONS_API_KEY";
const ENV_PLACES_LOCATION: &str = "TRIPWISE_CMDS_PLACES_LOCATION";
const ENV_PLACES_API_KEY: &str = "TRIPWISE_CMDS_PLACES_API_KEY";

/// Run the Tripwise CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments fail to parse or merge, when the
/// request is invalid, or when a provider or the planner fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    let factory = HttpProviderFactory;
    match cli.command {
        Command::Plan(args) => plan::run_plan_with(args, &factory, &mut stdout),
        Command::Directions(args) => lookup::run_directions_with(args, &factory, &mut stdout),
        Command::Places(args) => lookup::run_places_with(args, &factory, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tripwise",
    about = "Plan multi-day trips from live directions and place data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan one round trip per routing strategy.
    Plan(PlanArgs),
    /// Fetch candidate routes between two places.
    Directions(DirectionsArgs),
    /// Search for rated places near a location.
    Places(PlacesArgs),
}

#[cfg(test)]
mod tests;
