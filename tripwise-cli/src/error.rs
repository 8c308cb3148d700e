//! Error types emitted by the Tripwise CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use tripwise_core::{ProviderError, RequestValidationError};
use tripwise_data::ProviderBuildError;
use tripwise_planner::PlanError;

/// Errors emitted by the Tripwise CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Long flag name without dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The Google provider was selected without an API key.
    #[error("the google provider needs an API key (set --{field} or {env})")]
    MissingApiKey {
        /// Long flag name without dashes.
        field: &'static str,
        /// Environment variable that can supply the key.
        env: &'static str,
    },
    /// Opening a JSON input file failed.
    #[error("failed to open {what} at {path:?}: {source}")]
    OpenInput {
        /// Kind of document, e.g. "trip request".
        what: &'static str,
        /// Path that failed to open.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A JSON input file could not be decoded.
    #[error("failed to parse {what} JSON at {path:?}: {source}")]
    ParseInput {
        /// Kind of document.
        what: &'static str,
        /// Path of the malformed file.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The trip request failed validation.
    #[error("invalid trip request: {0}")]
    InvalidRequest(#[from] RequestValidationError),
    /// Constructing a provider adapter failed.
    #[error("failed to build {provider} provider: {source}")]
    BuildProvider {
        /// Provider family, `google` or `osm`.
        provider: &'static str,
        /// Construction failure.
        #[source]
        source: ProviderBuildError,
    },
    /// A directions or places lookup failed.
    #[error("provider request failed: {0}")]
    Provider(#[from] ProviderError),
    /// Planning the trip failed.
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
