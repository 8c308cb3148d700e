//! Provider selection shared by every command.

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tripwise_core::{DirectionsProvider, PlacesProvider};
use tripwise_data::{
    GoogleConfig, GoogleDirectionsProvider, GooglePlacesProvider, OsmConfig,
    OsrmDirectionsProvider, OverpassPlacesProvider, ProviderBuildError,
};

use crate::CliError;

/// Which map services back the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Directions and Places; needs an API key.
    #[default]
    Google,
    /// OSRM, Nominatim and Overpass; keyless, driving only.
    Osm,
}

impl ProviderKind {
    const fn name(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Osm => "osm",
        }
    }
}

/// Provider settings resolved from the command's layered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProviderSettings {
    pub(crate) kind: ProviderKind,
    pub(crate) api_key: Option<String>,
    pub(crate) timeout: Option<Duration>,
    /// Google root or OSRM root, depending on `kind`.
    pub(crate) base_url: Option<String>,
    /// Environment variable that supplies the API key, for error messages.
    pub(crate) api_key_env: &'static str,
}

impl ProviderSettings {
    /// Settings from a command's merged provider fields.
    ///
    /// A zero timeout counts as unset.
    pub(crate) fn resolve(
        kind: Option<ProviderKind>,
        api_key: Option<String>,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
        api_key_env: &'static str,
    ) -> Self {
        Self {
            kind: kind.unwrap_or_default(),
            api_key,
            timeout: timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs),
            base_url,
            api_key_env,
        }
    }
}

/// Builds the providers a command talks to.
pub(crate) trait ProviderFactory {
    fn directions(
        &self,
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn DirectionsProvider>, CliError>;

    fn places(&self, settings: &ProviderSettings) -> Result<Arc<dyn PlacesProvider>, CliError>;
}

/// Factory for the real HTTP adapters.
pub(crate) struct HttpProviderFactory;

impl HttpProviderFactory {
    fn google(settings: &ProviderSettings) -> Result<GoogleConfig, CliError> {
        let key = settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingApiKey {
                field: crate::ARG_API_KEY,
                env: settings.api_key_env,
            })?;
        let mut config = GoogleConfig::new(key);
        if let Some(url) = &settings.base_url {
            config = config.with_base_url(url.as_str());
        }
        if let Some(timeout) = settings.timeout {
            config = config.with_timeout(timeout);
        }
        Ok(config)
    }

    fn osm(settings: &ProviderSettings) -> OsmConfig {
        let mut config = OsmConfig::default();
        if let Some(url) = &settings.base_url {
            config = config.with_osrm_url(url.as_str());
        }
        if let Some(timeout) = settings.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}

fn build_failed(kind: ProviderKind) -> impl FnOnce(ProviderBuildError) -> CliError {
    move |source| CliError::BuildProvider {
        provider: kind.name(),
        source,
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn directions(
        &self,
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn DirectionsProvider>, CliError> {
        let kind = settings.kind;
        let provider: Arc<dyn DirectionsProvider> = match kind {
            ProviderKind::Google => Arc::new(
                GoogleDirectionsProvider::with_config(Self::google(settings)?)
                    .map_err(build_failed(kind))?,
            ),
            ProviderKind::Osm => Arc::new(
                OsrmDirectionsProvider::new(&Self::osm(settings)).map_err(build_failed(kind))?,
            ),
        };
        log::debug!("using {} directions", kind.name());
        Ok(provider)
    }

    fn places(&self, settings: &ProviderSettings) -> Result<Arc<dyn PlacesProvider>, CliError> {
        let kind = settings.kind;
        let provider: Arc<dyn PlacesProvider> = match kind {
            ProviderKind::Google => Arc::new(
                GooglePlacesProvider::with_config(Self::google(settings)?)
                    .map_err(build_failed(kind))?,
            ),
            ProviderKind::Osm => Arc::new(
                OverpassPlacesProvider::new(&Self::osm(settings)).map_err(build_failed(kind))?,
            ),
        };
        log::debug!("using {} places", kind.name());
        Ok(provider)
    }
}
