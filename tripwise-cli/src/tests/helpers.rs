//! Test helpers for temporary request files and stub providers.

use std::sync::{Arc, Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use tripwise_core::test_support::{
    StubDirectionsProvider, StubPlacesProvider, rated_place, transit_route,
};
use tripwise_core::{DirectionsProvider, PlaceType, PlacesProvider};

use crate::CliError;
use crate::providers::{ProviderFactory, ProviderSettings};

/// A temporary directory addressed through UTF-8 paths.
pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test file");
}

/// A two-day Seoul to Busan request in the client payload format.
pub(super) const SEOUL_BUSAN_REQUEST: &str = r#"{
  "origin": "Seoul",
  "destination": "Busan",
  "departureTime": "2026-05-01T08:00:00+09:00",
  "duration": 2,
  "preferences": { "cuisine": "korean" }
}"#;

/// Factory handing out in-memory providers and recording the settings it
/// was asked to build with.
pub(super) struct StubProviderFactory {
    pub(super) directions: Arc<StubDirectionsProvider>,
    pub(super) places: Arc<StubPlacesProvider>,
    settings: Mutex<Vec<ProviderSettings>>,
}

impl StubProviderFactory {
    /// Rail and bus routes between Seoul and Busan, plus rated places.
    pub(super) fn seoul_busan() -> Self {
        let outbound = vec![
            transit_route("INTERCITY_BUS", 390_000, 270),
            transit_route("HIGH_SPEED_TRAIN", 400_000, 150),
        ];
        let inbound = vec![transit_route("HIGH_SPEED_TRAIN", 400_000, 155)];
        let directions = StubDirectionsProvider::default()
            .with_routes("Seoul", "Busan", outbound)
            .with_routes("Busan", "Seoul", inbound);
        let places = StubPlacesProvider::default()
            .with_places(
                PlaceType::TouristAttraction,
                vec![
                    rated_place("Gamcheon Culture Village", PlaceType::TouristAttraction, 4.5),
                    rated_place("Haeundae Beach", PlaceType::TouristAttraction, 4.7),
                    rated_place("Closed Museum", PlaceType::TouristAttraction, 2.9),
                ],
            )
            .with_places(
                PlaceType::Restaurant,
                vec![rated_place("Jagalchi Market", PlaceType::Restaurant, 4.4)],
            );
        Self {
            directions: Arc::new(directions),
            places: Arc::new(places),
            settings: Mutex::new(Vec::new()),
        }
    }

    /// Settings passed to the factory, in call order.
    pub(super) fn settings(&self) -> Vec<ProviderSettings> {
        self.settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, settings: &ProviderSettings) {
        self.settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(settings.clone());
    }
}

impl ProviderFactory for StubProviderFactory {
    fn directions(
        &self,
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn DirectionsProvider>, CliError> {
        self.record(settings);
        let provider: Arc<dyn DirectionsProvider> = Arc::<StubDirectionsProvider>::clone(&self.directions);
        Ok(provider)
    }

    fn places(&self, settings: &ProviderSettings) -> Result<Arc<dyn PlacesProvider>, CliError> {
        self.record(settings);
        let provider: Arc<dyn PlacesProvider> = Arc::<StubPlacesProvider>::clone(&self.places);
        Ok(provider)
    }
}
