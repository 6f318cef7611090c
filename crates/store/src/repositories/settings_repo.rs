//! Repository for `slideshow_settings.json`.

use slidekiosk_core::settings::SettingsUpdate;
use slidekiosk_core::SlideshowSettings;

use crate::data_store::DataStore;
use crate::error::StoreError;

const FILE: &str = "slideshow_settings.json";

pub struct SettingsRepo;

impl SettingsRepo {
    /// Persisted settings, or the defaults when none were saved yet.
    pub async fn load(store: &DataStore) -> Result<SlideshowSettings, StoreError> {
        store.read_json(FILE).await
    }

    /// Validate and persist `settings`.
    pub async fn save(store: &DataStore, settings: &SlideshowSettings) -> Result<(), StoreError> {
        settings.validate()?;
        store.write_json(FILE, settings).await
    }

    /// Merge `update` over the stored settings, validate and persist, as one
    /// locked step. Nothing is written when validation fails.
    pub async fn update(
        store: &DataStore,
        update: &SettingsUpdate,
    ) -> Result<SlideshowSettings, StoreError> {
        let mut locked = store.lock_json::<SlideshowSettings>(FILE).await?;
        let merged = locked.value().merged(update);
        merged.validate()?;
        *locked.value_mut() = merged;
        locked.commit().await
    }
}
