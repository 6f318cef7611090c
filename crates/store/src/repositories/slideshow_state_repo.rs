//! Repository for `slideshow_state.json`.

use crate::data_store::DataStore;
use crate::error::StoreError;
use crate::models::SlideshowStateFile;

const FILE: &str = "slideshow_state.json";

pub struct SlideshowStateRepo;

impl SlideshowStateRepo {
    pub async fn load(store: &DataStore) -> Result<bool, StoreError> {
        let file: SlideshowStateFile = store.read_json(FILE).await?;
        Ok(file.active)
    }

    pub async fn save(store: &DataStore, active: bool) -> Result<(), StoreError> {
        store.write_json(FILE, &SlideshowStateFile { active }).await
    }
}
