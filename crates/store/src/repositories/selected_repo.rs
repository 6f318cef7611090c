//! Repository for `selected_images.json`.

use slidekiosk_core::ordering;

use crate::data_store::DataStore;
use crate::error::StoreError;
use crate::image_store::ImageStore;
use crate::models::SelectedFile;

const FILE: &str = "selected_images.json";

/// Reads and writes the set of images chosen for the next run.
pub struct SelectedRepo;

impl SelectedRepo {
    pub async fn load(store: &DataStore) -> Result<Vec<String>, StoreError> {
        let file: SelectedFile = store.read_json(FILE).await?;
        Ok(file.selected)
    }

    pub async fn save(store: &DataStore, selected: &[String]) -> Result<(), StoreError> {
        store
            .write_json(
                FILE,
                &SelectedFile {
                    selected: selected.to_vec(),
                },
            )
            .await
    }

    /// Drop `names` from the selection. Saves only when something changed.
    pub async fn remove(store: &DataStore, names: &[String]) -> Result<(), StoreError> {
        store
            .update_json(FILE, |file: &mut SelectedFile| {
                let mut changed = false;
                for name in names {
                    changed |= ordering::remove_all(&mut file.selected, name);
                }
                changed
            })
            .await?;
        Ok(())
    }

    /// Selection with names missing from `images` dropped, persisted when
    /// it changed.
    pub async fn prune_missing(
        store: &DataStore,
        images: &ImageStore,
    ) -> Result<Vec<String>, StoreError> {
        let mut locked = store.lock_json::<SelectedFile>(FILE).await?;
        let on_disk = images.list_names().await?;
        let pruned = ordering::prune_missing(&locked.value().selected, &on_disk);
        if pruned == locked.value().selected {
            return Ok(pruned);
        }
        locked.value_mut().selected = pruned;
        Ok(locked.commit().await?.selected)
    }

    /// Replace the selection with the names in `requested` that exist.
    pub async fn replace(
        store: &DataStore,
        images: &ImageStore,
        requested: &[String],
    ) -> Result<Vec<String>, StoreError> {
        let mut locked = store.lock_json::<SelectedFile>(FILE).await?;
        let on_disk = images.list_names().await?;
        locked.value_mut().selected = ordering::prune_missing(requested, &on_disk);
        Ok(locked.commit().await?.selected)
    }
}
