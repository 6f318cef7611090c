//! Repository for `image_order.json`.

use slidekiosk_core::ordering;

use crate::data_store::DataStore;
use crate::error::StoreError;
use crate::image_store::ImageStore;
use crate::models::OrderFile;

const FILE: &str = "image_order.json";

/// Reads and writes the persisted image order.
///
/// Every mutation runs under the [`DataStore`] lock from read to write.
pub struct OrderRepo;

impl OrderRepo {
    /// Raw persisted order, stale entries included.
    pub async fn load(store: &DataStore) -> Result<Vec<String>, StoreError> {
        let file: OrderFile = store.read_json(FILE).await?;
        Ok(file.order)
    }

    pub async fn save(store: &DataStore, order: &[String]) -> Result<(), StoreError> {
        store
            .write_json(
                FILE,
                &OrderFile {
                    order: order.to_vec(),
                },
            )
            .await
    }

    /// Append `name` to the end of the order unless already present.
    pub async fn append(store: &DataStore, name: &str) -> Result<(), StoreError> {
        store
            .update_json(FILE, |file: &mut OrderFile| {
                ordering::append_unique(&mut file.order, name)
            })
            .await?;
        Ok(())
    }

    /// Drop `names` from the order. Saves only when something changed.
    pub async fn remove(store: &DataStore, names: &[String]) -> Result<(), StoreError> {
        store
            .update_json(FILE, |file: &mut OrderFile| {
                let mut changed = false;
                for name in names {
                    changed |= ordering::remove_all(&mut file.order, name);
                }
                changed
            })
            .await?;
        Ok(())
    }

    /// Order with names missing from `images` dropped. Persists the pruned
    /// list when it changed.
    ///
    /// The directory is listed while the lock is held, so a file stored and
    /// appended concurrently is never pruned by mistake.
    pub async fn prune_missing(
        store: &DataStore,
        images: &ImageStore,
    ) -> Result<Vec<String>, StoreError> {
        let mut locked = store.lock_json::<OrderFile>(FILE).await?;
        let on_disk = images.list_names().await?;
        let pruned = ordering::prune_missing(&locked.value().order, &on_disk);
        if pruned == locked.value().order {
            return Ok(pruned);
        }
        tracing::debug!(
            dropped = locked.value().order.len() - pruned.len(),
            "Pruning stale order entries"
        );
        locked.value_mut().order = pruned;
        Ok(locked.commit().await?.order)
    }

    /// Replace the order with `requested`, keeping only names present in
    /// `images`, each once. Returns the saved order.
    pub async fn replace(
        store: &DataStore,
        images: &ImageStore,
        requested: &[String],
    ) -> Result<Vec<String>, StoreError> {
        let mut locked = store.lock_json::<OrderFile>(FILE).await?;
        let on_disk = images.list_names().await?;
        locked.value_mut().order = ordering::prune_missing(requested, &on_disk);
        Ok(locked.commit().await?.order)
    }
}
