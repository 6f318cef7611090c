//! Repository for `device_name.json`.

use slidekiosk_core::error::CoreError;

use crate::data_store::DataStore;
use crate::error::StoreError;
use crate::models::DeviceNameFile;

const FILE: &str = "device_name.json";

pub struct DeviceNameRepo;

impl DeviceNameRepo {
    /// The saved name, or an empty string.
    pub async fn load(store: &DataStore) -> Result<String, StoreError> {
        let file: DeviceNameFile = store.read_json(FILE).await?;
        Ok(file.name)
    }

    /// Trim and persist `name`, returning the stored value.
    pub async fn save(store: &DataStore, name: &str) -> Result<String, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("Name cannot be empty".to_string()).into());
        }
        store
            .write_json(
                FILE,
                &DeviceNameFile {
                    name: name.to_string(),
                },
            )
            .await?;
        Ok(name.to_string())
    }
}
