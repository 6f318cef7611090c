//! JSON side-file directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::StoreError;

/// Handle to the directory holding the JSON side-files.
///
/// Cheaply cloneable. All writes go through one lock and land atomically
/// (temp file + rename), so readers never observe a half-written file.
/// Read-modify-write cycles hold the same lock from the read to the write
/// (see [`DataStore::lock_json`]), so concurrent updates never drop each
/// other's changes.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

/// A side-file loaded under the store lock.
///
/// The lock is released on [`commit`](Self::commit) or when the value is
/// dropped without committing.
pub struct LockedJson<'a, T> {
    store: &'a DataStore,
    file: &'static str,
    value: T,
    _guard: MutexGuard<'a, ()>,
}

impl<T> LockedJson<'_, T>
where
    T: Serialize,
{
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Give the value back without writing anything.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Persist the value, release the lock and return the value.
    pub async fn commit(self) -> Result<T, StoreError> {
        self.store.replace_file(self.file, &self.value).await?;
        Ok(self.value)
    }
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::io(&self.root, e))
    }

    /// Read `file` as JSON.
    ///
    /// A missing file yields `T::default()`. A file that exists but does not
    /// parse is logged and also yields the default, so one corrupt side-file
    /// never takes the server down.
    pub async fn read_json<T>(&self, file: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.root.join(file);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt side-file, using defaults");
                Ok(T::default())
            }
        }
    }

    /// Serialize `value` and atomically replace `file`.
    pub async fn write_json<T>(&self, file: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let _guard = self.write_lock.lock().await;
        self.replace_file(file, value).await
    }

    /// Take the store lock and read `file` (see [`read_json`](Self::read_json)).
    ///
    /// Every other write waits until the returned handle is committed or
    /// dropped.
    pub async fn lock_json<T>(&self, file: &'static str) -> Result<LockedJson<'_, T>, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let guard = self.write_lock.lock().await;
        let value = self.read_json(file).await?;
        Ok(LockedJson {
            store: self,
            file,
            value,
            _guard: guard,
        })
    }

    /// Read, modify and write `file` as one step.
    ///
    /// `modify` returns whether it changed the value; the file is only
    /// rewritten when it did. Returns the resulting value.
    pub async fn update_json<T, F>(&self, file: &'static str, modify: F) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> bool,
    {
        let mut locked = self.lock_json::<T>(file).await?;
        if modify(locked.value_mut()) {
            locked.commit().await
        } else {
            Ok(locked.into_inner())
        }
    }

    /// Atomic replace. Callers hold `write_lock`.
    async fn replace_file<T>(&self, file: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let path = self.root.join(file);
        let body = serde_json::to_vec(value).map_err(|e| StoreError::json(&path, e))?;
        let tmp = self
            .root
            .join(format!(".{file}.{}.tmp", uuid::Uuid::new_v4()));

        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::io(path, e));
        }
        Ok(())
    }
}
