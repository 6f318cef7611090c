//! The upload directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use serde::Serialize;
use slidekiosk_core::error::CoreError;
use slidekiosk_core::naming::{
    collision_candidate, is_supported_image, sanitize_filename, validate_stored_name,
};
use slidekiosk_core::ordering;
use slidekiosk_core::types::UPLOAD_TIME_FORMAT;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::ImageEntry;

/// Upper bound on collision suffixes tried before giving up.
const MAX_COLLISION_ATTEMPTS: u32 = 10_000;

/// Result of storing an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    /// Name the file was stored under.
    pub filename: String,
    pub upload_time: String,
    /// Whether a collision suffix had to be added.
    pub renamed: bool,
}

/// Filesystem directory of uploaded images.
///
/// Cheaply cloneable. Uploads claim their file name under one lock, so the
/// image-count limit holds with concurrent uploads.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    upload_lock: Arc<Mutex<()>>,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            upload_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))
    }

    /// Absolute-or-relative path of a stored image, after validating the name.
    pub fn path_of(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_stored_name(name)?;
        Ok(self.dir.join(name))
    }

    pub async fn exists(&self, name: &str) -> bool {
        match self.path_of(name) {
            Ok(path) => tokio::fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Names of every regular, non-hidden file in the directory, sorted.
    pub async fn list_names(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if is_file {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Listing entry for one stored image.
    pub async fn entry(&self, name: &str) -> Result<ImageEntry, StoreError> {
        let path = self.path_of(name)?;
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        let stamp = meta
            .created()
            .or_else(|_| meta.modified())
            .unwrap_or_else(|_| SystemTime::now());
        Ok(ImageEntry {
            name: name.to_string(),
            upload_time: format_upload_time(stamp),
        })
    }

    /// Every stored image in display order (see [`ordering::display_order`]).
    pub async fn list_entries(&self, order: &[String]) -> Result<Vec<ImageEntry>, StoreError> {
        let on_disk = self.list_names().await?;
        let mut entries = Vec::with_capacity(on_disk.len());
        for name in ordering::display_order(order, &on_disk) {
            match self.entry(&name).await {
                Ok(entry) => entries.push(entry),
                // Deleted between listing and stat; just skip it.
                Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(entries)
    }

    /// Store an uploaded file without overwriting anything.
    ///
    /// The client name is sanitised; on collision `name(1).ext`,
    /// `name(2).ext`, ... are tried in turn. When `max_images` is set and
    /// the directory already holds that many images the upload is refused.
    pub async fn save_upload(
        &self,
        original_name: &str,
        data: &[u8],
        max_images: Option<usize>,
    ) -> Result<SavedImage, StoreError> {
        if !is_supported_image(original_name) {
            return Err(CoreError::Validation("Invalid file type".to_string()).into());
        }
        let base = sanitize_filename(original_name);
        if base.is_empty() || !is_supported_image(&base) {
            return Err(CoreError::Validation(format!(
                "Unusable filename '{original_name}'"
            ))
            .into());
        }

        // Held from the count until the new file exists on disk.
        let claim = self.upload_lock.lock().await;

        if let Some(max) = max_images {
            let count = self.list_names().await?.len();
            if count >= max {
                return Err(CoreError::Validation(format!(
                    "Maximum of {max} images reached"
                ))
                .into());
            }
        }

        let mut candidate = base.clone();
        let mut counter = 1;
        let (path, mut file) = loop {
            let path = self.dir.join(&candidate);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if counter > MAX_COLLISION_ATTEMPTS {
                        return Err(CoreError::Conflict(format!(
                            "Too many files named like '{base}'"
                        ))
                        .into());
                    }
                    candidate = collision_candidate(&base, counter);
                    counter += 1;
                }
                Err(e) => return Err(StoreError::io(path, e)),
            }
        };
        drop(claim);

        let written = async {
            file.write_all(data).await?;
            file.flush().await
        }
        .await;
        if let Err(e) = written {
            drop(file);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(StoreError::io(path, e));
        }

        let entry = self.entry(&candidate).await?;
        tracing::info!(filename = %candidate, bytes = data.len(), "Image stored");

        Ok(SavedImage {
            renamed: candidate != base,
            filename: candidate,
            upload_time: entry.upload_time,
        })
    }

    /// Remove a stored image. Returns `false` when it did not exist.
    pub async fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.path_of(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(filename = %name, "Image deleted");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

fn format_upload_time(stamp: SystemTime) -> String {
    let local: chrono::DateTime<chrono::Local> = stamp.into();
    local.format(UPLOAD_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_time_has_expected_shape() {
        let s = format_upload_time(SystemTime::now());
        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(s.len(), 19);
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[10..11], " ");
    }
}
