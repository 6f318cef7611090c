//! On-disk shapes of the JSON side-files.

use serde::{Deserialize, Serialize};

/// `image_order.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFile {
    #[serde(default)]
    pub order: Vec<String>,
}

/// `device_name.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceNameFile {
    #[serde(default)]
    pub name: String,
}

/// `selected_images.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedFile {
    #[serde(default)]
    pub selected: Vec<String>,
}

/// `slideshow_state.json`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideshowStateFile {
    #[serde(default)]
    pub active: bool,
}

/// A stored image as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub name: String,
    /// Creation time formatted with [`slidekiosk_core::types::UPLOAD_TIME_FORMAT`].
    pub upload_time: String,
}
