//! Filesystem persistence for slidekiosk.
//!
//! - [`ImageStore`] owns the upload directory.
//! - [`DataStore`] owns the directory holding the small JSON side-files;
//!   the repositories in [`repositories`] read and write one file each.

pub mod data_store;
pub mod error;
pub mod image_store;
pub mod models;
pub mod repositories;

pub use data_store::DataStore;
pub use error::StoreError;
pub use image_store::{ImageStore, SavedImage};
