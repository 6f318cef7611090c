use std::sync::Arc;

use slidekiosk_events::EventBus;
use slidekiosk_store::{DataStore, ImageStore};

use crate::config::ServerConfig;
use crate::supervisor::RendererSupervisor;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Uploaded image files.
    pub images: ImageStore,
    /// JSON side-files (order, selection, settings, device name, state).
    pub data: DataStore,
    /// Fan-out to connected SSE clients.
    pub event_bus: Arc<EventBus>,
    /// The single renderer child process.
    pub supervisor: Arc<RendererSupervisor>,
}

impl AppState {
    /// Build state from configuration. Does not touch the filesystem.
    pub fn new(config: ServerConfig) -> Self {
        let supervisor = RendererSupervisor::new(
            config.renderer_bin.clone(),
            std::time::Duration::from_secs(config.renderer_stop_timeout_secs),
        );
        Self {
            images: ImageStore::new(config.upload_dir.clone()),
            data: DataStore::new(config.data_dir.clone()),
            event_bus: Arc::new(EventBus::default()),
            supervisor: Arc::new(supervisor),
            config: Arc::new(config),
        }
    }
}
