//! Current-state payloads for every [`ServerEventKind`].
//!
//! The same builders back the GET endpoints, the connect-time snapshot and
//! the events published after a mutation, so all three always agree.

use serde_json::json;
use slidekiosk_events::{ServerEvent, ServerEventKind};
use slidekiosk_store::repositories::{
    DeviceNameRepo, OrderRepo, SelectedRepo, SettingsRepo, SlideshowStateRepo,
};

use crate::error::AppResult;
use crate::state::AppState;

/// Order list with entries for missing files dropped. Persists the pruned
/// list when it changed.
pub async fn pruned_order(state: &AppState) -> AppResult<Vec<String>> {
    Ok(OrderRepo::prune_missing(&state.data, &state.images).await?)
}

/// Selected set with entries for missing files dropped. Persists the pruned
/// set when it changed.
pub async fn pruned_selected(state: &AppState) -> AppResult<Vec<String>> {
    Ok(SelectedRepo::prune_missing(&state.data, &state.images).await?)
}

/// Persisted active flag brought in line with the renderer's liveness.
///
/// Returns `(active, changed)`.
pub async fn reconciled_active(state: &AppState) -> AppResult<(bool, bool)> {
    let running = state.supervisor.is_running().await;
    let stored = SlideshowStateRepo::load(&state.data).await?;
    if stored == running {
        return Ok((running, false));
    }
    tracing::info!(stored, running, "Reconciling slideshow state");
    SlideshowStateRepo::save(&state.data, running).await?;
    Ok((running, true))
}

/// JSON payload describing the current value of `kind`.
pub async fn payload(state: &AppState, kind: ServerEventKind) -> AppResult<serde_json::Value> {
    let value = match kind {
        ServerEventKind::ImageList => {
            let order = pruned_order(state).await?;
            let entries = state.images.list_entries(&order).await?;
            json!(entries)
        }
        ServerEventKind::ImageOrder => json!({ "order": pruned_order(state).await? }),
        ServerEventKind::SlideshowState => {
            let (active, _) = reconciled_active(state).await?;
            json!({ "active": active })
        }
        ServerEventKind::SlideshowSettings => json!(SettingsRepo::load(&state.data).await?),
        ServerEventKind::DeviceName => json!({ "name": DeviceNameRepo::load(&state.data).await? }),
        ServerEventKind::SelectedImages => {
            json!({ "selected": pruned_selected(state).await? })
        }
    };
    Ok(value)
}

/// One event per kind, in [`ServerEventKind::ALL`] order. Kinds whose state
/// cannot be read are logged and left out.
pub async fn snapshot(state: &AppState) -> Vec<ServerEvent> {
    let mut events = Vec::with_capacity(ServerEventKind::ALL.len());
    for kind in ServerEventKind::ALL {
        match payload(state, kind).await {
            Ok(value) => events.push(ServerEvent::new(kind, value)),
            Err(e) => tracing::error!(kind = %kind, error = %e, "Failed to build snapshot event"),
        }
    }
    events
}

/// Publish the current value of each kind to every subscriber.
pub async fn publish(state: &AppState, kinds: &[ServerEventKind]) {
    for &kind in kinds {
        match payload(state, kind).await {
            Ok(value) => {
                let delivered = state.event_bus.publish(ServerEvent::new(kind, value));
                tracing::debug!(kind = %kind, delivered, "Event published");
            }
            Err(e) => tracing::error!(kind = %kind, error = %e, "Failed to build event"),
        }
    }
}
