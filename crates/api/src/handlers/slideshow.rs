//! Handlers that start, stop and report the slideshow renderer.

use std::path::PathBuf;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use slidekiosk_core::naming::validate_stored_name;
use slidekiosk_core::settings::SettingsUpdate;
use slidekiosk_events::ServerEventKind;
use slidekiosk_store::repositories::{SettingsRepo, SlideshowStateRepo};

use crate::error::{AppError, AppResult};
use crate::sse;
use crate::state::AppState;

/// Body of `POST /slideshow`. Omitted settings keep their current values.
#[derive(Debug, Deserialize)]
pub struct StartSlideshowRequest {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub settings: SettingsUpdate,
}

#[derive(Debug, Serialize)]
pub struct SlideshowStateResponse {
    pub active: bool,
}

/// Absolute paths of the requested images that exist, in request order.
async fn resolve_images(state: &AppState, names: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(names.len());
    for name in names {
        if let Err(e) = validate_stored_name(name) {
            tracing::warn!(filename = %name, error = %e, "Skipping invalid image name");
            continue;
        }
        if !state.images.exists(name).await {
            tracing::warn!(filename = %name, "Skipping missing image");
            continue;
        }
        match tokio::fs::canonicalize(state.images.dir().join(name)).await {
            Ok(path) => paths.push(path),
            Err(e) => tracing::warn!(filename = %name, error = %e, "Skipping unresolvable image"),
        }
    }
    paths
}

/// POST /slideshow
///
/// Stop any running renderer, persist the merged settings, and launch a new
/// renderer for the requested images. With no usable images the slideshow
/// simply ends up stopped.
pub async fn start_slideshow(
    State(state): State<AppState>,
    Json(input): Json<StartSlideshowRequest>,
) -> AppResult<StatusCode> {
    // Reject bad settings before touching the running renderer.
    SettingsRepo::load(&state.data)
        .await?
        .merged(&input.settings)
        .validate()?;

    state.supervisor.stop().await;
    let settings = SettingsRepo::update(&state.data, &input.settings).await?;

    let paths = resolve_images(&state, &input.images).await;
    let active = if paths.is_empty() {
        tracing::info!(requested = input.images.len(), "No usable images, slideshow not started");
        false
    } else {
        if let Err(e) = state.supervisor.start(&paths, &settings).await {
            SlideshowStateRepo::save(&state.data, false).await?;
            sse::publish(
                &state,
                &[
                    ServerEventKind::SlideshowSettings,
                    ServerEventKind::SlideshowState,
                ],
            )
            .await;
            return Err(AppError::InternalError(e.to_string()));
        }
        true
    };

    SlideshowStateRepo::save(&state.data, active).await?;
    sse::publish(
        &state,
        &[
            ServerEventKind::SlideshowSettings,
            ServerEventKind::SlideshowState,
        ],
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /stop_slideshow
pub async fn stop_slideshow(State(state): State<AppState>) -> AppResult<StatusCode> {
    let was_running = state.supervisor.stop().await;
    SlideshowStateRepo::save(&state.data, false).await?;

    tracing::info!(was_running, "Slideshow stopped");
    sse::publish(&state, &[ServerEventKind::SlideshowState]).await;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /slideshow_state
///
/// The persisted flag after reconciling it with the renderer's liveness.
pub async fn get_slideshow_state(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let (active, changed) = sse::snapshot::reconciled_active(&state).await?;
    if changed {
        sse::publish(&state, &[ServerEventKind::SlideshowState]).await;
    }
    Ok(Json(SlideshowStateResponse { active }))
}
