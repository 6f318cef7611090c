//! Slideshow settings and device name.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use slidekiosk_core::settings::SettingsUpdate;
use slidekiosk_core::SlideshowSettings;
use slidekiosk_events::ServerEventKind;
use slidekiosk_store::repositories::{DeviceNameRepo, SettingsRepo};

use crate::error::AppResult;
use crate::response::DeviceNameResponse;
use crate::sse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetDeviceNameRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DeviceName {
    pub name: String,
}

/// GET /slideshow_settings
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<SlideshowSettings>> {
    Ok(Json(SettingsRepo::load(&state.data).await?))
}

/// POST /slideshow_settings
///
/// Merge the given fields over the current settings, validate and persist.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> AppResult<Json<SlideshowSettings>> {
    let settings = SettingsRepo::update(&state.data, &update).await?;

    tracing::info!(
        delay = settings.delay,
        transition = %settings.transition,
        transition_duration = settings.transition_duration,
        "Slideshow settings updated"
    );
    sse::publish(&state, &[ServerEventKind::SlideshowSettings]).await;

    Ok(Json(settings))
}

/// GET /get_device_name
pub async fn get_device_name(State(state): State<AppState>) -> AppResult<Json<DeviceName>> {
    let name = DeviceNameRepo::load(&state.data).await?;
    Ok(Json(DeviceName { name }))
}

/// POST /set_device_name
pub async fn set_device_name(
    State(state): State<AppState>,
    Json(input): Json<SetDeviceNameRequest>,
) -> AppResult<Json<DeviceNameResponse>> {
    let name = DeviceNameRepo::save(&state.data, &input.name).await?;

    tracing::info!(name = %name, "Device renamed");
    sse::publish(&state, &[ServerEventKind::DeviceName]).await;

    Ok(Json(DeviceNameResponse {
        status: "success",
        name,
    }))
}
