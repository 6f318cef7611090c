//! Handlers for the image library: listing, upload, deletion, ordering,
//! selection and thumbnails.

use std::io::Cursor;

use axum::extract::{Multipart, Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use slidekiosk_core::error::CoreError;
use slidekiosk_core::naming::validate_stored_name;
use slidekiosk_events::ServerEventKind;
use slidekiosk_store::repositories::{OrderRepo, SelectedRepo};
use slidekiosk_store::SavedImage;

use crate::error::{AppError, AppResult};
use crate::response::StatusResponse;
use crate::sse;
use crate::state::AppState;

/// Longest edge of a generated thumbnail, in pixels.
pub const THUMBNAIL_MAX_EDGE: u32 = 320;

/// Multipart field carrying the uploaded file.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(flatten)]
    pub image: SavedImage,
}

#[derive(Debug, Deserialize)]
pub struct DeleteImagesRequest {
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub order: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSelectedRequest {
    #[serde(default)]
    pub selected: Vec<String>,
}

/// GET /images
///
/// Stored images in display order: ordered names first, then the rest.
pub async fn list_images(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let images = sse::snapshot::payload(&state, ServerEventKind::ImageList).await?;
    Ok(Json(images))
}

/// POST /upload
///
/// Store the multipart `file` field under a sanitised, collision-free name
/// and append it to the order list.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((filename, data.to_vec()));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err(AppError::BadRequest("No file part".to_string()));
    };
    if filename.trim().is_empty() {
        return Err(AppError::BadRequest("No selected file".to_string()));
    }
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    let saved = state
        .images
        .save_upload(&filename, &data, Some(state.config.max_images))
        .await?;
    OrderRepo::append(&state.data, &saved.filename).await?;

    tracing::info!(
        original = %filename,
        filename = %saved.filename,
        renamed = saved.renamed,
        "Image uploaded"
    );
    sse::publish(
        &state,
        &[ServerEventKind::ImageList, ServerEventKind::ImageOrder],
    )
    .await;

    Ok(Json(UploadResponse {
        success: true,
        image: saved,
    }))
}

/// POST /delete/{filename}
///
/// Remove one image and its order/selection entries. Deleting a file that
/// is already gone succeeds.
pub async fn delete_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    let removed = state.images.delete(&filename).await?;
    let names = [filename];
    OrderRepo::remove(&state.data, &names).await?;
    SelectedRepo::remove(&state.data, &names).await?;

    if !removed {
        tracing::debug!(filename = %names[0], "Delete of absent image ignored");
    }
    sse::publish(
        &state,
        &[
            ServerEventKind::ImageList,
            ServerEventKind::ImageOrder,
            ServerEventKind::SelectedImages,
        ],
    )
    .await;

    Ok(Json(StatusResponse::success()))
}

/// POST /delete_images
///
/// Delete several images in request order. Stops at the first file that
/// cannot be removed; deletions before it stay applied and are reflected
/// in the saved order and selection.
pub async fn delete_images(
    State(state): State<AppState>,
    Json(input): Json<DeleteImagesRequest>,
) -> AppResult<Json<StatusResponse>> {
    if input.images.is_empty() {
        return Err(AppError::BadRequest("No images specified".to_string()));
    }
    for name in &input.images {
        validate_stored_name(name)?;
    }

    let mut deleted = Vec::with_capacity(input.images.len());
    let mut failure = None;
    for name in &input.images {
        match state.images.delete(name).await {
            Ok(_) => deleted.push(name.clone()),
            Err(e) => {
                tracing::error!(filename = %name, error = %e, "Batch delete failed");
                failure = Some(name.clone());
                break;
            }
        }
    }

    OrderRepo::remove(&state.data, &deleted).await?;
    SelectedRepo::remove(&state.data, &deleted).await?;
    tracing::info!(count = deleted.len(), "Images deleted");
    sse::publish(
        &state,
        &[
            ServerEventKind::ImageList,
            ServerEventKind::ImageOrder,
            ServerEventKind::SelectedImages,
        ],
    )
    .await;

    match failure {
        Some(name) => Err(AppError::OperationFailed(format!("Failed to delete {name}"))),
        None => Ok(Json(StatusResponse::success())),
    }
}

/// POST /update_order
///
/// Replace the order list. Unknown names and repeats are dropped.
pub async fn update_order(
    State(state): State<AppState>,
    Json(input): Json<UpdateOrderRequest>,
) -> AppResult<Json<StatusResponse>> {
    let order = OrderRepo::replace(&state.data, &state.images, &input.order).await?;

    tracing::info!(count = order.len(), "Image order updated");
    sse::publish(&state, &[ServerEventKind::ImageOrder]).await;

    Ok(Json(StatusResponse::success()))
}

/// GET /selected_images
pub async fn get_selected(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let selected = sse::snapshot::payload(&state, ServerEventKind::SelectedImages).await?;
    Ok(Json(selected))
}

/// POST /update_selected
///
/// Replace the selected set. Unknown names and repeats are dropped.
pub async fn update_selected(
    State(state): State<AppState>,
    Json(input): Json<UpdateSelectedRequest>,
) -> AppResult<Json<StatusResponse>> {
    let selected = SelectedRepo::replace(&state.data, &state.images, &input.selected).await?;

    tracing::info!(count = selected.len(), "Selection updated");
    sse::publish(&state, &[ServerEventKind::SelectedImages]).await;

    Ok(Json(StatusResponse::success()))
}

/// GET /thumbnail/{filename}
///
/// JPEG preview no larger than [`THUMBNAIL_MAX_EDGE`] on either side.
pub async fn thumbnail(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let path = state.images.path_of(&filename)?;
    if !state.images.exists(&filename).await {
        return Err(CoreError::NotFound {
            entity: "Image",
            id: filename,
        }
        .into());
    }

    let jpeg = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, image::ImageError> {
        let source = image::open(&path)?;
        let thumb = source.thumbnail(THUMBNAIL_MAX_EDGE, THUMBNAIL_MAX_EDGE);
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(thumb.to_rgb8())
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)?;
        Ok(buf)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Thumbnail task failed: {e}")))?
    .map_err(|e| AppError::InternalError(format!("Thumbnail for {filename} failed: {e}")))?;

    Ok((
        [(CONTENT_TYPE, "image/jpeg"), (CACHE_CONTROL, "no-cache")],
        jpeg,
    ))
}
