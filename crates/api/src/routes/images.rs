//! Route definitions for the image library.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// ```text
/// GET    /images                 -> list_images
/// POST   /upload                 -> upload_image
/// POST   /delete/{filename}      -> delete_image
/// POST   /delete_images          -> delete_images
/// POST   /update_order           -> update_order
/// GET    /selected_images        -> get_selected
/// POST   /update_selected        -> update_selected
/// GET    /thumbnail/{filename}   -> thumbnail
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/images", get(images::list_images))
        .route("/upload", post(images::upload_image))
        .route("/delete/{filename}", post(images::delete_image))
        .route("/delete_images", post(images::delete_images))
        .route("/update_order", post(images::update_order))
        .route("/selected_images", get(images::get_selected))
        .route("/update_selected", post(images::update_selected))
        .route("/thumbnail/{filename}", get(images::thumbnail))
}
