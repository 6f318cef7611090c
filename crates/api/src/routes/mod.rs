pub mod health;
pub mod images;
pub mod slideshow;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::sse;
use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                          control page
/// /events                    Server-Sent Events stream
///
/// /images                    image list (GET)
/// /upload                    multipart upload (POST)
/// /delete/{filename}         delete one (POST)
/// /delete_images             delete several (POST)
/// /update_order              replace order (POST)
/// /selected_images           selected set (GET)
/// /update_selected           replace selected set (POST)
/// /thumbnail/{filename}      JPEG thumbnail (GET)
///
/// /slideshow                 start (POST)
/// /stop_slideshow            stop (POST)
/// /slideshow_state           reconciled active flag (GET)
/// /slideshow_settings        get, update
/// /get_device_name           device name (GET)
/// /set_device_name           rename device (POST)
/// ```
///
/// `/uploads/{filename}` and `/health` are mounted by the router builder.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/events", get(sse::handler::events))
        .merge(images::router())
        .merge(slideshow::router())
}
