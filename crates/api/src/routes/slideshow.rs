//! Route definitions for slideshow control, settings and device identity.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{settings, slideshow};
use crate::state::AppState;

/// ```text
/// POST   /slideshow             -> start_slideshow
/// POST   /stop_slideshow        -> stop_slideshow
/// GET    /slideshow_state       -> get_slideshow_state
/// GET    /slideshow_settings    -> get_settings
/// POST   /slideshow_settings    -> update_settings
/// GET    /get_device_name       -> get_device_name
/// POST   /set_device_name       -> set_device_name
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/slideshow", post(slideshow::start_slideshow))
        .route("/stop_slideshow", post(slideshow::stop_slideshow))
        .route("/slideshow_state", get(slideshow::get_slideshow_state))
        .route(
            "/slideshow_settings",
            get(settings::get_settings).post(settings::update_settings),
        )
        .route("/get_device_name", get(settings::get_device_name))
        .route("/set_device_name", post(settings::set_device_name))
}
