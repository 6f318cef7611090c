#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use slidekiosk_api::config::ServerConfig;
use slidekiosk_api::router::build_app_router;
use slidekiosk_api::state::AppState;

pub const BOUNDARY: &str = "slidekiosk-test-boundary";

/// Build a test `ServerConfig` rooted in `root`.
///
/// Uses `http://localhost:5000` as CORS origin (matching the default), a
/// renderer binary that does not exist, and short poll intervals.
pub fn test_config(root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5000".to_string()],
        request_timeout_secs: 30,
        upload_dir: root.join("uploads"),
        data_dir: root.join("data"),
        max_images: 100,
        max_upload_bytes: 8 * 1024 * 1024,
        renderer_bin: root.join("no-such-renderer"),
        renderer_stop_timeout_secs: 3,
        sse_keepalive_secs: 15,
        state_poll_secs: 2,
    }
}

/// A router over real temporary directories.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub fn upload_path(&self, name: &str) -> PathBuf {
        self.state.images.dir().join(name)
    }
}

/// Build the full application router, as `main.rs` does, with default test
/// configuration.
pub async fn build_test_app() -> TestApp {
    build_test_app_with(|_| {}).await
}

/// Like [`build_test_app`], letting the caller adjust the configuration.
pub async fn build_test_app_with(configure: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    configure(&mut config);

    let state = AppState::new(config.clone());
    state.images.ensure_dir().await.unwrap();
    state.data.ensure_dir().await.unwrap();

    let router = build_app_router(state.clone(), &config);
    TestApp { router, state, dir }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A `multipart/form-data` upload with a single part.
pub fn upload_request(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// A small valid PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Upload `name` with a tiny PNG body and return the JSON response.
pub async fn upload_png(app: &TestApp, name: &str) -> Value {
    let response = app.send(upload_request("file", name, &png_bytes(8, 6))).await;
    assert_eq!(response.status(), 200, "upload of {name} failed");
    body_json(response).await
}
