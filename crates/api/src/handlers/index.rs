use axum::response::Html;

/// Single-page control UI. Talks to the JSON endpoints and `/events`.
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
