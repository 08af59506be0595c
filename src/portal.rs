use axum::response::Html;

/// The browser UI: a single page that drives the `/documents` endpoints.
const PORTAL_PAGE: &str = include_str!("../static/index.html");

pub async fn portal_page() -> Html<&'static str> {
    Html(PORTAL_PAGE)
}
