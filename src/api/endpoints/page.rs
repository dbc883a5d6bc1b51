//! Intake form page.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../resources/index.html");

/// `GET /` — the symptom intake form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
