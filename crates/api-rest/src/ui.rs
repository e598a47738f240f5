use axum::response::Html;

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

/// Serves the single-page dashboard; all data comes from `/api/patients`.
pub async fn serve_dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
