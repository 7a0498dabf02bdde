// Web server - serves the rendered dashboard
//
// Everything is rendered before the listener starts; handlers only hand out
// shared, immutable state.

use crate::config::Config;
use crate::data::Dataset;
use crate::layout::{build_dashboard, Node};
use crate::page::Page;
use crate::quality::{DataQualityEngine, Severity};
use crate::stats::Summary;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub page: Arc<Page>,
    /// Page body shared across responses
    pub index: Bytes,
    pub layout: Arc<Node>,
    pub summary: Arc<Summary>,
}

impl AppState {
    /// Load tables, check them, compute aggregates and render the page
    pub fn build() -> Result<Self> {
        let data = Dataset::load().context("Failed to load dashboard tables")?;
        info!(rows = data.row_count(), "tables loaded");

        let report = DataQualityEngine::new().check(&data);
        for issue in &report.issues {
            match issue.severity {
                Severity::Critical => error!(table = %issue.table, "{}", issue.issue),
                _ => warn!(table = %issue.table, "{}", issue.issue),
            }
        }
        info!("data quality: {}", report.summary());

        let summary = Summary::compute(&data).context("Failed to compute aggregates")?;
        let layout = build_dashboard(&data, &summary);
        let page = Page::from_tree(&layout).context("Failed to render dashboard")?;
        info!(bytes = page.len(), etag = %page.etag, "dashboard rendered");

        Ok(AppState {
            index: Bytes::from(page.html.clone()),
            page: Arc::new(page),
            layout: Arc::new(layout),
            summary: Arc::new(summary),
        })
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / - the dashboard
async fn serve_index(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let etag = state.page.etag.as_str();

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|v| etag_matches(v, etag))
        .unwrap_or(false);

    if not_modified {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag.to_string())]).into_response();
    }

    (
        StatusCode::OK,
        [(header::ETAG, etag.to_string())],
        Html(state.index.clone()),
    )
        .into_response()
}

/// If-None-Match uses weak comparison: `W/"x"` matches `"x"`
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    let etag = etag.trim_start_matches("W/");
    if_none_match.split(',').map(str::trim).any(|tag| {
        tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == etag
    })
}

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/layout - presentation tree
async fn get_layout(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.layout.as_ref().clone()))
}

/// GET /api/summary - aggregates behind the cards
async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.summary.as_ref().clone()))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState, assets_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/layout", get(get_layout))
        .route("/summary", get(get_summary))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C
pub async fn serve(config: &Config, state: AppState) -> Result<()> {
    let addr = config.socket_addr()?;
    let app = router(state, &config.assets_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, assets = %config.assets_dir.display(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> (Router, AppState) {
        let state = AppState::build().unwrap();
        (router(state.clone(), Path::new("assets")), state)
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_serves_page_with_etag() {
        let (app, state) = app();

        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::ETAG], state.page.etag.as_str());
        assert!(resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert_eq!(body_string(resp).await, state.page.html);
        assert_eq!(state.index.len(), state.page.len());
    }

    #[tokio::test]
    async fn test_index_honours_if_none_match() {
        let (app, state) = app();

        let req = Request::builder()
            .uri("/")
            .header(header::IF_NONE_MATCH, state.page.etag.as_str())
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_stale_etag_gets_full_page() {
        let (app, _) = app();

        let req = Request::builder()
            .uri("/")
            .header(header::IF_NONE_MATCH, "\"stale\"")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }

    async fn index_with_if_none_match(value: &str) -> StatusCode {
        let (app, _) = app();

        let req = Request::builder()
            .uri("/")
            .header(header::IF_NONE_MATCH, value)
            .body(Body::empty())
            .unwrap();
        app.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_weak_etag_gets_not_modified() {
        let (_, state) = app();
        let weak = format!("W/{}", state.page.etag);

        assert_eq!(index_with_if_none_match(&weak).await, StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_wildcard_gets_not_modified() {
        assert_eq!(index_with_if_none_match("*").await, StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_etag_list_gets_not_modified() {
        let (_, state) = app();
        let list = format!("\"stale\", {}", state.page.etag);

        assert_eq!(index_with_if_none_match(&list).await, StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_etag_matches() {
        let etag = "\"abc\"";

        assert!(etag_matches("\"abc\"", etag));
        assert!(etag_matches("W/\"abc\"", etag));
        assert!(etag_matches(" \"x\" ,  W/\"abc\" ", etag));
        assert!(etag_matches("*", etag));
        assert!(!etag_matches("\"abcd\"", etag));
        assert!(!etag_matches("abc", etag));
        assert!(!etag_matches("", etag));
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let (app, _) = app();

        let first = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let second = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(body_string(first).await, body_string(second).await);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();

        let resp = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(value, serde_json::json!({"success": true, "data": "OK"}));
    }

    #[tokio::test]
    async fn test_api_allows_any_origin() {
        let (app, _) = app();

        let req = Request::builder()
            .uri("/api/health")
            .header(header::ORIGIN, "https://example.com")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_summary_matches_tables() {
        let (app, _) = app();

        let resp = app
            .oneshot(Request::builder().uri("/api/summary").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(value["data"]["total_transactions"], 1_924_490);
        assert_eq!(value["data"]["total_failures"], 59_929);
        assert_eq!(value["data"]["top_client"]["client"], "Lemfi");
    }

    #[tokio::test]
    async fn test_layout_lists_graphs() {
        let (app, _) = app();

        let resp = app
            .oneshot(Request::builder().uri("/api/layout").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = body_string(resp).await;
        assert_eq!(body.matches("\"kind\":\"graph\"").count(), 10);
    }

    #[tokio::test]
    async fn test_missing_asset_is_404() {
        let (app, _) = app();

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/assets/CLIENT_LOGOS/nope.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (app, _) = app();

        let resp = app
            .oneshot(Request::builder().uri("/statements").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
