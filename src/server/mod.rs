//! HTTP surface: dashboard pages, layout JSON and the update endpoint.

mod handlers;
mod page;

use crate::dashboard::{Dashboard, DashboardError};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unknown dashboard: {0}")]
    UnknownDashboard(String),
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownDashboard(_) => StatusCode::NOT_FOUND,
            ApiError::Dashboard(DashboardError::UnknownSelector(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Dashboards are built once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct AppState {
    dashboards: Arc<BTreeMap<String, Dashboard>>,
    pretty: bool,
}

impl AppState {
    pub fn new(dashboards: impl IntoIterator<Item = Dashboard>, pretty: bool) -> Self {
        let dashboards = dashboards
            .into_iter()
            .map(|d| (d.id().to_string(), d))
            .collect();
        Self {
            dashboards: Arc::new(dashboards),
            pretty,
        }
    }

    pub fn dashboards(&self) -> impl Iterator<Item = &Dashboard> {
        self.dashboards.values()
    }

    fn dashboard(&self, id: &str) -> Result<&Dashboard, ApiError> {
        self.dashboards
            .get(id)
            .ok_or_else(|| ApiError::UnknownDashboard(id.to_string()))
    }

    fn json<T: Serialize>(&self, value: &T) -> Result<Response, ApiError> {
        let body = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::healthz))
        .route("/:dashboard", get(handlers::show_page))
        .route("/:dashboard/_dash-layout", get(handlers::layout))
        .route(
            "/:dashboard/_dash-update-component",
            post(handlers::update),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{catalog, fixtures};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let observations = fixtures::observations();
        let dashboards = catalog::all()
            .into_iter()
            .map(|spec| Dashboard::build(spec, &observations).unwrap());
        build_router(AppState::new(dashboards, false))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get_path(uri: &str) -> (StatusCode, Vec<u8>) {
        send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_update(dashboard: &str, body: Value) -> (StatusCode, Value) {
        let (status, bytes) = send(
            Request::builder()
                .method("POST")
                .uri(format!("/{dashboard}/_dash-update-component"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn healthz_answers_ok() {
        let (status, body) = get_path("/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn index_links_every_dashboard() {
        let (status, body) = get_path("/").await;
        let html = String::from_utf8(body).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<a href=\"/impact\">Bee Colonies Impact Dashboard</a>"));
        assert!(html.contains("<a href=\"/period\">Bees Survey Dashboard</a>"));
    }

    #[tokio::test]
    async fn page_embeds_layout_and_initial_slots() {
        let (status, body) = get_path("/impact").await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<select id=\"slct_year\" data-selector"));
        assert!(html.contains("<div id=\"bee_choropleth\" class=\"graph\"></div>"));
        assert!(html.contains("The year chosen by the user was: 2015"));
        assert!(html.contains("<script id=\"initial-slots\" type=\"application/json\">"));
        assert!(html.contains("<body data-dashboard=\"impact\">"));
    }

    #[tokio::test]
    async fn layout_endpoint_returns_tree_and_slots() {
        let (status, body) = get_path("/period/_dash-layout").await;
        let layout: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(layout["id"], "period");
        assert_eq!(layout["layout"]["type"], "div");
        assert_eq!(layout["slots"]["output_container"]["kind"], "caption");
        assert_eq!(layout["slots"]["period_analysis"]["kind"], "figure");
    }

    #[tokio::test]
    async fn update_refreshes_slots_bound_to_the_selector() {
        let (status, body) = post_update(
            "impact",
            json!({"changed": "slct_year", "inputs": {"slct_impact": "Disease", "slct_year": 2017}}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let outputs = body["outputs"].as_object().unwrap();
        let mut ids: Vec<_> = outputs.keys().map(String::as_str).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["bee_bar_plot", "bee_choropleth", "output_container_year"]);
        assert_eq!(
            outputs["output_container_year"]["text"],
            "The year chosen by the user was: 2017"
        );
        assert_eq!(outputs["bee_bar_plot"]["figure"]["data"][0]["type"], "bar");
    }

    #[tokio::test]
    async fn unknown_selector_is_a_bad_request() {
        let (status, body) = post_update(
            "impact",
            json!({"changed": "slct_period", "inputs": {"slct_period": "JAN THRU MAR"}}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("slct_period"));
    }

    #[tokio::test]
    async fn unknown_dashboard_is_not_found() {
        let (status, body) = get_path("/hive/_dash-layout").await;
        let error: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error["error"], "Unknown dashboard: hive");
    }

    #[test]
    fn render_failures_map_to_server_error() {
        let response = ApiError::from(DashboardError::NotFiltering).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
