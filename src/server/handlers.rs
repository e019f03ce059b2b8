use crate::dashboard::{LayoutNode, SelectorEvent, Shell, SlotContent};
use crate::server::page;
use crate::server::{ApiError, AppState};
use axum::extract::{Path, State};
use axum::response::{Html, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub changed: String,
    #[serde(default)]
    pub inputs: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub outputs: BTreeMap<String, SlotContent>,
}

#[derive(Debug, Serialize)]
struct LayoutResponse<'a> {
    id: &'a str,
    title: &'a str,
    layout: &'a LayoutNode,
    slots: BTreeMap<String, SlotContent>,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::index_page(state.dashboards()))
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn show_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let dashboard = state.dashboard(&id)?;
    let slots = Shell::new(dashboard).render_all()?;
    debug!(dashboard = %id, slots = slots.len(), "page rendered");
    Ok(Html(page::dashboard_page(dashboard, &slots)?))
}

pub async fn layout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let dashboard = state.dashboard(&id)?;
    let slots = Shell::new(dashboard).render_all()?;
    state.json(&LayoutResponse {
        id: dashboard.id(),
        title: dashboard.title(),
        layout: &dashboard.spec().layout,
        slots,
    })
}

/// Re-render the slots bound to the changed selector, given the selection the client shows.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRequest>,
) -> Result<Response, ApiError> {
    let dashboard = state.dashboard(&id)?;
    let value = request
        .inputs
        .get(&request.changed)
        .cloned()
        .unwrap_or(Value::Null);

    let mut shell = Shell::with_inputs(dashboard, &request.inputs);
    let outputs = shell.handle(&SelectorEvent::changed(&request.changed, value))?;
    debug!(
        dashboard = %id,
        selection = ?shell.view(),
        phase = ?shell.phase(),
        slots = outputs.len(),
        "update rendered"
    );
    state.json(&UpdateResponse { outputs })
}
