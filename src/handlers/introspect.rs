//! GET /routes: the routing table in registration order.

use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct RouteInfo {
    pub method: String,
    pub path: String,
    pub surface: String,
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produces: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumes: Option<&'static str>,
}

pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteInfo>> {
    let routes = state
        .table
        .entries()
        .iter()
        .map(|e| RouteInfo {
            method: e.key.method.to_string(),
            path: e.key.path.clone(),
            surface: e.handler.surface.type_name().to_string(),
            operation: e.handler.name().to_string(),
            produces: e.produces.map(|m| m.as_str()),
            consumes: e.consumes.map(|m| m.as_str()),
        })
        .collect();
    Json(routes)
}
