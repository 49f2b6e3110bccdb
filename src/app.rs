use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{domains::relay::rest::relay_routes, state::SharedAppState};

pub fn create_app(state: SharedAppState) -> Router {
  Router::new()
    .route("/health", get(health_handler))
    .merge(relay_routes())
    .with_state(state)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}

pub async fn health_handler() -> Json<Value> {
  Json(json!({ "status": "ok" }))
}
