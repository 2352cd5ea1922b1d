pub mod driver_routes;
pub mod passenger_routes;
pub mod ride_routes;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors_middleware;
use crate::state::AppState;

/// Router completo de la API con su estado
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/passengers", passenger_routes::create_passenger_router())
        .nest("/drivers", driver_routes::create_driver_router())
        .nest("/rides", ride_routes::create_ride_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": state.backend.as_str(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
