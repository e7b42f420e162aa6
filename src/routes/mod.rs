//! Rutas HTTP
//!
//! Router principal: health check en `/`, inventario en `/api/cars`
//! y personal en `/api/staff`.

pub mod extract;
pub mod staff_routes;
pub mod vehicle_routes;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_layer_for;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub db_connected: bool,
    pub version: &'static str,
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer_for(&state.config.cors_origins);

    Router::new()
        .route("/", get(health))
        .nest("/api/cars", vehicle_routes::create_vehicle_router())
        .nest("/api/staff", staff_routes::create_staff_router())
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server is running",
        db_connected: state.store.ping().await,
        version: env!("CARGO_PKG_VERSION"),
    })
}
