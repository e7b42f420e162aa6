//! Rutas de vehículos (`/api/cars`)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::models::vehicle::{Vehicle, VehicleCreate, VehicleFilters, VehicleUpdate};
use super::extract::{AppJson, AppQuery};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/manager/:name", get(list_vehicles_by_manager))
        .route(
            "/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

async fn create_vehicle(
    State(state): State<AppState>,
    AppJson(request): AppJson<VehicleCreate>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let vehicle = state.vehicles.create(request).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn list_vehicles(
    State(state): State<AppState>,
    AppQuery(filters): AppQuery<VehicleFilters>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    Ok(Json(state.vehicles.list(filters).await?))
}

async fn list_vehicles_by_manager(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    Ok(Json(state.vehicles.list_by_manager(&name).await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, AppError> {
    state
        .vehicles
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_error("Car", &id))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<VehicleUpdate>,
) -> Result<Json<Vehicle>, AppError> {
    state
        .vehicles
        .update(&id, request)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_error("Car", &id))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.vehicles.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found_error("Car", &id))
    }
}
