//! Rutas de personal (`/api/staff`)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::models::staff::{StaffCreate, StaffFilters, StaffMember, StaffUpdate};
use super::extract::{AppJson, AppQuery};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub fn create_staff_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_staff).post(create_staff))
        .route("/search", get(search_staff))
        .route(
            "/:id",
            get(get_staff).put(update_staff).delete(delete_staff),
        )
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
}

async fn create_staff(
    State(state): State<AppState>,
    AppJson(request): AppJson<StaffCreate>,
) -> Result<(StatusCode, Json<StaffMember>), AppError> {
    let member = state.staff.create(request).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

async fn list_staff(
    State(state): State<AppState>,
    AppQuery(filters): AppQuery<StaffFilters>,
) -> Result<Json<Vec<StaffMember>>, AppError> {
    Ok(Json(state.staff.list(filters).await?))
}

async fn search_staff(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> Result<Json<Vec<StaffMember>>, AppError> {
    Ok(Json(state.staff.search(&params.q).await?))
}

async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StaffMember>, AppError> {
    state
        .staff
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_error("Staff member", &id))
}

async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<StaffUpdate>,
) -> Result<Json<StaffMember>, AppError> {
    state
        .staff
        .update(&id, request)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_error("Staff member", &id))
}

async fn delete_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.staff.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found_error("Staff member", &id))
    }
}
