//! Scientist handlers: list, create, read, patch, delete.

use crate::error::AppError;
use crate::extractors::JsonObject;
use crate::response;
use crate::service::EntityStore;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

/// Ids are integers; anything else cannot name a scientist.
fn parse_id(id: &str) -> Result<i64, AppError> {
    id.parse().map_err(|_| AppError::NotFound("Scientist"))
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let scientists = EntityStore::list_scientists(&state.pool).await?;
    Ok(response::ok(scientists))
}

pub async fn create(
    State(state): State<AppState>,
    body: JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let scientist = EntityStore::create_scientist(&state.pool, body.object()).await?;
    Ok(response::created(scientist))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let scientist = EntityStore::get_scientist(&state.pool, parse_id(&id)?).await?;
    Ok(response::ok(scientist))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let scientist = EntityStore::patch_scientist(&state.pool, parse_id(&id)?, body.object()).await?;
    Ok(response::accepted(scientist))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    EntityStore::delete_scientist(&state.pool, parse_id(&id)?).await?;
    Ok(response::no_content())
}
