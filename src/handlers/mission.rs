//! Mission handlers: create.

use crate::error::AppError;
use crate::extractors::JsonObject;
use crate::response;
use crate::service::EntityStore;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

pub async fn create(
    State(state): State<AppState>,
    body: JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let mission = EntityStore::create_mission(&state.pool, body.object()).await?;
    Ok(response::created(mission))
}
