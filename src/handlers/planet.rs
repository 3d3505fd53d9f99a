//! Planet handlers: list.

use crate::error::AppError;
use crate::response;
use crate::service::EntityStore;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let planets = EntityStore::list_planets(&state.pool).await?;
    Ok(response::ok(planets))
}
