//! Resource routes for scientists, planets and missions.

use crate::handlers::{mission, planet, scientist};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/scientists", get(scientist::list).post(scientist::create))
        .route(
            "/scientists/:id",
            get(scientist::read)
                .patch(scientist::update)
                .delete(scientist::delete),
        )
        .route("/planets", get(planet::list))
        .route("/missions", post(mission::create))
        .with_state(state)
}
