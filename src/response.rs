//! Status + body helpers. Entities are returned bare, without an envelope.

use axum::{http::StatusCode, Json};
use serde_json::Value;

pub fn ok(data: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(data))
}

pub fn created(data: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(data))
}

pub fn accepted(data: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::ACCEPTED, Json(data))
}

pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
