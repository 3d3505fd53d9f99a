//! Lenient JSON object body: never rejects, so handlers can run their
//! not-found check before the body is judged.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde_json::{Map, Value};

/// `Some` only when the body parsed as a JSON object.
#[derive(Clone, Debug)]
pub struct JsonObject(pub Option<Map<String, Value>>);

impl JsonObject {
    pub fn object(&self) -> Option<&Map<String, Value>> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = match Json::<Value>::from_request(req, state).await {
            Ok(Json(Value::Object(map))) => Some(map),
            Ok(Json(other)) => {
                tracing::debug!(kind = json_kind(&other), "request body is not an object");
                None
            }
            Err(rejection) => {
                tracing::debug!(%rejection, "unreadable request body");
                None
            }
        };
        Ok(JsonObject(value))
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
