//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Body sent for every rejected mutation. Field-level detail is never exposed.
pub const GENERIC_VALIDATION_ERROR: &str = "validation errors";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("validation: {0}")]
    Validation(String),
    #[error("integrity: {0}")]
    Integrity(String),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    /// Collapse a failure raised inside a mutating operation into the client-facing
    /// validation kinds. Not-found and unknown-field errors pass through unchanged.
    pub fn into_rejection(self) -> AppError {
        match self {
            AppError::Db(e) => {
                let fk_violation = e
                    .as_database_error()
                    .map(|d| d.is_foreign_key_violation())
                    .unwrap_or(false);
                if fk_violation {
                    AppError::Integrity(e.to_string())
                } else {
                    AppError::Validation(e.to_string())
                }
            }
            AppError::Config(e) => AppError::Validation(e.to_string()),
            other => other,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Serialize)]
pub struct ErrorsBody {
    pub errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: self.to_string(),
                }),
            )
                .into_response(),
            AppError::Validation(detail) => {
                tracing::warn!(detail = %detail, "rejected: validation");
                generic_validation()
            }
            AppError::Integrity(detail) => {
                tracing::warn!(detail = %detail, "rejected: foreign key integrity");
                generic_validation()
            }
            AppError::UnknownField(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorsBody {
                    errors: vec![self.to_string()],
                }),
            )
                .into_response(),
            AppError::Db(_) | AppError::Config(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "internal error".into(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

fn generic_validation() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorsBody {
            errors: vec![GENERIC_VALIDATION_ERROR.into()],
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        assert_eq!(AppError::NotFound("Scientist").to_string(), "Scientist not found");
    }

    #[test]
    fn rejection_keeps_precise_kinds() {
        assert!(matches!(
            AppError::NotFound("Scientist").into_rejection(),
            AppError::NotFound("Scientist")
        ));
        assert!(matches!(
            AppError::UnknownField("id".into()).into_rejection(),
            AppError::UnknownField(_)
        ));
    }

    #[test]
    fn rejection_flattens_storage_errors() {
        let err = AppError::Db(sqlx::Error::RowNotFound).into_rejection();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::NotFound("Scientist").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation("name".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Integrity("fk".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Db(sqlx::Error::PoolTimedOut).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
