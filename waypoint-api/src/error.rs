use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use waypoint_admin::{AdminError, ValidationErrors};
use waypoint_core::CoreError;
use waypoint_offer::OfferError;
use waypoint_table::TableError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": errors.to_string(), "fields": errors }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, json!({ "error": msg }))
            }
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::BadRequest(msg),
            CoreError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::UnknownEntity(_) | AdminError::NotFound(_) => AppError::NotFound(err.to_string()),
            AdminError::UnknownFacet(_) | AdminError::IdentityUpdate(_) => AppError::BadRequest(err.to_string()),
            AdminError::Validation(errors) => AppError::Validation(errors),
            AdminError::Table(e) => e.into(),
            AdminError::Remote(e) => e.into(),
            AdminError::Cancelled => AppError::Internal(anyhow::anyhow!("fetch was superseded")),
        }
    }
}

impl From<OfferError> for AppError {
    fn from(err: OfferError) -> Self {
        match err {
            OfferError::Search(e) => e.into(),
            other => AppError::Upstream(other.to_string()),
        }
    }
}
