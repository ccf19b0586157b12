use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use market_types::domain::RowId;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: RowId },

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<RowId>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, body) = match &self {
            AppError::BadRequest(m) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: m.clone(),
                    id: None,
                },
            ),
            AppError::NotFound { id, .. } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "not found".into(),
                    id: Some(*id),
                },
            ),
            AppError::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "internal error".into(),
                        id: None,
                    },
                )
            }
        };

        let body = serde_json::to_string(&body)
            .unwrap_or_else(|_| "{\"error\":\"internal serialization\"}".into());
        (code, [("content-type", "application/json")], body).into_response()
    }
}
