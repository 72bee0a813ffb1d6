use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portfolio_core::PortfolioError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the write endpoints. Read endpoints never produce one;
/// they degrade to fallback payloads instead.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Portfolio(#[from] PortfolioError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Portfolio(PortfolioError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Portfolio(PortfolioError::Serialization(_)) => StatusCode::BAD_REQUEST,
            ApiError::Portfolio(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        } else {
            tracing::debug!("request rejected: {self}");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
