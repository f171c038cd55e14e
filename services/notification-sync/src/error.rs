use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::utils::http_client::HttpClientError;
use thiserror::Error;

// Error type untuk notification sync dengan response standardized
#[derive(Debug, Error)]
pub enum AppError {
    #[error("HR API error: {0}")]
    Upstream(#[from] HttpClientError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Notification sync sudah di-unmount")]
    Unmounted,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

// Implementasi IntoResponse untuk return error sebagai JSON response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::Upstream(err) => {
                tracing::warn!("HR API error: {}", err);
                match err {
                    HttpClientError::NotFound(_) => {
                        (StatusCode::NOT_FOUND, "not_found", err.to_string())
                    }
                    HttpClientError::Unauthorized(_) => {
                        (StatusCode::UNAUTHORIZED, "unauthorized", err.to_string())
                    }
                    _ => (StatusCode::BAD_GATEWAY, "upstream_error", err.to_string()),
                }
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Unmounted => (
                StatusCode::SERVICE_UNAVAILABLE,
                "unmounted",
                self.to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (
                AppError::from(HttpClientError::NotFound("x".to_string())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(HttpClientError::Unauthorized("x".to_string())),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::from(HttpClientError::ServiceUnavailable("x".to_string())),
                StatusCode::BAD_GATEWAY,
            ),
            (AppError::bad_request("x"), StatusCode::BAD_REQUEST),
            (AppError::Unmounted, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
