use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use forum_auth_core::error::AuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`AuthError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from the auth engine or codec.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A bad request with a human-readable message (e.g. unreadable body).
    #[error("bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Auth(auth) => match auth {
                AuthError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                AuthError::UserAlreadyExists => (
                    StatusCode::BAD_REQUEST,
                    "USER_ALREADY_EXISTS",
                    auth.to_string(),
                ),
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    auth.to_string(),
                ),
                AuthError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", auth.to_string())
                }
                AuthError::InvalidTokenData => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_TOKEN_DATA",
                    auth.to_string(),
                ),
                AuthError::InvalidRefreshToken => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_REFRESH_TOKEN",
                    auth.to_string(),
                ),
                // Store, signing, and internal failures are logged with
                // detail server-side and surface as opaque 500s.
                AuthError::Store(msg) | AuthError::Signing(msg) | AuthError::Internal(msg) => {
                    tracing::error!(error = %msg, "internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_domain_errors_map_to_client_statuses() {
        assert_eq!(
            status_of(AuthError::Validation("bad".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AuthError::UserAlreadyExists.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AuthError::InvalidRefreshToken.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AuthError::InvalidTokenData.into()),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_infrastructure_errors_are_opaque_500s() {
        assert_eq!(
            status_of(AuthError::Store("connection reset".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AuthError::Signing("bad key".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
