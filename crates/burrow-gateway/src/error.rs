use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use burrow_redirector::RedirectError;
use burrow_shortener::ShortenerError;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shorten(#[from] ShortenerError),
    #[error(transparent)]
    Redirect(#[from] RedirectError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Shorten(ShortenerError::InvalidUrl(message)) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            err => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
