use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid payload: {0}")]
    Validation(#[from] garde::Report),

    #[error("Invalid multipart request: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Database error: {0}")]
    Database(movies_dal::Error),
}

impl From<movies_dal::Error> for ApiError {
    fn from(error: movies_dal::Error) -> Self {
        match error {
            movies_dal::Error::RecordNotFound(what) => ApiError::NotFound(format!("{what} not found")),
            other => ApiError::Database(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidRequest(_) | ApiError::Validation(_) | ApiError::Multipart(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            ApiError::Database(e) => {
                error!("Database error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
