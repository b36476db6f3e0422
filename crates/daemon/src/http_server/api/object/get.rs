use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use common::prelude::StoreError;

use crate::http_server::api::error_response;
use crate::ServiceState;

/// Serve the raw bytes of `bucket/object` with its stored content type.
pub async fn handler(
    State(state): State<ServiceState>,
    Path((bucket, object)): Path<(String, String)>,
) -> Result<Response, GetError> {
    let (content, content_type) = state
        .store()
        .get_object(&bucket, &object)
        .map_err(|e| match e {
            StoreError::NotFound(_) => GetError::NotFound(format!("{}/{}", bucket, object)),
            other => GetError::Store(other),
        })?
        .into_parts();

    tracing::debug!(
        bucket = %bucket,
        object = %object,
        size = content.len(),
        "GET OBJECT: serving"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        content,
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum GetError {
    /// Either the bucket or the object is missing; callers cannot tell which.
    #[error("No such object: {0}")]
    NotFound(String),
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl IntoResponse for GetError {
    fn into_response(self) -> Response {
        match self {
            GetError::NotFound(path) => {
                error_response(StatusCode::NOT_FOUND, format!("No such object: {}", path))
            }
            GetError::Store(e) => {
                tracing::error!("GET OBJECT ERROR: {:?}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "unknown server error")
            }
        }
    }
}
