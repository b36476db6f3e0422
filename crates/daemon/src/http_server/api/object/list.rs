use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use common::prelude::StoreError;

use crate::http_server::api::error_response;
use crate::http_server::api::types::ObjectList;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    Path(bucket): Path<String>,
) -> Result<impl IntoResponse, ListError> {
    let objects = state
        .store()
        .list_objects(&bucket)
        .map_err(|e| match e {
            StoreError::NotFound(_) => ListError::BucketNotFound(bucket.clone()),
            other => ListError::Store(other),
        })?;

    tracing::debug!(bucket = %bucket, count = objects.len(), "LIST OBJECTS");

    Ok((StatusCode::OK, Json(ObjectList::new(objects))))
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        match self {
            ListError::BucketNotFound(_) => error_response(
                StatusCode::NOT_FOUND,
                "The specified bucket does not exist.",
            ),
            ListError::Store(e) => {
                tracing::error!("LIST OBJECTS ERROR: {:?}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "unknown server error")
            }
        }
    }
}
