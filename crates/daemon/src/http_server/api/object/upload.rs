use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use common::prelude::StoreError;

use crate::http_server::api::error_response;
use crate::http_server::api::types::ObjectResource;
use crate::ServiceState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadQuery {
    /// Name of the object to create or overwrite
    pub name: Option<String>,
    /// Sent by client libraries (`media`, `multipart`, ...); only the raw
    ///  body is stored regardless
    #[serde(rename = "uploadType")]
    pub upload_type: Option<String>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(bucket): Path<String>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, UploadError> {
    let name = query
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| UploadError::InvalidRequest("missing required parameter: name".into()))?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    tracing::debug!(
        bucket = %bucket,
        object = %name,
        upload_type = ?query.upload_type,
        size = body.len(),
        "UPLOAD OBJECT: received"
    );

    let meta = state
        .store()
        .put_object(&bucket, &name, body, content_type)
        .map_err(|e| match e {
            StoreError::NotFound(_) => UploadError::BucketNotFound(bucket.clone()),
            other => UploadError::Store(other),
        })?;

    tracing::info!(
        "UPLOAD OBJECT: Stored {}/{} ({} bytes, {})",
        meta.bucket,
        meta.name,
        meta.size,
        meta.content_type
    );

    Ok((StatusCode::OK, Json(ObjectResource::from(meta))))
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::InvalidRequest(msg) => error_response(StatusCode::BAD_REQUEST, msg),
            UploadError::BucketNotFound(_) => error_response(
                StatusCode::NOT_FOUND,
                "The specified bucket does not exist.",
            ),
            UploadError::Store(e) => {
                tracing::error!("UPLOAD OBJECT ERROR: {:?}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "unknown server error")
            }
        }
    }
}
