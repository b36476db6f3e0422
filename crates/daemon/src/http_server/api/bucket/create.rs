use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use common::prelude::StoreError;

use crate::http_server::api::error_response;
use crate::http_server::api::types::BucketResource;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Name of the bucket to create
    pub name: String,
}

/// The body is decoded as JSON whatever `Content-Type` the client sent.
pub async fn handler(
    State(state): State<ServiceState>,
    body: Bytes,
) -> Result<impl IntoResponse, CreateError> {
    let req: CreateRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("CREATE BUCKET: Rejected request body: {}", e);
        CreateError::InvalidRequest(format!("invalid request body: {}", e))
    })?;

    if req.name.is_empty() {
        return Err(CreateError::InvalidRequest(
            "bucket name cannot be empty".into(),
        ));
    }

    state.store().create_bucket(&req.name)?;
    tracing::info!("CREATE BUCKET: Bucket '{}' created", req.name);

    Ok((StatusCode::OK, Json(BucketResource::new(req.name))))
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for CreateError {
    fn into_response(self) -> Response {
        match self {
            CreateError::InvalidRequest(msg) => error_response(StatusCode::BAD_REQUEST, msg),
            CreateError::Store(StoreError::AlreadyExists(name)) => {
                tracing::info!("CREATE BUCKET: Bucket '{}' already exists", name);
                error_response(
                    StatusCode::CONFLICT,
                    format!("bucket already exists: {}", name),
                )
            }
            CreateError::Store(e) => {
                tracing::error!("CREATE BUCKET ERROR: {:?}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "unknown server error")
            }
        }
    }
}
