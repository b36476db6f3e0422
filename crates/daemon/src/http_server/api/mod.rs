//! Storage JSON API
//!
//! Handlers mirror the paths and response shapes of the Cloud Storage JSON
//! API so that stock client libraries can talk to the mock unmodified:
//!
//! | Method | Path                                   | Handler                |
//! |--------|----------------------------------------|------------------------|
//! | POST   | `/storage/v1/b`                        | [`bucket::create`]     |
//! | POST   | `/upload/storage/v1/b/:bucket/o?name=` | [`object::upload`]     |
//! | GET    | `/storage/v1/b/:bucket/o/*object`      | [`object::get`]        |
//! | GET    | `/storage/v1/b/:bucket/o`              | [`object::list`]       |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

pub mod bucket;
pub mod object;
pub mod types;

use crate::ServiceState;
use types::ErrorResponse;

const JSON_API_PREFIX: &str = "/storage/v1";
const UPLOAD_API_PREFIX: &str = "/upload/storage/v1";

pub fn router(state: ServiceState) -> Router<ServiceState> {
    let json_api = Router::new()
        .route("/b", post(bucket::create::handler))
        .route("/b/:bucket/o", get(object::list::handler))
        .route("/b/:bucket/o/*object", get(object::get::handler));

    let upload_api = Router::new().route("/b/:bucket/o", post(object::upload::handler));

    Router::new()
        .nest(JSON_API_PREFIX, json_api)
        .nest(UPLOAD_API_PREFIX, upload_api)
        .with_state(state)
}

/// Render an error in the storage API's error envelope.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(status, message))).into_response()
}
