use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

pub async fn handler() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "OK",
    )
        .into_response()
}
