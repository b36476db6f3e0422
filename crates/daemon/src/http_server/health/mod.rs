use axum::routing::get;
use axum::Router;

use crate::ServiceState;

mod liveness;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/health", get(liveness::handler))
        .with_state(state)
}
