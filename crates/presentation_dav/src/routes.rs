//! Route definitions
//!
//! The DAV tree has its own path grammar, so everything under the mount goes
//! through the fallback dispatcher rather than axum's router. Only the
//! well-known discovery endpoints are routed conventionally.

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;

use crate::dispatch;
use crate::state::AppState;

/// Create the DAV router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Service discovery from a bare domain (RFC 6764)
        .route("/.well-known/caldav", any(well_known_redirect))
        .route("/.well-known/carddav", any(well_known_redirect))
        // Everything else is resolved by the DAV path grammar
        .fallback(dispatch::dispatch)
        .with_state(state)
}

/// Redirect discovery probes to the mount root
async fn well_known_redirect(State(state): State<AppState>) -> Response {
    let location = format!("{}/", state.mount());
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location)],
    )
        .into_response()
}
