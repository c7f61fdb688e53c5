//! Top-level DAV dispatcher
//!
//! One axum fallback handler owns the whole mount: strip the prefix,
//! authenticate, resolve the path, enforce that the path's username matches
//! the authenticated user, then hand off to the per-method handlers. A
//! username mismatch is a 403, not a 404; the two signal different things
//! and clients rely on the distinction.

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::debug;

use application::AuthError;

use crate::error::DavError;
use crate::handlers::{self, Depth};
use crate::path::DavPath;
use crate::state::AppState;

/// Capability set announced to probing clients
pub const DAV_CAPABILITIES: &str = "1, 3, calendar-access, addressbook";
/// Methods this surface answers
pub const ALLOWED_METHODS: &str = "OPTIONS, PROPFIND, REPORT, GET, PUT, DELETE";

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Entry point for every request under the mount
pub async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let response = handle(&state, request)
        .await
        .unwrap_or_else(IntoResponse::into_response);
    with_dav_headers(response)
}

/// Stamp the capability headers onto every response from this subsystem
fn with_dav_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert("dav", HeaderValue::from_static(DAV_CAPABILITIES));
    headers.insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

async fn handle(state: &AppState, request: Request) -> Result<Response, DavError> {
    let path = request.uri().path().to_string();
    let relative = strip_mount(state.mount(), &path).ok_or(DavError::NotFound)?;

    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    let user = state
        .auth
        .authenticate(authorization.as_deref())
        .await
        .map_err(|err| match err {
            AuthError::Store(store_err) => DavError::Internal(store_err.to_string()),
            AuthError::MissingCredentials | AuthError::InvalidCredentials => {
                DavError::Unauthenticated {
                    realm: state.dav.realm.clone(),
                }
            },
        })?;

    let route = DavPath::parse(relative);
    if let Some(path_user) = route.username() {
        if path_user != user.username {
            debug!(
                path_user,
                auth_user = %user.username,
                "username mismatch on DAV path"
            );
            return Err(DavError::Forbidden);
        }
    }

    let method = request.method().as_str().to_string();
    let depth = Depth::parse(
        request
            .headers()
            .get("depth")
            .and_then(|v| v.to_str().ok()),
    );

    match method.as_str() {
        "OPTIONS" => Ok(StatusCode::OK.into_response()),
        "PROPFIND" => {
            let body = read_body(request).await?;
            handlers::propfind(state, &route, &user, depth, &body).await
        },
        "REPORT" => {
            let body = read_body(request).await?;
            handlers::report(state, &route, &user, &body).await
        },
        "GET" => handlers::get(state, &route, &user).await,
        "PUT" => {
            let body = read_body(request).await?;
            handlers::put(state, &route, &user, &body).await
        },
        "DELETE" => handlers::delete(state, &route, &user).await,
        _ => Err(DavError::MethodNotAllowed),
    }
}

async fn read_body(request: Request) -> Result<Bytes, DavError> {
    axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| DavError::BadRequest(format!("unreadable body: {e}")))
}

/// Strip the configured mount prefix from a request path
///
/// Paths outside the mount do not belong to this subsystem and resolve to
/// nothing.
fn strip_mount<'a>(mount: &str, path: &'a str) -> Option<&'a str> {
    if mount.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(mount)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
