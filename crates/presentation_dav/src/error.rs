//! DAV error handling
//!
//! One variant per client-visible outcome. Responses carry the status and an
//! empty body; nothing internal leaks to the client, the detail strings only
//! reach the logs.

use application::StoreError;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::codec::CodecError;
use crate::xml::XmlError;

/// Errors a DAV handler can answer with
#[derive(Debug, Error)]
pub enum DavError {
    /// Missing or invalid credentials; carries the challenge realm
    #[error("Authentication required")]
    Unauthenticated { realm: String },

    /// Authenticated but not the owner, or an unsupported report
    #[error("Access denied")]
    Forbidden,

    /// Unknown route, missing resource, or ownership soft-failure
    #[error("Resource not found")]
    NotFound,

    /// Malformed request body
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP method outside the DAV surface
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Store failure; detail goes to the log, not the wire
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for DavError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated { realm } => (
                StatusCode::UNAUTHORIZED,
                [(
                    header::WWW_AUTHENTICATE,
                    format!("Basic realm=\"{realm}\""),
                )],
            )
                .into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST.into_response(),
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED.into_response(),
            Self::Internal(detail) => {
                error!(detail = %detail, "DAV request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            },
        }
    }
}

impl From<StoreError> for DavError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<XmlError> for DavError {
    fn from(err: XmlError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<CodecError> for DavError {
    fn from(err: CodecError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_carries_challenge() {
        let response = DavError::Unauthenticated {
            realm: "WebDAV".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Basic realm=\"WebDAV\"")
        );
    }

    #[test]
    fn statuses_map_per_taxonomy() {
        assert_eq!(
            DavError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            DavError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DavError::BadRequest("bad ics".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DavError::MethodNotAllowed.into_response().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            DavError::Internal("boom".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn bad_request_body_is_empty() {
        let response = DavError::BadRequest("details stay server side".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_error_converts_to_internal() {
        let err: DavError = StoreError::Unavailable("down".to_string()).into();
        assert!(matches!(err, DavError::Internal(_)));
    }
}
