//! Per-method DAV handlers
//!
//! Each handler is a pure-ish function over (route, authenticated user,
//! state); the dispatcher owns authentication and method routing.

mod propfind;
mod report;
mod resources;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

pub use propfind::{Depth, propfind};
pub use report::report;
pub use resources::{delete, get, put};

use crate::xml::Multistatus;

pub(crate) const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Wrap an assembled multistatus into the 207 response
pub(crate) fn multistatus_response(ms: &Multistatus) -> Response {
    (
        StatusCode::MULTI_STATUS,
        [(header::CONTENT_TYPE, XML_CONTENT_TYPE)],
        ms.to_xml(),
    )
        .into_response()
}
