//! CalDAV/CardDAV server surface for the Haven workspace portal
//!
//! Exposes the portal's calendars and address books to standard sync
//! clients over PROPFIND/REPORT/GET/PUT/DELETE. The subsystem keeps no
//! state of its own beyond the backing store: one request, one unit of
//! work, one store commit per mutation.

pub mod codec;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod path;
pub mod props;
pub mod routes;
pub mod state;
pub mod xml;

pub use dispatch::{ALLOWED_METHODS, DAV_CAPABILITIES};
pub use error::DavError;
pub use path::DavPath;
pub use routes::create_router;
pub use state::AppState;
