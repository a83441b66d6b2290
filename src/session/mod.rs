//! Session management for the Humble client
//!
//! This module owns the authenticated HTTP session: the cookie jar, the
//! transports reading from it, and the handling of the host-supplied auth cookie.

pub mod cookie;
pub mod network;

pub use cookie::{coded_cookie_value, decode_user_id, normalize_cookie_value};
pub use network::{HttpSession, default_headers};
