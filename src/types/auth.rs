//! Authentication input supplied by the host

use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the Humble session
pub const SESSION_COOKIE_NAME: &str = "_simpleauth_sess";

/// A cookie as handed over by the host environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCookie {
    pub name: String,
    /// Raw value; may still be quoted and contain backslash escapes
    pub value: String,
}

impl AuthCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Session cookie with the standard name
    pub fn session(value: impl Into<String>) -> Self {
        Self::new(SESSION_COOKIE_NAME, value)
    }
}
