//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

/// Test helper functions
pub mod helpers {
    use humble_client::{AuthCookie, HumbleApi, config::Settings};
    use wiremock::MockServer;

    /// Raw cookie value as a browser stores it; the payload is `{"user_id": 1}`
    pub const QUOTED_SESSION: &str = "\"eyJ1c2VyX2lkIjogMX0=|1580000000|abcdef\"";

    /// Unquoted form of [`QUOTED_SESSION`]
    pub const SESSION: &str = "eyJ1c2VyX2lkIjogMX0=|1580000000|abcdef";

    /// Settings pointing at the mock server
    pub fn create_test_settings(server: &MockServer) -> Settings {
        Settings::with_authority(server.uri())
    }

    /// Unauthenticated client talking to the mock server
    pub fn create_test_api(server: &MockServer) -> HumbleApi {
        HumbleApi::new(&create_test_settings(server)).unwrap()
    }

    /// Authenticated client talking to the mock server
    pub fn create_authenticated_api(server: &MockServer) -> HumbleApi {
        let mut api = create_test_api(server);
        api.authenticate(&AuthCookie::session(QUOTED_SESSION))
            .unwrap();
        api
    }

    /// HTML page embedding `data` under the given webpack id
    pub fn webpack_page(webpack_id: &str, data: &serde_json::Value) -> String {
        format!(
            "<html><head></head><body>\n<script id=\"{}\" type=\"application/json\">\n  {}\n</script>\n<div id=\"site-xcom\"></div></body></html>",
            webpack_id, data
        )
    }
}
