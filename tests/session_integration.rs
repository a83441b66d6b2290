//! Session integration tests
//!
//! Authentication and session validity against a mocked backend.

mod common;

use common::helpers::{create_authenticated_api, create_test_api};
use humble_client::{AuthCookie, Error};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, header_regex, method, path},
};

#[tokio::test]
async fn test_authenticated_requests_carry_session_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user/order"))
        // `=` padding is outside the cookie token set, so the value goes out quoted
        .and(header(
            "cookie",
            r#"_simpleauth_sess="eyJ1c2VyX2lkIjogMX0=|1580000000|abcdef""#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_authenticated_api(&server);
    assert!(api.is_authenticated());
    assert!(api.is_session_valid().await.unwrap());
}

#[tokio::test]
async fn test_unpadded_cookie_is_sent_unquoted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user/order"))
        .and(header("cookie", "_simpleauth_sess=eyJ1c2VyX2lkIjogMX0|1580000000|abcdef"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut api = create_test_api(&server);
    api.authenticate(&AuthCookie::session("eyJ1c2VyX2lkIjogMX0|1580000000|abcdef"))
        .unwrap();
    assert!(api.is_session_valid().await.unwrap());
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user/order"))
        .and(header("accept", "application/json"))
        .and(header("accept-charset", "utf-8"))
        .and(header_regex("user-agent", "HumbleBundle plugin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_test_api(&server);
    assert!(api.is_session_valid().await.unwrap());
}

#[tokio::test]
async fn test_unauthorized_session_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user/order"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let api = create_authenticated_api(&server);
    assert!(!api.is_session_valid().await.unwrap());
}

#[tokio::test]
async fn test_session_probe_propagates_other_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user/order"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = create_authenticated_api(&server);
    let err = api.is_session_valid().await.unwrap_err();
    assert!(matches!(err, Error::BackendNotAvailable { status: 500 }));
}

#[tokio::test]
async fn test_authenticate_with_escaped_cookie() {
    let server = MockServer::start().await;
    let mut api = create_test_api(&server);

    // Browsers export the value with its quotes and `=` escaped as octal
    let cookie = AuthCookie::session(r#""eyJ1c2VyX2lkIjogMX0\075|1580000000|abcdef""#);
    assert_eq!(api.authenticate(&cookie).unwrap(), "1");
    assert!(api.is_authenticated());
}

#[tokio::test]
async fn test_failed_authentication_keeps_session_empty() {
    let server = MockServer::start().await;
    let mut api = create_test_api(&server);

    let err = api
        .authenticate(&AuthCookie::session("bm90IGpzb24|1|sig"))
        .unwrap_err();
    assert!(matches!(err, Error::CookieDecode(_)));
    assert!(!api.is_authenticated());
}

#[tokio::test]
async fn test_close_consumes_client() {
    let server = MockServer::start().await;
    let api = create_authenticated_api(&server);
    api.close();
}
