//! HTTP session construction
//!
//! One cookie jar shared by two transports: the regular one follows
//! redirects, the other stops at the first response so scraped pages that
//! bounce to a login screen are seen as-is.

use crate::{Result, config::Settings};
use reqwest::{
    Client, ClientBuilder, Proxy,
    cookie::{CookieStore, Jar},
    header::{ACCEPT, ACCEPT_CHARSET, HeaderMap, HeaderName, HeaderValue},
    redirect,
};
use std::sync::Arc;
use url::Url;

/// Cookie jar plus the transports reading from it
#[derive(Debug)]
pub struct HttpSession {
    jar: Arc<Jar>,
    client: Client,
    no_redirect_client: Client,
}

impl HttpSession {
    /// Build both transports from settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let jar = Arc::new(Jar::default());

        let client = base_builder(settings, jar.clone())?
            .build()
            .map_err(|e| crate::Error::config(format!("Failed to create HTTP client: {}", e)))?;

        let no_redirect_client = base_builder(settings, jar.clone())?
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| crate::Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            jar,
            client,
            no_redirect_client,
        })
    }

    /// Transport that follows redirects
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Transport that never follows redirects
    pub fn no_redirect_client(&self) -> &Client {
        &self.no_redirect_client
    }

    /// Install a raw `name=value` cookie for the given origin
    pub fn add_cookie(&mut self, name: &str, coded_value: &str, origin: &Url) {
        let cookie = format!("{}={}; Path=/", name, coded_value);
        self.jar.add_cookie_str(&cookie, origin);
    }

    /// Whether any cookie would be sent to `origin`
    pub fn has_cookies_for(&self, origin: &Url) -> bool {
        self.jar.cookies(origin).is_some()
    }
}

/// Headers sent with every request
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));
    headers.insert(
        HeaderName::from_static("keep-alive"),
        HeaderValue::from_static("true"),
    );
    headers
}

fn base_builder(settings: &Settings, jar: Arc<Jar>) -> Result<ClientBuilder> {
    let mut builder = Client::builder()
        .default_headers(default_headers())
        .user_agent(settings.api.user_agent.clone())
        .cookie_provider(jar);

    if let Some(timeout) = settings.api.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = settings.get_proxy_url() {
        let proxy = Proxy::all(&proxy_url).map_err(|e| {
            crate::Error::config(format!("Invalid proxy URL '{}': {}", proxy_url, e))
        })?;
        builder = builder.proxy(proxy);
    }

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers() {
        let headers = default_headers();
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[ACCEPT_CHARSET], "utf-8");
        assert_eq!(headers["keep-alive"], "true");
    }

    #[test]
    fn test_fresh_session_has_no_cookies() {
        let session = HttpSession::new(&Settings::default()).unwrap();
        let origin = Url::parse("https://www.humblebundle.com/").unwrap();
        assert!(!session.has_cookies_for(&origin));
    }

    #[test]
    fn test_added_cookie_is_scoped_to_origin() {
        let mut session = HttpSession::new(&Settings::default()).unwrap();
        let origin = Url::parse("https://www.humblebundle.com/").unwrap();
        session.add_cookie("_simpleauth_sess", "abc|1|sig", &origin);

        assert!(session.has_cookies_for(&origin));
        assert!(!session.has_cookies_for(&Url::parse("https://example.com/").unwrap()));
    }

    #[test]
    fn test_invalid_proxy_is_config_error() {
        let mut settings = Settings::default();
        settings.network.all_proxy = Some("::not a proxy::".to_string());
        assert!(matches!(
            HttpSession::new(&settings),
            Err(crate::Error::Config(_))
        ));
    }
}
