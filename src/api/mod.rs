//! # Authorized Humble API
//!
//! [`HumbleApi`] is the single entry point to the remote service. It owns
//! one [`HttpSession`] and exposes typed operations grouped by resource:
//!
//! - [`orders`]: order list and order details
//! - [`trove`]: trove chunks and the chunk stream
//! - [`subscription`]: subscription products and history streams
//! - [`webpack`]: JSON scraped from server-rendered pages
//! - [`download`]: the sign-then-redeem download workflow
//!
//! Every request goes through one internal helper, which resolves the path
//! against the configured authority, checks the status and logs failures
//! before handing them back. Nothing is cached or retried.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use humble_client::{HumbleApi, Settings, types::AuthCookie};
//!
//! # async fn example() -> humble_client::Result<()> {
//! let mut api = HumbleApi::new(&Settings::default())?;
//! let user_id = api.authenticate(&AuthCookie::session("eyJ1c2VyX2lkIjogMX0|1|sig"))?;
//!
//! if api.is_session_valid().await? {
//!     for gamekey in api.get_gamekeys().await? {
//!         println!("{}: {}", user_id, gamekey);
//!     }
//! }
//! api.close();
//! # Ok(())
//! # }
//! ```

pub mod download;
pub mod orders;
pub mod pagination;
pub mod subscription;
pub mod trove;
pub mod webpack;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    Error, Result,
    config::Settings,
    session::{HttpSession, coded_cookie_value, decode_user_id, normalize_cookie_value},
    types::AuthCookie,
};

pub use pagination::{Page, paginate};

/// Relative path of the order list, also used as the session probe
pub(crate) const ORDER_LIST_URL: &str = "api/v1/user/order";

/// Whether a request may follow redirects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Redirects {
    Follow,
    Stop,
}

/// Authorized client for the Humble web API
#[derive(Debug)]
pub struct HumbleApi {
    authority: Url,
    session: HttpSession,
}

impl HumbleApi {
    /// Create a client with a fresh, unauthenticated session
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let authority = settings.authority_url()?;
        let session = HttpSession::new(settings)?;
        tracing::debug!("Created Humble API client for {}", authority);
        Ok(Self { authority, session })
    }

    /// Base authority every path is resolved against
    pub fn authority(&self) -> &Url {
        &self.authority
    }

    /// Local check: does the jar hold any cookie for the authority
    pub fn is_authenticated(&self) -> bool {
        self.session.has_cookies_for(&self.authority)
    }

    /// Install the host-supplied session cookie and return the decoded user id
    ///
    /// The raw value is unescaped and stripped of quotes before use. The
    /// cookie is only installed once the user id decodes, so a malformed
    /// token leaves the session untouched.
    pub fn authenticate(&mut self, auth_cookie: &AuthCookie) -> Result<String> {
        let value = normalize_cookie_value(&auth_cookie.value)?;
        let user_id = decode_user_id(&value)?;

        self.session
            .add_cookie(&auth_cookie.name, &coded_cookie_value(&value), &self.authority);
        tracing::info!("Authenticated as user {}", user_id);

        Ok(user_id)
    }

    /// Ask the server whether the session is still accepted
    ///
    /// A 401 on the order list means "no"; any other failure is an error.
    pub async fn is_session_valid(&self) -> Result<bool> {
        let response = self
            .send(Method::GET, ORDER_LIST_URL, &[], Redirects::Follow)
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!("Session rejected by the server");
            return Ok(false);
        }

        check_status(response).map_err(logged)?;
        Ok(true)
    }

    /// Release the session and its transports
    pub fn close(self) {
        tracing::debug!("Closing Humble API session");
    }

    /// Resolve a relative path against the authority
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        Ok(self.authority.join(path)?)
    }

    /// Issue a request without interpreting the status
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        redirects: Redirects,
    ) -> Result<Response> {
        let url = self.url(path)?;
        tracing::debug!("{} {} {:?}", method, url, query);

        let client = match redirects {
            Redirects::Follow => self.session.client(),
            Redirects::Stop => self.session.no_redirect_client(),
        };

        client
            .request(method, url)
            .query(query)
            .send()
            .await
            .map_err(|e| logged(e.into()))
    }

    /// Issue a request and fail on 4xx/5xx
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Response> {
        let response = self.send(method, path, query, Redirects::Follow).await?;
        check_status(response).map_err(logged)
    }
}

/// Fail on 4xx/5xx with the classified error
pub(crate) fn check_status(response: Response) -> Result<Response> {
    response.error_for_status().map_err(Error::from)
}

/// Decode a JSON body; shape mismatches are backend contract violations
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(|e| logged(e.into()))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        logged(Error::unknown_backend_response(format!(
            "unexpected JSON body: {}",
            e
        )))
    })
}

/// Log an error on its way back to the caller
pub(crate) fn logged(err: Error) -> Error {
    tracing::error!("{}", err);
    err
}
