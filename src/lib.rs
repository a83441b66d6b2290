//! Humble Client - Rust Implementation
//!
//! An authorized client for the Humble Bundle web API. The service has no
//! public contract: some data comes from JSON endpoints, some is scraped from
//! JSON embedded in server-rendered pages.
//!
//! # Architecture
//!
//! - **Session**: one cookie jar shared by every request, filled once from
//!   the host-supplied auth cookie
//! - **Fetchers**: typed calls for orders, trove chunks and download signing
//! - **Webpack scraper**: JSON extraction from subscription pages
//! - **Pagination**: lazy streams over cursor, history and index paged resources
//! - **Download workflow**: sign a download, then redeem it best-effort
//!
//! # Usage
//!
//! ```bash
//! HUMBLE_AUTH_COOKIE='"eyJ1c2VyX2lkIjog...|1580000000|..."' humble orders
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use futures_util::TryStreamExt;
//! use humble_client::{HumbleApi, Settings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = HumbleApi::new(&Settings::default())?;
//! let products: Vec<_> = api.get_trove_details(0).try_collect().await?;
//! println!("{} trove products", products.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use api::HumbleApi;
pub use config::Settings;
pub use error::{Error, Result};
pub use types::AuthCookie;
