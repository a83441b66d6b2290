//! Type definitions for the Humble client
//!
//! This module contains the data-transfer records exchanged with the remote service.

pub mod auth;
pub mod download;
pub mod subscription;

pub use auth::{AuthCookie, SESSION_COOKIE_NAME};
pub use download::{
    DownloadStructItem, DownloadUrls, RedeemStatus, SignedDownload, SignedUrls, TroveDownload,
};
pub use subscription::{ChoiceContentData, ChoiceMonth, MonthlyContentData, UserSubscriptionPlan};
