//! Download record definitions
//!
//! Records identifying a downloadable asset as they appear in order details
//! and trove listings, plus the signed URLs returned by the sign endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Links to one downloadable file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadUrls {
    /// Direct web link
    #[serde(default)]
    pub web: Option<String>,
    /// Torrent link
    #[serde(default)]
    pub bittorrent: Option<String>,
}

/// One file entry of an order subproduct's `download_struct`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadStructItem {
    /// Display name ("Download", "64-bit", ...)
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: DownloadUrls,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub human_size: Option<String>,
}

impl DownloadStructItem {
    /// Item with just a web link, mostly useful in tests and tools
    pub fn with_web(web: impl Into<String>) -> Self {
        Self {
            url: DownloadUrls {
                web: Some(web.into()),
                bittorrent: None,
            },
            ..Default::default()
        }
    }

    /// The web link, if present and non-empty
    pub fn web_link(&self) -> Option<&str> {
        non_empty(self.url.web.as_deref())
    }
}

/// One platform entry of a trove product's `downloads`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TroveDownload {
    /// Machine name of this download, used when signing
    pub machine_name: String,
    #[serde(default)]
    pub url: DownloadUrls,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub human_size: Option<String>,
    /// Upload time as reported by the backend (epoch seconds)
    #[serde(default)]
    pub uploaded_at: Option<i64>,
}

impl TroveDownload {
    /// Download with a machine name and web link
    pub fn new(machine_name: impl Into<String>, web: impl Into<String>) -> Self {
        Self {
            machine_name: machine_name.into(),
            url: DownloadUrls {
                web: Some(web.into()),
                bittorrent: None,
            },
            ..Default::default()
        }
    }

    /// The web link, if present and non-empty
    pub fn web_link(&self) -> Option<&str> {
        non_empty(self.url.web.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Signed URLs returned by the download sign endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignedUrls {
    /// Time-limited direct download URL
    #[serde(default)]
    pub signed_url: Option<String>,
    /// Time-limited torrent URL
    #[serde(default)]
    pub signed_torrent_url: Option<String>,
    /// Any other fields the backend includes
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outcome of the advisory redeem step that follows signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum RedeemStatus {
    /// The backend acknowledged the redeem call
    Redeemed,
    /// The redeem call failed; the signed URLs are still usable
    Failed(String),
}

/// Result of a sign-and-redeem workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignedDownload {
    /// URLs returned by the sign endpoint
    pub urls: SignedUrls,
    /// Side-channel diagnostic of the redeem step
    pub redeem: RedeemStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_download_struct_item_from_order_json() {
        let item: DownloadStructItem = serde_json::from_value(json!({
            "name": "Download",
            "url": {
                "web": "https://dl.humble.com/game_setup.exe?gamekey=abc&ttl=1",
                "bittorrent": "https://dl.humble.com/torrents/game_setup.exe.torrent"
            },
            "md5": "d41d8cd98f00b204e9800998ecf8427e",
            "file_size": 1024,
            "human_size": "1 KB"
        }))
        .unwrap();

        assert_eq!(
            item.web_link(),
            Some("https://dl.humble.com/game_setup.exe?gamekey=abc&ttl=1")
        );
        assert_eq!(item.file_size, Some(1024));
    }

    #[test]
    fn test_empty_web_link_is_absent() {
        let item = DownloadStructItem::with_web("");
        assert_eq!(item.web_link(), None);

        let item = DownloadStructItem::default();
        assert_eq!(item.web_link(), None);
    }

    #[test]
    fn test_trove_download_from_json() {
        let download: TroveDownload = serde_json::from_value(json!({
            "machine_name": "shadowrun_windows",
            "url": {"web": "shadowrun.zip"},
            "uploaded_at": 1582023840
        }))
        .unwrap();

        assert_eq!(download.machine_name, "shadowrun_windows");
        assert_eq!(download.web_link(), Some("shadowrun.zip"));
    }

    #[test]
    fn test_signed_urls_keep_unknown_fields() {
        let urls: SignedUrls = serde_json::from_value(json!({
            "signed_url": "https://dl.humble.com/a?t=1",
            "signed_torrent_url": null,
            "expires": 3600
        }))
        .unwrap();

        assert_eq!(urls.signed_url.as_deref(), Some("https://dl.humble.com/a?t=1"));
        assert_eq!(urls.signed_torrent_url, None);
        assert_eq!(urls.extra.get("expires"), Some(&json!(3600)));
    }

    #[test]
    fn test_redeem_status_serialization() {
        let json = serde_json::to_value(RedeemStatus::Failed("boom".into())).unwrap();
        assert_eq!(json, json!({"status": "failed", "reason": "boom"}));

        let json = serde_json::to_value(RedeemStatus::Redeemed).unwrap();
        assert_eq!(json, json!({"status": "redeemed"}));
    }
}
