//! Download signing
//!
//! Getting a usable download URL takes two calls. The sign endpoint turns a
//! machine name and filename into time-limited URLs. The web client then
//! posts to a "redeem" endpoint whose purpose is undocumented; it looks
//! advisory, so its failure is logged and reported as [`RedeemStatus::Failed`]
//! but never fails the workflow.
//!
//! The two entry points disagree on what "filename" means to the sign
//! endpoint: subproduct downloads send the last path segment of the web link,
//! trove downloads send the web link unchanged.

use reqwest::Method;

use super::{HumbleApi, read_json};
use crate::{
    Error, Result,
    types::{DownloadStructItem, RedeemStatus, SignedDownload, SignedUrls, TroveDownload},
};

const DOWNLOAD_SIGN: &str = "api/v1/user/download/sign";
const REDEEM_DOWNLOAD: &str = "humbler/redeemdownload";

/// Exact body the redeem endpoint answers with on success
pub const REDEEM_SUCCESS_BODY: &[u8] = b"{'success': True}";

/// Last path segment of a download link, percent-decoded
pub fn filename_from_web_link(link: &str) -> String {
    let segment = match url::Url::parse(link) {
        Ok(url) => url
            .path_segments()
            .and_then(|segments| segments.last())
            .unwrap_or_default()
            .to_string(),
        Err(_) => {
            let path = link.split(['?', '#']).next().unwrap_or_default();
            path.rsplit('/').next().unwrap_or_default().to_string()
        }
    };

    urlencoding::decode(&segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(segment)
}

impl HumbleApi {
    /// Sign a download, returning its time-limited URLs
    pub async fn sign_download(&self, machine_name: &str, filename: &str) -> Result<SignedUrls> {
        let response = self
            .request(
                Method::POST,
                DOWNLOAD_SIGN,
                &[("machine_name", machine_name), ("filename", filename)],
            )
            .await?;
        read_json(response).await
    }

    /// Post the redeem call the web client issues after signing
    ///
    /// Succeeds only when the body is exactly [`REDEEM_SUCCESS_BODY`].
    pub async fn redeem_download(
        &self,
        download_machine_name: &str,
        extra: &[(&str, &str)],
    ) -> Result<()> {
        let mut params = vec![
            ("download", download_machine_name),
            ("download_page", "false"),
        ];
        params.extend_from_slice(extra);

        let response = self.request(Method::POST, REDEEM_DOWNLOAD, &params).await?;
        let body = response.bytes().await.map_err(Error::from)?;

        if body.as_ref() != REDEEM_SUCCESS_BODY {
            return Err(Error::unknown_backend_response(format!(
                "unexpected response while redeeming download: {}",
                String::from_utf8_lossy(&body)
            )));
        }
        Ok(())
    }

    /// Sign an order subproduct download, then redeem it
    pub async fn sign_url_subproduct(
        &self,
        download: &DownloadStructItem,
        download_machine_name: &str,
    ) -> Result<SignedDownload> {
        let web = download
            .web_link()
            .ok_or_else(|| Error::missing_web_link(download))?;
        let filename = filename_from_web_link(web);

        let urls = self.sign_download(download_machine_name, &filename).await?;
        let redeem = self
            .redeem_advisory(
                download_machine_name,
                &[("download_url_file", filename.as_str())],
            )
            .await;

        Ok(SignedDownload { urls, redeem })
    }

    /// Sign a trove download, then redeem it
    pub async fn sign_url_trove(
        &self,
        download: &TroveDownload,
        product_machine_name: &str,
    ) -> Result<SignedDownload> {
        let web = download
            .web_link()
            .ok_or_else(|| Error::missing_web_link(download))?;

        let urls = self.sign_download(&download.machine_name, web).await?;
        let redeem = self
            .redeem_advisory(&download.machine_name, &[("product", product_machine_name)])
            .await;

        Ok(SignedDownload { urls, redeem })
    }

    async fn redeem_advisory(&self, machine_name: &str, extra: &[(&str, &str)]) -> RedeemStatus {
        match self.redeem_download(machine_name, extra).await {
            Ok(()) => RedeemStatus::Redeemed,
            Err(e) => {
                tracing::error!("{:?}. Error ignored", e);
                RedeemStatus::Failed(e.to_string())
            }
        }
    }
}
