//! Webpack data scraping
//!
//! Several subscription pages have no REST counterpart; their data is
//! embedded in the HTML as a JSON script tag for client-side hydration:
//!
//! ```html
//! <script id="webpack-subscriber-hub-data" type="application/json">{...}</script>
//! ```
//!
//! [`extract_webpack_data`] finds the tag and decodes the first complete JSON
//! value after it. Whatever markup follows that value is ignored.

use reqwest::Method;
use serde_json::Value;

use super::{HumbleApi, Redirects, check_status, logged};
use crate::{
    Error, Result,
    types::{ChoiceContentData, MonthlyContentData, UserSubscriptionPlan},
};

const SUBSCRIPTION: &str = "subscription";
const SUBSCRIPTION_HOME: &str = "subscription/home";
const SUBSCRIPTION_TROVE: &str = "subscription/trove";

pub const SUBSCRIBER_HUB_WEBPACK_ID: &str = "webpack-subscriber-hub-data";
pub const MONTHLY_TROVE_WEBPACK_ID: &str = "webpack-monthly-trove-data";
pub const CHOICE_MARKETING_WEBPACK_ID: &str = "webpack-choice-marketing-data";
pub const MONTHLY_PRODUCT_WEBPACK_ID: &str = "webpack-monthly-product-data";

/// Decode the JSON payload embedded after the `webpack_id` script tag
pub fn extract_webpack_data(html: &str, webpack_id: &str) -> Result<Value> {
    let marker = format!(r#"<script id="{}" type="application/json">"#, webpack_id);

    let start = html.find(&marker).ok_or_else(|| {
        Error::unknown_backend_response(format!("webpack marker '{}' not found", webpack_id))
    })?;
    let candidate = html[start + marker.len()..].trim_start();

    match serde_json::Deserializer::from_str(candidate)
        .into_iter::<Value>()
        .next()
    {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(Error::unknown_backend_response(format!(
            "cannot parse webpack data: {}",
            e
        ))),
        None => Err(Error::unknown_backend_response(
            "cannot parse webpack data: nothing after marker",
        )),
    }
}

impl HumbleApi {
    /// Fetch `path` without following redirects and scrape its webpack data
    pub async fn get_webpack_data(&self, path: &str, webpack_id: &str) -> Result<Value> {
        let response = self
            .send(Method::GET, path, &[], Redirects::Stop)
            .await?;
        let text = check_status(response)
            .map_err(logged)?
            .text()
            .await
            .map_err(|e| logged(e.into()))?;

        extract_webpack_data(&text, webpack_id).map_err(logged)
    }

    /// Subscriber hub data (`subscription/home`)
    pub async fn get_subscriber_hub_data(&self) -> Result<Value> {
        self.get_webpack_data(SUBSCRIPTION_HOME, SUBSCRIBER_HUB_WEBPACK_ID)
            .await
    }

    /// Trove page data with `newlyAdded` and `standardProducts`
    ///
    /// `standardProducts` matches trove chunk 0, though it does not always
    /// include the newly added games.
    pub async fn get_monthly_trove_data(&self) -> Result<Value> {
        self.get_webpack_data(SUBSCRIPTION_TROVE, MONTHLY_TROVE_WEBPACK_ID)
            .await
    }

    /// Choice marketing page data
    pub async fn get_choice_marketing_data(&self) -> Result<Value> {
        self.get_webpack_data(SUBSCRIPTION, CHOICE_MARKETING_WEBPACK_ID)
            .await
    }

    /// Content of one Choice month, e.g. `february-2020`
    pub async fn get_choice_content_data(&self, product_url_path: &str) -> Result<ChoiceContentData> {
        let path = format!("{}/{}", SUBSCRIPTION, product_url_path);
        let data = self
            .get_webpack_data(&path, MONTHLY_PRODUCT_WEBPACK_ID)
            .await?;
        Ok(ChoiceContentData::new(data))
    }

    /// Content of one legacy Monthly month, e.g. `august_2019_monthly`
    pub async fn get_monthly_content_data(
        &self,
        product_url_path: &str,
    ) -> Result<MonthlyContentData> {
        let path = format!("monthly/p/{}", product_url_path);
        let data = self
            .get_webpack_data(&path, MONTHLY_PRODUCT_WEBPACK_ID)
            .await?;
        Ok(MonthlyContentData::new(data))
    }

    /// The user's subscription plan, if the hub page exposes one
    ///
    /// An unrecognized hub page or a missing plan yields `None`; transport
    /// errors still fail.
    pub async fn get_subscription_plan(&self) -> Result<Option<UserSubscriptionPlan>> {
        let hub = match self.get_subscriber_hub_data().await {
            Ok(hub) => hub,
            Err(e @ Error::UnknownBackendResponse(_)) => {
                tracing::warn!("Can't fetch userSubscriptionPlan details. {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let Some(plan) = hub.get("userSubscriptionPlan").filter(|p| !p.is_null()) else {
            tracing::warn!("Can't fetch userSubscriptionPlan details. Key not found");
            return Ok(None);
        };

        match serde_json::from_value(plan.clone()) {
            Ok(plan) => Ok(Some(plan)),
            Err(e) => {
                tracing::warn!("Can't fetch userSubscriptionPlan details. {}", e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_extracts_json_after_marker() {
        let html = r#"<html><script id="webpack-x" type="application/json">{"a":1}</script></html>"#;
        assert_eq!(extract_webpack_data(html, "webpack-x").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_skips_whitespace_and_ignores_trailing_markup() {
        let html = "<script id=\"webpack-x\" type=\"application/json\">\n   [1, {\"b\": \"</script>\"}]\n</script><div>{not json</div>";
        assert_eq!(
            extract_webpack_data(html, "webpack-x").unwrap(),
            json!([1, {"b": "</script>"}])
        );
    }

    #[test]
    fn test_picks_the_requested_marker() {
        let html = concat!(
            r#"<script id="webpack-a" type="application/json">{"page":"a"}</script>"#,
            r#"<script id="webpack-b" type="application/json">{"page":"b"}</script>"#,
        );
        assert_eq!(extract_webpack_data(html, "webpack-b").unwrap(), json!({"page": "b"}));
    }

    #[test]
    fn test_missing_marker_is_unknown_backend_response() {
        let err = extract_webpack_data("<html></html>", "webpack-x").unwrap_err();
        assert!(matches!(err, Error::UnknownBackendResponse(_)));
    }

    #[test]
    fn test_invalid_json_is_unknown_backend_response() {
        let html = r#"<script id="webpack-x" type="application/json">{"a": </script>"#;
        let err = extract_webpack_data(html, "webpack-x").unwrap_err();
        assert!(matches!(err, Error::UnknownBackendResponse(_)));

        let html = r#"<script id="webpack-x" type="application/json"></script>"#;
        assert!(extract_webpack_data(html, "webpack-x").is_err());
    }

    #[test]
    fn test_empty_after_marker() {
        let html = r#"<script id="webpack-x" type="application/json">   "#;
        let err = extract_webpack_data(html, "webpack-x").unwrap_err();
        assert!(err.to_string().contains("nothing after marker"));
    }
}
