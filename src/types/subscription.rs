//! Subscription content records
//!
//! Thin typed wrappers around the JSON the subscription pages and history
//! endpoint return. Only the fields the client navigates by are typed; the
//! rest stays available as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the `previous_months` list of the subscription history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMonth {
    /// Machine name, e.g. `january_2020_choice`; also the history continuation token
    pub machine_name: String,
    #[serde(default)]
    pub human_name: Option<String>,
    /// Last element of the month's page URL, e.g. `january-2020`
    #[serde(default)]
    pub product_url_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChoiceMonth {
    /// Whether the month belongs to the Choice line (as opposed to Monthly)
    pub fn is_choice(&self) -> bool {
        self.machine_name.ends_with("_choice")
    }

    /// Path segment of the month's page, falling back to the machine name
    pub fn last_url_part(&self) -> &str {
        self.product_url_path
            .as_deref()
            .unwrap_or(&self.machine_name)
    }
}

impl TryFrom<Value> for ChoiceMonth {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            crate::Error::unknown_backend_response(format!("unrecognized previous month: {}", e))
        })
    }
}

/// Webpack data of a Choice month product page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceContentData {
    pub data: Value,
}

impl ChoiceContentData {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// The selectable games of the month, keyed by game id
    pub fn content_choice_options(&self) -> Option<&Value> {
        self.data.get("contentChoiceOptions")
    }

    /// Human title of the month
    pub fn title(&self) -> Option<&str> {
        self.content_choice_options()
            .and_then(|opts| opts.get("title"))
            .and_then(Value::as_str)
    }
}

/// Webpack data of a legacy Monthly product page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyContentData {
    pub data: Value,
}

impl MonthlyContentData {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// Product listing of the month
    pub fn product_data(&self) -> Option<&Value> {
        self.data.get("productData")
    }

    pub fn machine_name(&self) -> Option<&str> {
        self.product_data()
            .and_then(|p| p.get("machine_name"))
            .and_then(Value::as_str)
    }
}

/// The user's current subscription plan from the subscriber hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSubscriptionPlan {
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub human_name: Option<String>,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
