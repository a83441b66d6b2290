//! Subscription products and history
//!
//! Both endpoints page backwards in time. Products are keyed by an opaque
//! cursor returned with each page; history is keyed by the machine name of
//! the last month already seen.

use futures_util::Stream;
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::{HumbleApi, Page, Redirects, check_status, logged, paginate, read_json};
use crate::{Result, types::ChoiceMonth};

const SUBSCRIPTION_PRODUCTS: &str =
    "api/v1/subscriptions/humble_monthly/subscription_products_with_gamekeys";
const SUBSCRIPTION_HISTORY: &str = "api/v1/subscriptions/humble_monthly/history";

#[derive(Debug, Deserialize)]
struct ProductsPage {
    products: Vec<Value>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryPage {
    #[serde(default)]
    previous_months: Option<Vec<Value>>,
}

impl HumbleApi {
    /// Subscription products, newest first, going back to the first Monthly
    ///
    /// Each product carries only a few representative games. For Choice
    /// months a `gamekey` means the user unlocked the month; for Monthly a
    /// `download_url` means the user was subscribed.
    pub fn get_subscription_products_with_gamekeys(
        &self,
    ) -> impl Stream<Item = Result<Value>> + '_ {
        self.subscription_products_from(String::new())
    }

    /// Subscription products starting at a given cursor
    pub fn subscription_products_from(
        &self,
        cursor: String,
    ) -> impl Stream<Item = Result<Value>> + '_ {
        paginate(cursor, move |cursor| self.subscription_products_page(cursor))
    }

    async fn subscription_products_page(&self, cursor: String) -> Result<Page<Value, String>> {
        let path = format!("{}/{}", SUBSCRIPTION_PRODUCTS, cursor);
        let response = self
            .send(Method::GET, &path, &[], Redirects::Follow)
            .await?;

        // The product line history ends with a 404 (Monthly, November 2015)
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("No more subscription products after cursor {:?}", cursor);
            return Ok(Page::End);
        }

        let page: ProductsPage = read_json(check_status(response).map_err(logged)?).await?;
        Ok(Page::Items {
            items: page.products,
            next: page.cursor,
        })
    }

    /// Marketing data of the months preceding `from_product`
    ///
    /// `from_product` is the machine name of the month following the requested
    /// ones, e.g. `february_2020_choice`. The response is returned unchecked.
    pub async fn get_subscription_history(&self, from_product: &str) -> Result<Response> {
        self.send(
            Method::GET,
            SUBSCRIPTION_HISTORY,
            &[("from_product", from_product)],
            Redirects::Follow,
        )
        .await
    }

    /// Every month preceding `from_product`, walking the history backwards
    pub fn get_previous_subscription_months(
        &self,
        from_product: String,
    ) -> impl Stream<Item = Result<ChoiceMonth>> + '_ {
        paginate(from_product, move |from| self.previous_months_page(from))
    }

    async fn previous_months_page(&self, from_product: String) -> Result<Page<ChoiceMonth, String>> {
        let response = self.get_subscription_history(&from_product).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Page::End);
        }

        let page: HistoryPage = read_json(check_status(response).map_err(logged)?).await?;
        // Missing, null and empty all mean there is nothing older
        let previous_months = match page.previous_months {
            Some(months) if !months.is_empty() => months,
            _ => return Ok(Page::End),
        };

        let months = previous_months
            .into_iter()
            .map(ChoiceMonth::try_from)
            .collect::<Result<Vec<_>>>()?;
        let next = months.last().map(|month| month.machine_name.clone());

        Ok(Page::Items {
            items: months,
            next,
        })
    }
}
