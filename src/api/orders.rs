//! Order list and order details

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use super::{HumbleApi, ORDER_LIST_URL, read_json};
use crate::Result;

const ORDER_URL: &str = "api/v1/order/";

#[derive(Debug, Deserialize)]
struct OrderSummary {
    gamekey: String,
}

impl HumbleApi {
    /// Gamekeys of every order the user owns
    pub async fn get_gamekeys(&self) -> Result<Vec<String>> {
        let response = self.request(Method::GET, ORDER_LIST_URL, &[]).await?;
        let orders: Vec<OrderSummary> = read_json(response).await?;

        let gamekeys: Vec<String> = orders.into_iter().map(|o| o.gamekey).collect();
        tracing::info!("The order list: {:?}", gamekeys);
        Ok(gamekeys)
    }

    /// Full order JSON including every download key
    pub async fn get_order_details(&self, gamekey: &str) -> Result<Value> {
        let path = format!("{}{}", ORDER_URL, gamekey);
        let response = self
            .request(Method::GET, &path, &[("all_tpkds", "true")])
            .await?;
        read_json(response).await
    }
}
