//! Command definitions and execution

use clap::{Subcommand, ValueEnum};
use futures_util::{Stream, StreamExt, TryStreamExt};
use serde::Serialize;
use serde_json::{Value, json};

use crate::{
    HumbleApi, Result,
    types::{DownloadStructItem, TroveDownload},
};

/// What to ask the service for
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the authenticated user and whether the server accepts the session
    Whoami,
    /// List the gamekeys of every order
    Orders,
    /// Show one order with all download keys
    Order {
        /// Gamekey from `orders`
        gamekey: String,
    },
    /// List trove products
    Trove {
        /// Chunk index to start from
        #[arg(long, default_value_t = 0)]
        from_chunk: u32,
        /// Stop after this many products
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List subscription products, newest first
    Subscriptions {
        /// Stop after this many products
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List the months preceding a subscription product
    History {
        /// Machine name of the month to start before, e.g. `february_2020_choice`
        from_product: String,
        /// Stop after this many months
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the current subscription plan
    Plan,
    /// Dump the webpack data of a subscription page
    Webpack {
        #[arg(value_enum)]
        page: WebpackPage,
    },
    /// Dump the content of a Choice month, e.g. `february-2020`
    Choice { product_url_path: String },
    /// Dump the content of a legacy Monthly month, e.g. `august_2019_monthly`
    Monthly { product_url_path: String },
    /// Sign an order download (filename taken from the link's last segment)
    SignSubproduct {
        /// Machine name of the download
        machine_name: String,
        /// Web link from the order's download struct
        web_link: String,
    },
    /// Sign a trove download (link sent as the filename)
    SignTrove {
        /// Machine name of the trove download
        machine_name: String,
        /// Web link from the trove download
        web_link: String,
        /// Machine name of the trove product
        product: String,
    },
}

/// Pages with scrapeable webpack data
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WebpackPage {
    /// Subscriber hub (`subscription/home`)
    Hub,
    /// Monthly trove page (`subscription/trove`)
    Trove,
    /// Choice marketing page (`subscription`)
    ChoiceMarketing,
}

/// Run one command and return its JSON output
pub async fn run_command(
    api: &HumbleApi,
    user_id: Option<&str>,
    command: &Command,
) -> Result<Value> {
    let output = match command {
        Command::Whoami => json!({
            "user_id": user_id,
            "authenticated": api.is_authenticated(),
            "session_valid": api.is_session_valid().await?,
        }),
        Command::Orders => to_json(api.get_gamekeys().await?)?,
        Command::Order { gamekey } => api.get_order_details(gamekey).await?,
        Command::Trove { from_chunk, limit } => {
            to_json(collect_limited(api.get_trove_details(*from_chunk), *limit).await?)?
        }
        Command::Subscriptions { limit } => to_json(
            collect_limited(api.get_subscription_products_with_gamekeys(), *limit).await?,
        )?,
        Command::History {
            from_product,
            limit,
        } => to_json(
            collect_limited(
                api.get_previous_subscription_months(from_product.clone()),
                *limit,
            )
            .await?,
        )?,
        Command::Plan => to_json(api.get_subscription_plan().await?)?,
        Command::Webpack { page } => match page {
            WebpackPage::Hub => api.get_subscriber_hub_data().await?,
            WebpackPage::Trove => api.get_monthly_trove_data().await?,
            WebpackPage::ChoiceMarketing => api.get_choice_marketing_data().await?,
        },
        Command::Choice { product_url_path } => {
            to_json(api.get_choice_content_data(product_url_path).await?)?
        }
        Command::Monthly { product_url_path } => {
            to_json(api.get_monthly_content_data(product_url_path).await?)?
        }
        Command::SignSubproduct {
            machine_name,
            web_link,
        } => {
            let download = DownloadStructItem::with_web(web_link);
            to_json(api.sign_url_subproduct(&download, machine_name).await?)?
        }
        Command::SignTrove {
            machine_name,
            web_link,
            product,
        } => {
            let download = TroveDownload::new(machine_name, web_link);
            to_json(api.sign_url_trove(&download, product).await?)?
        }
    };

    Ok(output)
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

async fn collect_limited<T, S>(stream: S, limit: Option<usize>) -> Result<Vec<T>>
where
    S: Stream<Item = Result<T>>,
{
    stream.take(limit.unwrap_or(usize::MAX)).try_collect().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[tokio::test]
    async fn test_collect_limited_stops_early() {
        let items = stream::iter((0..10).map(Ok::<_, crate::Error>));
        let collected = collect_limited(items, Some(3)).await.unwrap();
        assert_eq!(collected, vec![0, 1, 2]);
    }

    #[test]
    fn test_collect_limited_without_limit() {
        let items = stream::iter((0..4).map(Ok::<_, crate::Error>));
        let collected = tokio_test::block_on(collect_limited(items, None)).unwrap();
        assert_eq!(collected.len(), 4);
    }

    #[test]
    fn test_webpack_page_names() {
        assert_eq!(
            WebpackPage::from_str("choice-marketing", false).unwrap(),
            WebpackPage::ChoiceMarketing
        );
        assert_eq!(WebpackPage::from_str("hub", false).unwrap(), WebpackPage::Hub);
        assert!(WebpackPage::from_str("home", false).is_err());
    }
}
