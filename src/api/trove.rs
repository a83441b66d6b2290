//! Trove catalog chunks

use futures_util::Stream;
use reqwest::Method;
use serde_json::Value;

use super::{HumbleApi, Page, logged, paginate, read_json};
use crate::{Error, Result};

/// Number of trove products the backend puts in one chunk
pub const TROVES_PER_CHUNK: usize = 20;

const TROVE_CHUNK_URL: &str = "api/v1/trove/chunk";

impl HumbleApi {
    /// One chunk of the trove catalog, most popular first
    ///
    /// An empty vector means the index is past the end of the catalog.
    pub async fn get_trove_chunk(&self, chunk_index: u32) -> Result<Vec<Value>> {
        let index = chunk_index.to_string();
        let response = self
            .request(
                Method::GET,
                TROVE_CHUNK_URL,
                &[
                    ("property", "popularity"),
                    ("direction", "desc"),
                    ("index", index.as_str()),
                ],
            )
            .await?;

        match read_json::<Value>(response).await? {
            Value::Array(items) => Ok(items),
            other => {
                tracing::debug!("chunk_details: {}", other);
                Err(logged(Error::unknown_backend_response(
                    "Unrecognized trove chunks structure",
                )))
            }
        }
    }

    /// Every trove product starting at `from_chunk`, fetched one chunk at a time
    pub fn get_trove_details(&self, from_chunk: u32) -> impl Stream<Item = Result<Value>> + '_ {
        paginate(from_chunk, move |index| self.trove_page(index))
    }

    async fn trove_page(&self, index: u32) -> Result<Page<Value, u32>> {
        let items = self.get_trove_chunk(index).await?;
        if items.is_empty() {
            tracing::debug!("No more chunk pages");
            return Ok(Page::End);
        }
        Ok(Page::Items {
            items,
            next: Some(index + 1),
        })
    }
}
