//! Client for the content processor, which serves content chunks.

use std::time::Duration;

use reqwest::Client;

use crate::error::AppError;
use crate::models::ContentChunk;

pub struct ContentProcessorClient {
    client: Client,
    base_url: String,
}

impl ContentProcessorClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("content processor http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch up to `limit` recent content chunks for seeding conversations.
    pub async fn fetch_chunks(&self, limit: i64) -> Result<Vec<ContentChunk>, AppError> {
        let url = format!("{}/api/chunks", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("content processor request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "content processor returned {}",
                response.status()
            )));
        }

        response
            .json::<Vec<ContentChunk>>()
            .await
            .map_err(|e| AppError::Upstream(format!("content processor parse failed: {e}")))
    }
}
