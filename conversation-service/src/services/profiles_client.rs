//! Client for the profiles service, which holds AI persona metadata.

use std::time::Duration;

use reqwest::Client;

use crate::error::AppError;
use crate::models::AiProfile;

pub struct ProfilesClient {
    client: Client,
    base_url: String,
}

impl ProfilesClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("profiles http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// AI persona attached to a content item.
    pub async fn fetch_profile(&self, content_id: i64) -> Result<AiProfile, AppError> {
        let url = format!("{}/api/profiles/{}", self.base_url, content_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("profiles request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "profiles returned {}",
                response.status()
            )));
        }

        response
            .json::<AiProfile>()
            .await
            .map_err(|e| AppError::Upstream(format!("profiles parse failed: {e}")))
    }
}
