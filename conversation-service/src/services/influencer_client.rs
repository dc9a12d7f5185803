//! Client for the influencer service, which generates AI replies.
//!
//! Reply generation itself lives downstream; this service only fires the
//! trigger. Triggers are sent on a spawned task and failures are logged,
//! never surfaced to the request that caused them.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Serialize)]
struct ReplyTrigger<'a> {
    conversation_id: i64,
    user_id: i64,
    message: &'a str,
}

pub struct InfluencerClient {
    client: Client,
    base_url: String,
}

impl InfluencerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("influencer http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn trigger_reply(
        &self,
        conversation_id: i64,
        user_id: i64,
        message: &str,
    ) -> Result<(), AppError> {
        let url = format!("{}/api/replies", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ReplyTrigger {
                conversation_id,
                user_id,
                message,
            })
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("influencer request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "influencer returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Fire-and-forget variant used by the request handlers.
    pub fn spawn_trigger(self: &Arc<Self>, conversation_id: i64, user_id: i64, message: String) {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = client
                .trigger_reply(conversation_id, user_id, &message)
                .await
            {
                tracing::warn!(conversation_id, error = %e, "ai reply trigger failed");
            }
        });
    }
}
