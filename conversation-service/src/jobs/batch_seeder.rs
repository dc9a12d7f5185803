//! Batch conversation seeding job.
//!
//! Pulls content chunks from the content processor and creates one
//! conversation per chunk, each opened by an AI message that references its
//! source chunk. Runs on a spawned task; the request that scheduled it has
//! already been answered, so failures are logged and dropped.

use std::sync::Arc;
use std::time::Instant;

use sqlx::PgPool;

use crate::config::RankingConfig;
use crate::metrics;
use crate::services::{ContentProcessorClient, ConversationService};

pub async fn seed_conversations(
    db: PgPool,
    content_processor: Arc<ContentProcessorClient>,
    ranking: RankingConfig,
    user_id: i64,
    num_convos: i64,
) {
    let started = Instant::now();

    let chunks = match content_processor.fetch_chunks(num_convos).await {
        Ok(chunks) => chunks,
        Err(e) => {
            tracing::error!(user_id, error = %e, "batch seeding aborted: chunk fetch failed");
            return;
        }
    };

    if chunks.is_empty() {
        tracing::warn!(user_id, "batch seeding found no content chunks");
        return;
    }

    let service = ConversationService::new(db, ranking);
    let mut created = 0u64;

    for chunk in chunks.into_iter().take(num_convos as usize) {
        match service.create_seeded(user_id, &chunk).await {
            Ok(conversation) => {
                created += 1;
                metrics::CONVERSATIONS_CREATED_TOTAL
                    .with_label_values(&["batch"])
                    .inc();
                tracing::debug!(
                    user_id,
                    conversation_id = conversation.id,
                    content_chunk_id = chunk.id,
                    "seeded conversation"
                );
            }
            Err(e) => {
                tracing::error!(user_id, content_chunk_id = chunk.id, error = %e, "failed to seed conversation");
            }
        }
    }

    tracing::info!(
        user_id,
        created,
        duration_ms = started.elapsed().as_millis() as u64,
        "batch conversation seeding finished"
    );
}
