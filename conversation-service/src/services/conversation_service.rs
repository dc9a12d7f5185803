//! Conversation business logic: creation, scored paging, refresh, shuffle,
//! replies and deletion. Handlers stay thin; every database touch goes
//! through the repositories. Flows that write more than one row run inside a
//! single transaction, so a mid-flow failure rolls back to a clean state.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::config::RankingConfig;
use crate::db::{conversation_repo, message_repo};
use crate::error::{AppError, Result};
use crate::models::{Conversation, ContentChunk, Message, SENDER_AI, SENDER_USER};
use crate::ranking::{cursor, score, Cursor};

/// One page of the scored feed.
pub struct ConversationPage {
    pub conversations: Vec<Conversation>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

pub struct ConversationService {
    db: PgPool,
    ranking: RankingConfig,
}

impl ConversationService {
    pub fn new(db: PgPool, ranking: RankingConfig) -> Self {
        Self { db, ranking }
    }

    /// Create a conversation, optionally with an opening user message.
    /// The insert, opening message and initial score land atomically.
    pub async fn create(
        &self,
        user_id: i64,
        content_id: i64,
        content_chunk_id: Option<i64>,
        message: Option<&str>,
    ) -> Result<Conversation> {
        let mut tx = self.db.begin().await?;
        let conversation = conversation_repo::insert(&mut *tx, user_id, content_id).await?;

        if let Some(text) = message {
            message_repo::insert(
                &mut *tx,
                conversation.id,
                SENDER_USER,
                content_chunk_id,
                text,
            )
            .await?;
        }

        let conversation = self.refresh_one(&mut tx, conversation.id).await?;
        tx.commit().await?;
        Ok(conversation)
    }

    /// Create a conversation seeded with an opening AI message taken from a
    /// content chunk; used by the batch seeding job.
    pub async fn create_seeded(&self, user_id: i64, chunk: &ContentChunk) -> Result<Conversation> {
        let mut tx = self.db.begin().await?;
        let conversation = conversation_repo::insert(&mut *tx, user_id, chunk.content_id).await?;
        message_repo::insert(
            &mut *tx,
            conversation.id,
            SENDER_AI,
            Some(chunk.id),
            &chunk.text,
        )
        .await?;
        let conversation = self.refresh_one(&mut tx, conversation.id).await?;
        tx.commit().await?;
        Ok(conversation)
    }

    /// One page of a user's conversations in `(score DESC, id DESC)` order.
    /// Fetches `limit + 1` rows so `has_more` is exact without a count query.
    pub async fn page(
        &self,
        user_id: i64,
        limit: i64,
        cursor: Option<Cursor>,
    ) -> Result<ConversationPage> {
        let mut rows =
            conversation_repo::page_by_score(&self.db, user_id, cursor.as_ref(), limit + 1).await?;

        let has_more = rows.len() as i64 > limit;
        rows.truncate(limit as usize);

        let next_cursor = if has_more {
            rows.last().map(|c| {
                cursor::encode(&Cursor {
                    score: c.score,
                    id: c.id,
                    last_update: c.last_update,
                })
            })
        } else {
            None
        };

        Ok(ConversationPage {
            conversations: rows,
            next_cursor,
            has_more,
        })
    }

    /// A random sample of a user's conversations, never paginated.
    pub async fn random_page(&self, user_id: i64, limit: i64) -> Result<Vec<Conversation>> {
        Ok(conversation_repo::random_for_user(&self.db, user_id, limit).await?)
    }

    /// Recompute every stored score for a user from current messages and age.
    /// `last_update` is left alone; a refresh is not a mutation of content.
    pub async fn refresh_scores(&self, user_id: i64) -> Result<u64> {
        let inputs = conversation_repo::score_inputs_for_user(&self.db, user_id).await?;
        if inputs.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut rng = rand::thread_rng();
        let mut ids = Vec::with_capacity(inputs.len());
        let mut scores = Vec::with_capacity(inputs.len());
        for input in &inputs {
            ids.push(input.id);
            scores.push(score::score(
                input.total_chars,
                age_hours(input.start_date, now),
                self.ranking.randomness_factor,
                &mut rng,
            ));
        }

        Ok(conversation_repo::bulk_update_scores(&self.db, &ids, &scores).await?)
    }

    /// Bulk re-randomization of a user's scores for feed diversity.
    pub async fn shuffle(&self, user_id: i64, volatility: f64) -> Result<u64> {
        let ids = conversation_repo::ids_for_user(&self.db, user_id).await?;
        let assignments = score::shuffle_scores(&ids, volatility, &mut rand::thread_rng());
        if assignments.is_empty() {
            return Ok(0);
        }

        let (ids, scores): (Vec<i64>, Vec<f64>) = assignments.into_iter().unzip();
        Ok(conversation_repo::bulk_update_scores(&self.db, &ids, &scores).await?)
    }

    /// Append a user message, bump `last_update` and refresh the score, all
    /// in one transaction.
    pub async fn add_reply(&self, conversation_id: i64, text: &str) -> Result<Conversation> {
        let mut tx = self.db.begin().await?;
        let conversation = conversation_repo::find_by_id(&mut *tx, conversation_id)
            .await?
            .ok_or_else(|| not_found(conversation_id))?;

        message_repo::insert(&mut *tx, conversation.id, SENDER_USER, None, text).await?;
        conversation_repo::touch(&mut *tx, conversation.id).await?;
        let conversation = self.refresh_one(&mut tx, conversation.id).await?;
        tx.commit().await?;
        Ok(conversation)
    }

    pub async fn delete(&self, conversation_id: i64) -> Result<()> {
        if !conversation_repo::delete(&self.db, conversation_id).await? {
            return Err(not_found(conversation_id));
        }
        Ok(())
    }

    /// A conversation and its messages in write order.
    pub async fn messages(&self, conversation_id: i64) -> Result<(Conversation, Vec<Message>)> {
        let conversation = conversation_repo::find_by_id(&self.db, conversation_id)
            .await?
            .ok_or_else(|| not_found(conversation_id))?;
        let messages = message_repo::list_for_conversation(&self.db, conversation_id).await?;
        Ok((conversation, messages))
    }

    /// Recompute and store one conversation's score from its current inputs.
    /// Runs on the caller's connection so it sees uncommitted writes.
    async fn refresh_one(
        &self,
        conn: &mut PgConnection,
        conversation_id: i64,
    ) -> Result<Conversation> {
        let inputs = conversation_repo::score_inputs(&mut *conn, conversation_id)
            .await?
            .ok_or_else(|| not_found(conversation_id))?;

        let new_score = score::score(
            inputs.total_chars,
            age_hours(inputs.start_date, Utc::now()),
            self.ranking.randomness_factor,
            &mut rand::thread_rng(),
        );

        conversation_repo::update_score(&mut *conn, conversation_id, new_score)
            .await?
            .ok_or_else(|| not_found(conversation_id))
    }
}

fn age_hours(start_date: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - start_date).num_seconds().max(0) as f64 / 3600.0
}

fn not_found(conversation_id: i64) -> AppError {
    AppError::NotFound(format!("no conversation found for id {conversation_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn age_is_measured_in_hours_from_start_date() {
        let now = Utc::now();
        let started = now - Duration::hours(36);
        assert!((age_hours(started, now) - 36.0).abs() < 1e-6);
    }

    #[test]
    fn age_never_goes_negative_for_clock_skew() {
        let now = Utc::now();
        let started = now + Duration::minutes(5);
        assert_eq!(age_hours(started, now), 0.0);
    }
}
