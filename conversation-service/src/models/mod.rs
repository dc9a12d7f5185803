use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message sender roles as stored in the `sender` column.
pub const SENDER_USER: &str = "user";
pub const SENDER_AI: &str = "ai";

/// A thread between a user and an AI persona about a content item.
///
/// `score` is a cached ranking value; it can always be recomputed from the
/// conversation's messages and age (plus jitter) and is overwritten by
/// replies, refreshes and shuffles.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub content_id: i64,
    pub start_date: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
    pub score: f64,
}

/// A single message inside a conversation. Immutable once created; removed
/// only via cascade when its conversation is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender: String,
    pub content_chunk_id: Option<i64>,
    pub message_text: String,
    pub timestamp: DateTime<Utc>,
}

/// A content chunk served by the content processor, used to seed batch
/// conversations with an opening AI message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentChunk {
    pub id: i64,
    pub content_id: i64,
    pub text: String,
}

/// AI persona metadata served by the profiles service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AiProfile {
    pub name: String,
    pub persona: Option<String>,
    pub avatar_url: Option<String>,
}
