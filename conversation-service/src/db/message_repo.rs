use sqlx::{PgExecutor, PgPool};

use crate::models::Message;

const MESSAGE_COLUMNS: &str =
    r#"id, conversation_id, sender, content_chunk_id, message_text, "timestamp""#;

pub async fn insert(
    executor: impl PgExecutor<'_>,
    conversation_id: i64,
    sender: &str,
    content_chunk_id: Option<i64>,
    message_text: &str,
) -> Result<Message, sqlx::Error> {
    sqlx::query_as::<_, Message>(&format!(
        "INSERT INTO message (conversation_id, sender, content_chunk_id, message_text)
         VALUES ($1, $2, $3, $4)
         RETURNING {MESSAGE_COLUMNS}"
    ))
    .bind(conversation_id)
    .bind(sender)
    .bind(content_chunk_id)
    .bind(message_text)
    .fetch_one(executor)
    .await
}

/// Messages of a conversation in the order they were written.
pub async fn list_for_conversation(
    pool: &PgPool,
    conversation_id: i64,
) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(&format!(
        r#"SELECT {MESSAGE_COLUMNS}
           FROM message
           WHERE conversation_id = $1
           ORDER BY "timestamp" ASC, id ASC"#
    ))
    .bind(conversation_id)
    .fetch_all(pool)
    .await
}
