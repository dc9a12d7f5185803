use sqlx::{PgExecutor, PgPool};

use crate::models::Conversation;
use crate::ranking::Cursor;

const CONVERSATION_COLUMNS: &str = "id, user_id, content_id, start_date, last_update, score";

/// Inputs needed to recompute a conversation's score.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScoreInputs {
    pub id: i64,
    pub total_chars: i64,
    pub start_date: chrono::DateTime<chrono::Utc>,
}

/// Create a new conversation with server-side timestamps and a zero score.
pub async fn insert(
    executor: impl PgExecutor<'_>,
    user_id: i64,
    content_id: i64,
) -> Result<Conversation, sqlx::Error> {
    sqlx::query_as::<_, Conversation>(&format!(
        "INSERT INTO conversation (user_id, content_id) VALUES ($1, $2) RETURNING {CONVERSATION_COLUMNS}"
    ))
    .bind(user_id)
    .bind(content_id)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<Conversation>, sqlx::Error> {
    sqlx::query_as::<_, Conversation>(&format!(
        "SELECT {CONVERSATION_COLUMNS} FROM conversation WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Delete a conversation; messages go with it via the FK cascade.
/// Returns whether a row was actually removed.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM conversation WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// One page of a user's conversations in `(score DESC, id DESC)` order.
///
/// With a cursor, only rows strictly after the last-seen position are
/// returned: `score < c.score OR (score = c.score AND id < c.id)`. Callers
/// fetch one row more than the page size to detect a next page.
pub async fn page_by_score(
    pool: &PgPool,
    user_id: i64,
    cursor: Option<&Cursor>,
    limit: i64,
) -> Result<Vec<Conversation>, sqlx::Error> {
    match cursor {
        Some(c) => {
            sqlx::query_as::<_, Conversation>(&format!(
                "SELECT {CONVERSATION_COLUMNS}
                 FROM conversation
                 WHERE user_id = $1
                   AND (score < $2 OR (score = $2 AND id < $3))
                 ORDER BY score DESC, id DESC
                 LIMIT $4"
            ))
            .bind(user_id)
            .bind(c.score)
            .bind(c.id)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Conversation>(&format!(
                "SELECT {CONVERSATION_COLUMNS}
                 FROM conversation
                 WHERE user_id = $1
                 ORDER BY score DESC, id DESC
                 LIMIT $2"
            ))
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    }
}

/// A random sample of a user's conversations.
pub async fn random_for_user(
    pool: &PgPool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<Conversation>, sqlx::Error> {
    sqlx::query_as::<_, Conversation>(&format!(
        "SELECT {CONVERSATION_COLUMNS}
         FROM conversation
         WHERE user_id = $1
         ORDER BY RANDOM()
         LIMIT $2"
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn ids_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<i64>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64,)>("SELECT id FROM conversation WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Score inputs (total message characters + age anchor) for one conversation.
pub async fn score_inputs(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<ScoreInputs>, sqlx::Error> {
    sqlx::query_as::<_, ScoreInputs>(
        "SELECT c.id,
                COALESCE(SUM(LENGTH(m.message_text)), 0)::BIGINT AS total_chars,
                c.start_date
         FROM conversation c
         LEFT JOIN message m ON m.conversation_id = c.id
         WHERE c.id = $1
         GROUP BY c.id, c.start_date",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Score inputs for every conversation a user owns.
pub async fn score_inputs_for_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<ScoreInputs>, sqlx::Error> {
    sqlx::query_as::<_, ScoreInputs>(
        "SELECT c.id,
                COALESCE(SUM(LENGTH(m.message_text)), 0)::BIGINT AS total_chars,
                c.start_date
         FROM conversation c
         LEFT JOIN message m ON m.conversation_id = c.id
         WHERE c.user_id = $1
         GROUP BY c.id, c.start_date",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Store a freshly computed score without touching `last_update`.
pub async fn update_score(
    executor: impl PgExecutor<'_>,
    id: i64,
    score: f64,
) -> Result<Option<Conversation>, sqlx::Error> {
    sqlx::query_as::<_, Conversation>(&format!(
        "UPDATE conversation SET score = $2 WHERE id = $1 RETURNING {CONVERSATION_COLUMNS}"
    ))
    .bind(id)
    .bind(score)
    .fetch_optional(executor)
    .await
}

/// Bump `last_update` to now; called when a reply lands.
pub async fn touch(executor: impl PgExecutor<'_>, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE conversation SET last_update = NOW() WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Apply a batch of `(id, score)` assignments in a single statement.
/// Returns the number of rows updated.
pub async fn bulk_update_scores(
    pool: &PgPool,
    ids: &[i64],
    scores: &[f64],
) -> Result<u64, sqlx::Error> {
    debug_assert_eq!(ids.len(), scores.len());
    if ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        "UPDATE conversation
         SET score = u.score
         FROM UNNEST($1::BIGINT[], $2::DOUBLE PRECISION[]) AS u(id, score)
         WHERE conversation.id = u.id",
    )
    .bind(ids)
    .bind(scores)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
