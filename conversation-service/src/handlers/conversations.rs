use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::config::RankingConfig;
use crate::error::{AppError, Result};
use crate::jobs::batch_seeder;
use crate::metrics;
use crate::models::Conversation;
use crate::ranking::{cursor, Cursor};
use crate::services::ConversationService;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateConversationRequest {
    pub user_id: Option<i64>,
    pub content_id: Option<i64>,
    pub content_chunk_id: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateConversationResponse {
    pub message: String,
    pub conversation: Conversation,
}

#[derive(Debug, Deserialize)]
pub struct ListConversationsParams {
    pub user_id: Option<i64>,
    pub limit: Option<i64>,
    pub cursor: Option<String>,
    #[serde(default)]
    pub random: bool,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationFeedResponse {
    pub conversations: Vec<Conversation>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchCreateRequest {
    pub user_id: Option<i64>,
    pub num_convos: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShuffleRequest {
    pub user_id: Option<i64>,
    pub volatility: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddReplyRequest {
    pub message: Option<String>,
}

/// Create a new conversation, optionally with an opening user message.
/// POST /api/convos
pub async fn create_conversation(
    state: web::Data<AppState>,
    req: web::Json<CreateConversationRequest>,
) -> Result<HttpResponse> {
    let user_id = req
        .user_id
        .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;
    let content_id = req
        .content_id
        .ok_or_else(|| AppError::BadRequest("content_id is required".to_string()))?;

    // A whitespace-only opening message is treated as no message at all.
    let message = non_empty_trimmed(req.message.as_deref());

    let service = service(&state);
    let conversation = service
        .create(user_id, content_id, req.content_chunk_id, message)
        .await?;

    metrics::CONVERSATIONS_CREATED_TOTAL
        .with_label_values(&["api"])
        .inc();

    // An opening message gets an AI reply; the trigger never blocks the
    // response and failures are only logged.
    if let Some(message) = message {
        state
            .influencer
            .spawn_trigger(conversation.id, user_id, message.to_string());
    }

    Ok(HttpResponse::Created().json(CreateConversationResponse {
        message: "Conversation successfully created".to_string(),
        conversation,
    }))
}

/// Scored conversation feed with keyset pagination.
/// GET /api/convos?user_id=..&limit=..&cursor=..&random=..&refresh=..
pub async fn list_conversations(
    state: web::Data<AppState>,
    query: web::Query<ListConversationsParams>,
) -> Result<HttpResponse> {
    let user_id = query
        .user_id
        .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;

    let limit = clamp_limit(query.limit, &state.config.ranking);
    let service = service(&state);

    if query.refresh {
        let refreshed = service.refresh_scores(user_id).await?;
        tracing::debug!(user_id, refreshed, "recomputed scores before listing");
    }

    if query.random {
        metrics::FEED_REQUESTS_TOTAL
            .with_label_values(&["random"])
            .inc();
        let conversations = service.random_page(user_id, limit).await?;
        return Ok(HttpResponse::Ok().json(ConversationFeedResponse {
            conversations,
            next_cursor: None,
            has_more: false,
        }));
    }

    metrics::FEED_REQUESTS_TOTAL
        .with_label_values(&["scored"])
        .inc();

    let cursor = decode_cursor_param(query.cursor.as_deref());
    let page = service.page(user_id, limit, cursor).await?;

    Ok(HttpResponse::Ok().json(ConversationFeedResponse {
        conversations: page.conversations,
        next_cursor: page.next_cursor,
        has_more: page.has_more,
    }))
}

/// Schedule background creation of seeded conversations.
/// POST /api/convos/batch
pub async fn create_batch(
    state: web::Data<AppState>,
    req: web::Json<BatchCreateRequest>,
) -> Result<HttpResponse> {
    let user_id = req
        .user_id
        .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;
    let num_convos = req
        .num_convos
        .ok_or_else(|| AppError::BadRequest("num_convos is required".to_string()))?;

    let max = state.config.ranking.batch_max_convos;
    if num_convos < 1 || num_convos > max {
        return Err(AppError::BadRequest(format!(
            "num_convos must be between 1 and {max}"
        )));
    }

    tokio::spawn(batch_seeder::seed_conversations(
        state.db.clone(),
        state.content_processor.clone(),
        state.config.ranking.clone(),
        user_id,
        num_convos,
    ));

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "message": "Batch conversation creation scheduled",
        "scheduled": num_convos,
    })))
}

/// Bulk re-randomization of a user's conversation scores.
/// POST /api/convos/shuffle
pub async fn shuffle_scores(
    state: web::Data<AppState>,
    req: web::Json<ShuffleRequest>,
) -> Result<HttpResponse> {
    let user_id = req
        .user_id
        .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;
    let volatility = req
        .volatility
        .ok_or_else(|| AppError::BadRequest("volatility is required".to_string()))?;

    if !(0.0..=1.0).contains(&volatility) || volatility.is_nan() {
        return Err(AppError::BadRequest(
            "volatility must be within [0.0, 1.0]".to_string(),
        ));
    }

    let updated = service(&state).shuffle(user_id, volatility).await?;
    metrics::SCORE_SHUFFLES_TOTAL.inc();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Scores shuffled",
        "updated": updated,
    })))
}

/// Append a user reply to a conversation.
/// PUT /api/convos/{id}/reply
pub async fn add_reply(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<AddReplyRequest>,
) -> Result<HttpResponse> {
    let conversation_id = path.into_inner();
    let message = non_empty_trimmed(req.message.as_deref())
        .ok_or_else(|| AppError::BadRequest("message is required".to_string()))?
        .to_string();

    let conversation = service(&state).add_reply(conversation_id, &message).await?;

    state
        .influencer
        .spawn_trigger(conversation.id, conversation.user_id, message);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Conversation with id {conversation_id} was updated successfully"),
        "conversation": conversation,
    })))
}

/// Delete a conversation and, via cascade, its messages.
/// DELETE /api/convos/{id}
pub async fn delete_conversation(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let conversation_id = path.into_inner();
    service(&state).delete(conversation_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

fn service(state: &web::Data<AppState>) -> ConversationService {
    ConversationService::new(state.db.clone(), state.config.ranking.clone())
}

fn clamp_limit(requested: Option<i64>, ranking: &RankingConfig) -> i64 {
    requested
        .unwrap_or(ranking.default_page_size)
        .clamp(1, ranking.max_page_size)
}

/// Trim a message body, mapping whitespace-only input to `None`.
fn non_empty_trimmed(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|m| !m.is_empty())
}

/// Decode the `cursor` query parameter. A malformed token silently restarts
/// pagination from the first page; we log and count it so the fallback is at
/// least visible server-side.
fn decode_cursor_param(token: Option<&str>) -> Option<Cursor> {
    match token {
        Some(t) if !t.is_empty() => match cursor::decode(t) {
            Some(c) => Some(c),
            None => {
                warn!(cursor = t, "malformed cursor token; restarting from first page");
                metrics::MALFORMED_CURSORS_TOTAL.inc();
                None
            }
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ranking() -> RankingConfig {
        RankingConfig::default()
    }

    #[test]
    fn limit_defaults_when_absent() {
        assert_eq!(clamp_limit(None, &ranking()), 10);
    }

    #[test]
    fn limit_is_clamped_to_bounds() {
        assert_eq!(clamp_limit(Some(0), &ranking()), 1);
        assert_eq!(clamp_limit(Some(-3), &ranking()), 1);
        assert_eq!(clamp_limit(Some(10_000), &ranking()), 100);
        assert_eq!(clamp_limit(Some(25), &ranking()), 25);
    }

    #[test]
    fn valid_cursor_param_decodes() {
        let token = cursor::encode(&Cursor {
            score: 0.42,
            id: 7,
            last_update: Utc::now(),
        });
        let decoded = decode_cursor_param(Some(&token)).unwrap();
        assert_eq!(decoded.id, 7);
        assert_eq!(decoded.score, 0.42);
    }

    #[test]
    fn malformed_cursor_param_falls_back_to_first_page() {
        assert!(decode_cursor_param(Some("definitely-not-a-cursor!")).is_none());
    }

    #[test]
    fn absent_or_empty_cursor_param_is_first_page() {
        assert!(decode_cursor_param(None).is_none());
        assert!(decode_cursor_param(Some("")).is_none());
    }

    #[test]
    fn message_bodies_are_trimmed() {
        assert_eq!(non_empty_trimmed(Some("  hello  ")), Some("hello"));
    }

    #[test]
    fn whitespace_only_messages_count_as_absent() {
        assert_eq!(non_empty_trimmed(Some("")), None);
        assert_eq!(non_empty_trimmed(Some("   \n\t")), None);
        assert_eq!(non_empty_trimmed(None), None);
    }
}
