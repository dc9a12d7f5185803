use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::error::Result;
use crate::models::{AiProfile, Message};
use crate::services::ConversationService;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationMessagesResponse {
    pub conversation_id: i64,
    pub content_id: i64,
    /// Explicitly `null` when the profiles service is unavailable.
    pub ai_profile: Option<AiProfile>,
    pub messages: Vec<Message>,
}

/// Messages of a conversation in write order, with AI persona metadata when
/// the profiles service is reachable.
/// GET /api/convos/{id}/messages
pub async fn get_conversation_messages(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let conversation_id = path.into_inner();

    let service = ConversationService::new(state.db.clone(), state.config.ranking.clone());
    let (conversation, messages) = service.messages(conversation_id).await?;

    // Persona metadata is decoration; a dead profiles service must not take
    // the message history down with it.
    let ai_profile = match state.profiles.fetch_profile(conversation.content_id).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(
                conversation_id,
                content_id = conversation.content_id,
                error = %e,
                "profiles service unavailable; returning messages without persona"
            );
            None
        }
    };

    Ok(HttpResponse::Ok().json(ConversationMessagesResponse {
        conversation_id,
        content_id: conversation.content_id,
        ai_profile,
        messages,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_response_serializes_profile_as_null() {
        let response = ConversationMessagesResponse {
            conversation_id: 7,
            content_id: 3,
            ai_profile: None,
            messages: Vec::new(),
        };

        let json = serde_json::to_value(&response).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("ai_profile"));
        assert!(obj["ai_profile"].is_null());
    }

    #[test]
    fn response_carries_profile_when_available() {
        let response = ConversationMessagesResponse {
            conversation_id: 7,
            content_id: 3,
            ai_profile: Some(AiProfile {
                name: "Ada".to_string(),
                persona: Some("historian".to_string()),
                avatar_url: None,
            }),
            messages: Vec::new(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["ai_profile"]["name"], "Ada");
    }
}
