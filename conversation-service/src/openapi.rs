/// OpenAPI documentation for the Conversation Service
use utoipa::OpenApi;

use crate::handlers::conversations::{
    AddReplyRequest, BatchCreateRequest, ConversationFeedResponse, CreateConversationRequest,
    CreateConversationResponse, ShuffleRequest,
};
use crate::handlers::messages::ConversationMessagesResponse;
use crate::models::{AiProfile, Conversation, ContentChunk, Message};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Conversation Service API",
        version = "1.0.0",
        description = "Conversation management service for AI persona chats around content items. Handles conversation creation (single and batch-seeded), scored feed retrieval with cursor pagination, user replies, score shuffling, and deletion.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Development server"),
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "convos", description = "Conversation creation, scored feed, replies, shuffle, deletion"),
        (name = "messages", description = "Message history with AI persona metadata"),
    ),
    components(schemas(
        Conversation,
        Message,
        ContentChunk,
        AiProfile,
        CreateConversationRequest,
        CreateConversationResponse,
        ConversationFeedResponse,
        BatchCreateRequest,
        ShuffleRequest,
        AddReplyRequest,
        ConversationMessagesResponse,
    ))
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
