/// HTTP handlers for conversation endpoints
///
/// This module contains handlers for:
/// - Conversations: create (single and batch), scored feed, shuffle, reply, delete
/// - Messages: list a conversation's messages with AI persona metadata
pub mod conversations;
pub mod messages;

use actix_web::web;

pub use conversations::{
    add_reply, create_batch, create_conversation, delete_conversation, list_conversations,
    shuffle_scores,
};
pub use messages::get_conversation_messages;

/// Wire all conversation routes under `/api/convos`. Literal segments are
/// registered before the `{id}` routes so `batch` and `shuffle` never match
/// as ids.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/convos")
            .service(
                web::resource("")
                    .route(web::get().to(list_conversations))
                    .route(web::post().to(create_conversation)),
            )
            .service(web::resource("/batch").route(web::post().to(create_batch)))
            .service(web::resource("/shuffle").route(web::post().to(shuffle_scores)))
            .service(web::resource("/{id}").route(web::delete().to(delete_conversation)))
            .service(web::resource("/{id}/reply").route(web::put().to(add_reply)))
            .service(web::resource("/{id}/messages").route(web::get().to(get_conversation_messages))),
    );
}
