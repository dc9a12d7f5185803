//! Prometheus metrics for the conversation service.
//!
//! Exposes feed and scoring collectors and an HTTP handler for the
//! `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Feed requests segmented by mode (scored, random).
    pub static ref FEED_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "conversation_feed_requests_total",
        "Conversation feed requests segmented by mode",
        &["mode"]
    )
    .expect("failed to register conversation_feed_requests_total");

    /// Cursor tokens that failed to decode and fell back to the first page.
    pub static ref MALFORMED_CURSORS_TOTAL: IntCounter = register_int_counter!(
        "conversation_feed_malformed_cursors_total",
        "Cursor tokens that failed to decode and restarted pagination"
    )
    .expect("failed to register conversation_feed_malformed_cursors_total");

    /// Conversations created segmented by source (api, batch).
    pub static ref CONVERSATIONS_CREATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "conversations_created_total",
        "Conversations created segmented by source",
        &["source"]
    )
    .expect("failed to register conversations_created_total");

    /// Bulk score shuffles performed.
    pub static ref SCORE_SHUFFLES_TOTAL: IntCounter = register_int_counter!(
        "conversation_score_shuffles_total",
        "Bulk score shuffle operations performed"
    )
    .expect("failed to register conversation_score_shuffles_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
