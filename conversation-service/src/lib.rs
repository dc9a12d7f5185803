/// Conversation Service Library
///
/// Manages conversations between users and AI personas around content items.
/// Conversations carry a relevance score combining message volume and recency,
/// served as a descending feed with opaque cursor pagination.
///
/// # Modules
///
/// - `handlers`: Conversation and message HTTP request handlers
/// - `models`: Data structures for conversations and messages
/// - `services`: Business logic layer and downstream service clients
/// - `db`: Database access layer and repositories
/// - `ranking`: Score computation, shuffling, and cursor codec
/// - `jobs`: Background jobs spawned off the request path
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod metrics;
pub mod migrations;
pub mod models;
pub mod openapi;
pub mod ranking;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
