//! Database access layer: pool construction and per-table repositories.

pub mod conversation_repo;
pub mod message_repo;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::config::DatabaseConfig;

pub async fn init_pool(config: &DatabaseConfig) -> Result<Pool<Postgres>, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
}
