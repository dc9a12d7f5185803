use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::config::Config;
use crate::services::{ContentProcessorClient, InfluencerClient, ProfilesClient};

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Postgres>,
    pub config: Arc<Config>,
    pub influencer: Arc<InfluencerClient>,
    pub content_processor: Arc<ContentProcessorClient>,
    pub profiles: Arc<ProfilesClient>,
}
