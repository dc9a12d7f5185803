//! Business logic and downstream service clients.

pub mod content_client;
pub mod conversation_service;
pub mod influencer_client;
pub mod profiles_client;

pub use content_client::ContentProcessorClient;
pub use conversation_service::{ConversationPage, ConversationService};
pub use influencer_client::InfluencerClient;
pub use profiles_client::ProfilesClient;
