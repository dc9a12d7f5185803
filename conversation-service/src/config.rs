/// Configuration management for the conversation service
///
/// All configuration is loaded from environment variables into one explicit
/// `Config` value that is passed to constructors; nothing reads process-wide
/// state after startup.
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Downstream service endpoints
    pub services: ServicesConfig,
    /// Feed ranking configuration
    pub ranking: RankingConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Base URLs for the sibling services this one calls over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Influencer service (AI reply trigger)
    pub influencer_url: String,
    /// Content processor (content chunk lookup)
    pub content_processor_url: String,
    /// Profiles service (AI persona metadata)
    pub profiles_url: String,
    /// Shared request timeout for downstream calls
    pub request_timeout_ms: u64,
}

/// Scoring and pagination knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Half-width of the uniform jitter added to every computed score
    pub randomness_factor: f64,
    /// Page size when the client does not send `limit`
    pub default_page_size: i64,
    /// Upper clamp for `limit`
    pub max_page_size: i64,
    /// Upper clamp for `num_convos` on batch creation
    pub batch_max_convos: i64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            randomness_factor: 0.05,
            default_page_size: 10,
            max_page_size: 100,
            batch_max_convos: 50,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("CONVERSATION_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("CONVERSATION_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(5000),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err(AppError::Config(
                            "CORS_ALLOWED_ORIGINS must be set in production".to_string(),
                        ))
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err(AppError::Config(
                        "CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string(),
                    ));
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL").map_err(|_| {
                    AppError::Config("DATABASE_URL missing".to_string())
                })?,
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            services: ServicesConfig {
                influencer_url: std::env::var("INFLUENCER_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:5001".to_string()),
                content_processor_url: std::env::var("CONTENT_PROCESSOR_URL")
                    .unwrap_or_else(|_| "http://localhost:5002".to_string()),
                profiles_url: std::env::var("PROFILES_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:5003".to_string()),
                request_timeout_ms: std::env::var("DOWNSTREAM_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5_000),
            },
            ranking: RankingConfig {
                randomness_factor: parse_env_or_default("SCORE_RANDOMNESS_FACTOR", 0.05)?,
                default_page_size: std::env::var("FEED_DEFAULT_PAGE_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
                max_page_size: std::env::var("FEED_MAX_PAGE_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(100),
                batch_max_convos: std::env::var("BATCH_MAX_CONVOS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(50),
            },
        })
    }
}

fn parse_env_or_default(key: &str, default: f64) -> Result<f64, AppError> {
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| AppError::Config(format!("Failed to parse {}='{}': {}", key, val, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_defaults_are_sane() {
        let ranking = RankingConfig::default();
        assert!(ranking.randomness_factor > 0.0 && ranking.randomness_factor < 1.0);
        assert!(ranking.default_page_size <= ranking.max_page_size);
        assert!(ranking.batch_max_convos > 0);
    }

    #[test]
    fn parse_env_or_default_falls_back() {
        let key = "CONVERSATION_TEST_UNSET_KEY";
        std::env::remove_var(key);
        assert_eq!(parse_env_or_default(key, 0.25).unwrap(), 0.25);
    }
}
