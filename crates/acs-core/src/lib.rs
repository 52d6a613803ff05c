//! Shared domain types, configuration and the bundled fallback dataset for
//! the ACS content pipeline.

pub mod app_config;
pub mod config;
pub mod fallback;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use fallback::{FallbackSource, LocalMatch, LocalNewsItem, LocalStandingsRow, StaticFallback};
pub use types::{
    Article, ArticleDetail, HomeAcsPayload, LiveEvent, Match, MatchesPayload, NewsDetail,
    PayloadSource, Sport, StandingsPayload, StandingsRow,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
