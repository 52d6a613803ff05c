use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Absolute origin of the upstream site, e.g. `https://www.acs.ir`.
    pub base_url: String,
    pub cache_dir: PathBuf,
    pub fetch_timeout_ms: u64,
    pub fetch_max_attempts: u32,
    pub fetch_backoff_ms: u64,
    pub revalidate_secs: u64,
    pub cache_ttl_secs: u64,
    pub user_agent: String,
    /// Build-time switch: every fetch fails immediately when set.
    pub skip_network: bool,
    /// Hosts whose links are stripped from sanitized article bodies.
    pub self_hosts: Vec<String>,
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.env == Environment::Development
    }
}
