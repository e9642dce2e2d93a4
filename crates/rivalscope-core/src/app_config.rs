use std::net::SocketAddr;
use std::time::Duration;

/// Desktop Chrome identity. Some origins reject non-browser user agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub analysis_timeout_secs: u64,
    pub inline_max_url_len: usize,
    pub job_ttl_secs: u64,
    pub debug_endpoints: bool,
    pub model_api_key: Option<String>,
    pub model_base_url: String,
    pub model_name: String,
    pub model_timeout_secs: u64,
    pub model_max_retries: u32,
    pub model_retry_backoff_base_secs: u64,
    pub extract_max_text_chars: usize,
    pub extract_max_links: usize,
}

impl AppConfig {
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    #[must_use]
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    #[must_use]
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    #[must_use]
    pub fn job_ttl(&self) -> Duration {
        Duration::from_secs(self.job_ttl_secs)
    }

    /// Whether a completion API key was found in the environment.
    #[must_use]
    pub fn has_model_api_key(&self) -> bool {
        self.model_api_key.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("analysis_timeout_secs", &self.analysis_timeout_secs)
            .field("inline_max_url_len", &self.inline_max_url_len)
            .field("job_ttl_secs", &self.job_ttl_secs)
            .field("debug_endpoints", &self.debug_endpoints)
            .field(
                "model_api_key",
                &self.model_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("model_base_url", &self.model_base_url)
            .field("model_name", &self.model_name)
            .field("model_timeout_secs", &self.model_timeout_secs)
            .field("model_max_retries", &self.model_max_retries)
            .field(
                "model_retry_backoff_base_secs",
                &self.model_retry_backoff_base_secs,
            )
            .field("extract_max_text_chars", &self.extract_max_text_chars)
            .field("extract_max_links", &self.extract_max_links)
            .finish()
    }
}
