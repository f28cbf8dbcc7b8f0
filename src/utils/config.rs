use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5005";
pub const DEFAULT_API_KEY: &str = "your-api-key-here";

pub const ENV_BASE_URL: &str = "GRACE_BASE_URL";
pub const ENV_API_KEY: &str = "GRACE_API_KEY";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root URL of the agent service, without trailing slash
    pub base_url: String,

    /// Bearer credential sent with every request
    pub api_key: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Pause between two scripted steps
    pub step_delay: Duration,

    /// Create the conversation explicitly before the first message
    pub create_conversation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            request_timeout: Duration::from_secs(60),
            step_delay: Duration::from_secs(2),
            create_conversation: false,
        }
    }
}

impl Config {
    /// Defaults overridden by `GRACE_BASE_URL` and `GRACE_API_KEY`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(&url);
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
            config.api_key = key;
        }
        config
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }
}
