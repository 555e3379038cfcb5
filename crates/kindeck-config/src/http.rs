use std::env;

use serde::{Deserialize, Serialize};

/// Dictionary fetching knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Dictionary site root.
    pub base_url: String,
    pub timeout_seconds: u64,
    /// The dictionary serves a reduced page to unknown agents.
    pub user_agent: String,
}

impl HttpConfig {
    pub fn new() -> Self {
        let base_url = env::var("WORDREFERENCE_BASE_URL")
            .unwrap_or_else(|_| "https://www.wordreference.com".to_string());

        let timeout_seconds = env::var("HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10); // 10 seconds default

        let user_agent = env::var("HTTP_USER_AGENT")
            .unwrap_or_else(|_| "Mozilla/5.0 (compatible; kindeck)".to_string());

        HttpConfig {
            base_url,
            timeout_seconds,
            user_agent,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}
