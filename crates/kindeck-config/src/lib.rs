use serde::{Deserialize, Serialize};

use self::anki::AnkiConfig;
use self::http::HttpConfig;

pub mod anki;
pub mod http;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub anki: AnkiConfig,
}

impl Config {
    /// Defaults with environment overrides applied.
    pub fn new() -> Self {
        Config {
            http: HttpConfig::new(),
            anki: AnkiConfig::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
