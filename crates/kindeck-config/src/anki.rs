use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnkiConfig {
    /// AnkiConnect endpoint.
    pub url: String,
    /// Note model (note type) the cards are created under.
    pub model: String,
}

impl AnkiConfig {
    pub fn new() -> Self {
        let url =
            env::var("ANKI_CONNECT_URL").unwrap_or_else(|_| "http://localhost:8765".to_string());

        let model = env::var("ANKI_NOTE_MODEL")
            .unwrap_or_else(|_| "Kindle Vocabulary Note Type".to_string());

        AnkiConfig { url, model }
    }
}

impl Default for AnkiConfig {
    fn default() -> Self {
        Self::new()
    }
}
