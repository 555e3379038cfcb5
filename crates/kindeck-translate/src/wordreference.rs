use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use kindeck_config::http::HttpConfig;
use kindeck_extract::PageExtractor;
use kindeck_index::EntryTranslator;
use kindeck_types::{TranslationResult, VocabularyEntry};

use crate::TranslateError;

pub const TRANSLATOR_KEY: &str = "word_reference";

/// Fetches and extracts WordReference pages for one target language.
pub struct WordReferenceTranslator {
    base_url: String,
    client: reqwest::Client,
    to_lang: String,
    force_update: bool,
}

impl WordReferenceTranslator {
    pub fn new(
        http: &HttpConfig,
        to_lang: impl Into<String>,
        force_update: bool,
    ) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http.timeout_seconds))
            .user_agent(http.user_agent.clone())
            .build()?;

        Ok(Self {
            base_url: http.base_url.clone(),
            client,
            to_lang: to_lang.into(),
            force_update,
        })
    }

    /// Page URL for a word: `{base}/{from}{to}/{word}`.
    fn page_url(&self, from_lang: &str, word: &str) -> Result<Url, TranslateError> {
        let invalid = || TranslateError::InvalidUrl {
            word: word.to_string(),
        };

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .push(&format!("{from_lang}{}", self.to_lang))
            .push(word);
        Ok(url)
    }

    /// Fetch and extract one word; network and markup failures propagate.
    pub async fn lookup(
        &self,
        word: &str,
        from_lang: &str,
    ) -> Result<TranslationResult, TranslateError> {
        let url = self.page_url(from_lang, word)?;
        debug!(%url, "fetching dictionary page");

        let body = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_page(&body, url.as_str(), word, from_lang, &self.to_lang)
    }
}

/// Offline half of [`WordReferenceTranslator::lookup`]: page text to result.
pub(crate) fn extract_page(
    body: &str,
    url: &str,
    word: &str,
    from_lang: &str,
    to_lang: &str,
) -> Result<TranslationResult, TranslateError> {
    let tree = kindeck_dom::parse(body)?;
    Ok(PageExtractor::new(url).extract(&tree, word, from_lang, to_lang))
}

#[async_trait]
impl EntryTranslator for WordReferenceTranslator {
    fn key(&self) -> &'static str {
        TRANSLATOR_KEY
    }

    /// Failures are absorbed here: an entry that cannot be translated is
    /// indexed without a payload rather than failing the run.
    async fn translate(&self, entry: &VocabularyEntry) -> Option<String> {
        match self.lookup(&entry.word, &entry.lang).await {
            Ok(result) if result.is_empty() => {
                warn!(word = %entry.word, "dictionary has no data for word");
                None
            }
            Ok(result) => match serde_json::to_string(&result) {
                Ok(json) => Some(json),
                Err(err) => {
                    warn!(word = %entry.word, %err, "could not serialize translation");
                    None
                }
            },
            Err(err) => {
                warn!(word = %entry.word, %err, "translation failed");
                None
            }
        }
    }

    fn should_update(&self, _new_entry: &VocabularyEntry, old_entry: &VocabularyEntry) -> bool {
        self.force_update
            || old_entry.translator.as_deref() != Some(self.key())
            || old_entry.translation.is_none()
    }
}
