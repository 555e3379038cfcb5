use serde::{Deserialize, Serialize};

/// One word of the learner's vocabulary, as stored in the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Source language of the word.
    pub lang: String,
    pub word: String,
    /// Sentence the word was looked up in, when the source recorded one.
    pub usage: Option<String>,
    /// Byte offset of the word inside `usage`.
    pub usage_word_index: Option<usize>,
    /// Key of the translator that produced `translation`.
    pub translator: Option<String>,
    /// Translator payload, stored as JSON.
    pub translation: Option<String>,
}

impl VocabularyEntry {
    pub fn new(lang: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            word: word.into(),
            ..Self::default()
        }
    }
}
