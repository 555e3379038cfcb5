use serde::{Deserialize, Serialize};

/// Everything extracted from one dictionary page for one word.
///
/// Built once per extraction and never mutated afterwards. `entries` and
/// `pronunciations` keep the document order of the page, which is meaningful:
/// the primary sense and the primary transcription come first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub from_lang: String,
    pub to_lang: String,
    pub source_url: String,
    pub entries: Vec<TranslationEntry>,
    pub pronunciations: Vec<PronunciationGroup>,
}

impl TranslationResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.pronunciations.is_empty()
    }
}

/// One sense of the bilingual table: a source term with its renderings.
///
/// A single entry may span several table rows; continuation rows contribute
/// additional renderings and examples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    /// Source-language term or phrase.
    pub source: String,
    /// Grammatical annotation (part of speech) when the page carries one.
    pub grammar: Option<String>,
    /// Usage context shown next to the source term, e.g. "(colloquial)".
    pub sense: Option<String>,
    /// Target-language renderings, document order. Never empty.
    pub renderings: Vec<String>,
    /// Example sentence in the source language, when present.
    pub from_example: Option<String>,
    /// Example translations of `from_example`, document order.
    pub to_examples: Vec<String>,
}

/// A pronunciation label with its variant transcriptions.
///
/// The label is typically the primary transcription or a regional marker;
/// variants are the alternate transcriptions listed after it. Groups are
/// only ever extended while they are the most recently started one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PronunciationGroup {
    pub label: String,
    pub variants: Vec<String>,
}

impl PronunciationGroup {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            variants: Vec::new(),
        }
    }
}
