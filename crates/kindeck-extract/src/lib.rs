//! Structured extraction of bilingual dictionary pages.
//!
//! Given an already-parsed document tree, [`PageExtractor`] locates the
//! dictionary-result tables and pronunciation widgets and assembles them into
//! a [`TranslationResult`]. Extraction is pure: it reads the tree, produces a
//! fresh result, and touches nothing else, so independent calls can run on
//! separate tasks without coordination.
//!
//! Missing structures are not errors. A page with no result tables or no
//! pronunciation widgets simply yields empty sequences; that is the normal
//! outcome for words the dictionary does not know. An *invalid* tree is
//! unrepresentable here: the input is typed ([`DocumentNode`]), so the
//! failure mode for unreadable markup lives with whatever constructs the
//! tree (`kindeck_dom::parse` returns `MarkupError`).

mod pronunciation;
mod table;

use kindeck_dom::DocumentNode;
use kindeck_types::TranslationResult;

/// Extracts translation entries and pronunciation groups from one page.
#[derive(Debug, Clone)]
pub struct PageExtractor {
    source_url: String,
}

impl PageExtractor {
    /// `source_url` is the page the tree was fetched from; it is carried
    /// into every result for card back-references.
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
        }
    }

    /// Walk the tree and assemble the result. Entries and pronunciation
    /// groups come out in document order; callers rely on first-sense-first.
    pub fn extract<N: DocumentNode>(
        &self,
        root: N,
        word: &str,
        from_lang: &str,
        to_lang: &str,
    ) -> TranslationResult {
        tracing::debug!(word, from_lang, to_lang, "extracting dictionary page");

        TranslationResult {
            from_lang: from_lang.to_string(),
            to_lang: to_lang.to_string(),
            source_url: self.source_url.clone(),
            entries: table::translation_entries(&root),
            pronunciations: pronunciation::pronunciation_groups(&root),
        }
    }
}
