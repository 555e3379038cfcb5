use async_trait::async_trait;
use tracing::info;

use kindeck_types::VocabularyEntry;

use crate::error::IndexError;
use crate::source::Vocabulary;
use crate::store::VocabularyIndex;

/// Produces the stored translation payload for a vocabulary entry.
///
/// Translation failures are the translator's to absorb: `translate` returns
/// `None` and the word is indexed untranslated, so one flaky page never
/// aborts a whole indexing run.
#[async_trait]
pub trait EntryTranslator: Send + Sync {
    /// Stable key recorded next to each translation it produced.
    fn key(&self) -> &'static str;

    async fn translate(&self, entry: &VocabularyEntry) -> Option<String>;

    /// Whether an already-indexed entry should be translated again.
    fn should_update(&self, _new_entry: &VocabularyEntry, old_entry: &VocabularyEntry) -> bool {
        old_entry.translator.as_deref() != Some(self.key()) || old_entry.translation.is_none()
    }
}

/// Expands one vocabulary entry into zero or more, e.g. deriving phrasal
/// verbs from the usage sentence.
pub trait EntryTransform: Send + Sync {
    fn transform(&self, from_lang: &str, entry: VocabularyEntry) -> Vec<VocabularyEntry>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    /// Entries written this run.
    pub indexed: usize,
    /// Entries left untouched because the index already had them.
    pub reused: usize,
    /// Entries written without a translation payload.
    pub untranslated: usize,
}

/// Drives vocabulary through transforms and a translator into the index.
pub struct IndexBuilder {
    from_lang: String,
    to_lang: String,
    transforms: Vec<Box<dyn EntryTransform>>,
    translator: Option<Box<dyn EntryTranslator>>,
}

impl IndexBuilder {
    pub fn new(from_lang: impl Into<String>, to_lang: impl Into<String>) -> Self {
        Self {
            from_lang: from_lang.into(),
            to_lang: to_lang.into(),
            transforms: Vec::new(),
            translator: None,
        }
    }

    pub fn with_transform(mut self, transform: Box<dyn EntryTransform>) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn with_translator(mut self, translator: Box<dyn EntryTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn from_lang(&self) -> &str {
        &self.from_lang
    }

    pub fn to_lang(&self) -> &str {
        &self.to_lang
    }

    pub async fn build(
        &self,
        vocabulary: &Vocabulary,
        index: &VocabularyIndex,
    ) -> Result<BuildStats, IndexError> {
        let entries = self.expand(vocabulary);
        let total = entries.len();
        let mut stats = BuildStats::default();

        for (position, mut entry) in entries.into_iter().enumerate() {
            let n = position + 1;
            let existing = index.read_entry(&entry.word)?;

            let Some(translator) = self.translator.as_deref() else {
                if existing.is_none() {
                    info!("indexing {n}/{total}: {}", entry.word);
                    index.write_entry(&entry)?;
                    stats.indexed += 1;
                } else {
                    info!("skipping {n}/{total}, reusing index: {}", entry.word);
                    stats.reused += 1;
                }
                continue;
            };

            let update = existing
                .as_ref()
                .is_none_or(|old| translator.should_update(&entry, old));
            if !update {
                info!("skipping {n}/{total}, reusing index: {}", entry.word);
                stats.reused += 1;
                continue;
            }

            info!("indexing {n}/{total}: {}", entry.word);
            entry.translator = Some(translator.key().to_string());
            entry.translation = translator.translate(&entry).await;
            if entry.translation.is_none() {
                stats.untranslated += 1;
            }
            index.write_entry(&entry)?;
            stats.indexed += 1;
        }

        Ok(stats)
    }

    /// Apply every transform to every word; duplicates produced along the
    /// way are dropped, first occurrence wins.
    fn expand(&self, vocabulary: &Vocabulary) -> Vec<VocabularyEntry> {
        let mut entries: Vec<VocabularyEntry> = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for item in vocabulary.iter() {
            let entry = VocabularyEntry {
                lang: self.from_lang.clone(),
                word: item.word.clone(),
                usage: Some(item.usage.clone()),
                usage_word_index: Some(item.usage_word_index),
                translator: None,
                translation: None,
            };

            let expanded = if self.transforms.is_empty() {
                vec![entry]
            } else {
                self.transforms
                    .iter()
                    .flat_map(|transform| transform.transform(&self.from_lang, entry.clone()))
                    .collect()
            };

            for entry in expanded {
                if seen.insert(entry.word.clone()) {
                    entries.push(entry);
                }
            }
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTranslator {
        payload: Option<&'static str>,
        force_update: bool,
    }

    #[async_trait]
    impl EntryTranslator for FixedTranslator {
        fn key(&self) -> &'static str {
            "fixed"
        }

        async fn translate(&self, _entry: &VocabularyEntry) -> Option<String> {
            self.payload.map(str::to_string)
        }

        fn should_update(&self, new_entry: &VocabularyEntry, old_entry: &VocabularyEntry) -> bool {
            self.force_update
                || old_entry.translator.as_deref() != Some(self.key())
                || old_entry.translation.is_none()
        }
    }

    struct DoublingTransform;

    impl EntryTransform for DoublingTransform {
        fn transform(&self, _from_lang: &str, entry: VocabularyEntry) -> Vec<VocabularyEntry> {
            let mut doubled = entry.clone();
            doubled.word = format!("{} up", entry.word);
            vec![entry, doubled]
        }
    }

    fn vocabulary() -> Vocabulary {
        Vocabulary::from_csv_reader("pin\tShe found a pin up there.\n".as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn translates_and_stores_new_words() {
        let index = VocabularyIndex::open_in_memory("en", "es").unwrap();
        let builder = IndexBuilder::new("en", "es").with_translator(Box::new(FixedTranslator {
            payload: Some("{\"entries\":[]}"),
            force_update: false,
        }));

        let stats = builder.build(&vocabulary(), &index).await.unwrap();
        assert_eq!(stats.indexed, 1);
        assert_eq!(stats.untranslated, 0);

        let entry = index.read_entry("pin").unwrap().unwrap();
        assert_eq!(entry.translator.as_deref(), Some("fixed"));
        assert_eq!(entry.translation.as_deref(), Some("{\"entries\":[]}"));
    }

    #[tokio::test]
    async fn reuses_already_translated_words() {
        let index = VocabularyIndex::open_in_memory("en", "es").unwrap();
        let builder = IndexBuilder::new("en", "es").with_translator(Box::new(FixedTranslator {
            payload: Some("{}"),
            force_update: false,
        }));

        builder.build(&vocabulary(), &index).await.unwrap();
        let stats = builder.build(&vocabulary(), &index).await.unwrap();
        assert_eq!(stats.indexed, 0);
        assert_eq!(stats.reused, 1);
    }

    #[tokio::test]
    async fn force_update_retranslates() {
        let index = VocabularyIndex::open_in_memory("en", "es").unwrap();
        let builder = IndexBuilder::new("en", "es").with_translator(Box::new(FixedTranslator {
            payload: Some("{}"),
            force_update: true,
        }));

        builder.build(&vocabulary(), &index).await.unwrap();
        let stats = builder.build(&vocabulary(), &index).await.unwrap();
        assert_eq!(stats.indexed, 1);
        assert_eq!(stats.reused, 0);
    }

    #[tokio::test]
    async fn failed_translations_still_index_the_word() {
        let index = VocabularyIndex::open_in_memory("en", "es").unwrap();
        let builder = IndexBuilder::new("en", "es").with_translator(Box::new(FixedTranslator {
            payload: None,
            force_update: false,
        }));

        let stats = builder.build(&vocabulary(), &index).await.unwrap();
        assert_eq!(stats.indexed, 1);
        assert_eq!(stats.untranslated, 1);

        let entry = index.read_entry("pin").unwrap().unwrap();
        assert!(entry.translation.is_none());
    }

    #[tokio::test]
    async fn transforms_expand_the_vocabulary() {
        let index = VocabularyIndex::open_in_memory("en", "es").unwrap();
        let builder = IndexBuilder::new("en", "es").with_transform(Box::new(DoublingTransform));

        let stats = builder.build(&vocabulary(), &index).await.unwrap();
        assert_eq!(stats.indexed, 2);
        assert!(index.read_entry("pin up").unwrap().is_some());
    }
}
