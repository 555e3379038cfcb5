use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::IndexError;
use crate::vocabdb::Vocabdb;

/// One word of raw vocabulary with the sentence it was encountered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyItem {
    pub word: String,
    pub usage: String,
    /// Byte offset of `word` inside `usage`.
    pub usage_word_index: usize,
}

/// Ordered collection of vocabulary words. A word keeps the position of its
/// first occurrence; a repeated occurrence replaces its usage sentence.
#[derive(Debug, Default)]
pub struct Vocabulary {
    items: Vec<VocabularyItem>,
    seen: HashSet<String>,
}

impl Vocabulary {
    /// Read a tab-separated `word<TAB>usage` file.
    pub fn from_csv_path(path: &Path) -> Result<Self, IndexError> {
        Self::from_csv_reader(File::open(path)?)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, IndexError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut vocabulary = Self::default();
        for record in csv_reader.records() {
            let record = record?;
            let Some(word) = record.get(0).map(str::trim).filter(|w| !w.is_empty()) else {
                continue;
            };
            let usage = record
                .get(1)
                .map(str::trim)
                .ok_or_else(|| IndexError::MissingUsage {
                    word: word.to_string(),
                })?;
            vocabulary.push(word, usage)?;
        }
        Ok(vocabulary)
    }

    /// Collect the vocabulary of one book from a Kindle database, keeping
    /// only lookups in the source language.
    pub fn from_vocabdb(
        db: &Vocabdb,
        book_id: &str,
        from_lang: &str,
    ) -> Result<Self, IndexError> {
        let words = db.words(book_id)?;

        let mut vocabulary = Self::default();
        for lookup in db.lookups(book_id)? {
            let Some(word) = words.get(&lookup.word_id) else {
                continue;
            };
            if word.lang.as_deref() != Some(from_lang) {
                continue;
            }
            let Some(usage) = lookup.usage else {
                debug!(word = %word.value, "lookup without usage sentence, skipping");
                continue;
            };
            // Kindle records curly apostrophes; the dictionaries expect
            // plain ones.
            let usage = usage.replace('\u{2019}', "'");
            vocabulary.push(&word.value, &usage)?;
        }
        Ok(vocabulary)
    }

    fn push(&mut self, word: &str, usage: &str) -> Result<(), IndexError> {
        let usage_word_index =
            usage
                .find(word)
                .ok_or_else(|| IndexError::WordNotInUsage {
                    word: word.to_string(),
                })?;
        if self.seen.contains(word) {
            // A word looked up again keeps its place but the later usage
            // sentence is the one carried forward.
            if let Some(item) = self.items.iter_mut().find(|item| item.word == word) {
                item.usage = usage.to_string();
                item.usage_word_index = usage_word_index;
            }
            return Ok(());
        }
        self.seen.insert(word.to_string());
        self.items.push(VocabularyItem {
            word: word.to_string(),
            usage: usage.to_string(),
            usage_word_index,
        });
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &VocabularyItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
