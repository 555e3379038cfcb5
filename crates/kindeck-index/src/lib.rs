//! Vocabulary index: where learned words and their translations live.
//!
//! The index is a small SQLite database with one table per language pair.
//! Words come in from a Kindle `vocab.db` or a tab-separated word list
//! ([`Vocabulary`]), get expanded by optional [`EntryTransform`]s, translated
//! through an [`EntryTranslator`], and stored ([`VocabularyIndex`]) so that
//! repeated runs reuse earlier translations instead of re-fetching them.

pub mod builder;
pub mod error;
pub mod source;
pub mod store;
pub mod vocabdb;

pub use builder::{BuildStats, EntryTransform, EntryTranslator, IndexBuilder};
pub use error::IndexError;
pub use source::{Vocabulary, VocabularyItem};
pub use store::VocabularyIndex;
pub use vocabdb::{Book, KindleLookup, KindleWord, Vocabdb};
