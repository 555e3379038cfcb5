pub mod translation;
pub mod vocabulary;

pub use translation::{PronunciationGroup, TranslationEntry, TranslationResult};
pub use vocabulary::VocabularyEntry;
