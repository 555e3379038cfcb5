use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("could not read vocabulary input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed vocabulary file: {0}")]
    Csv(#[from] csv::Error),

    #[error("vocabulary row has no usage column for word {word:?}")]
    MissingUsage { word: String },

    #[error("word {word:?} not found in its usage sentence")]
    WordNotInUsage { word: String },

    #[error("invalid language code {code:?}")]
    InvalidLanguageCode { code: String },

    #[error("no book with id {book_id:?} in the vocabulary database")]
    UnknownBook { book_id: String },
}
