//! Dictionary translation provider.
//!
//! [`WordReferenceTranslator`] plugs into the index builder's
//! `EntryTranslator` seam: it fetches the WordReference page for a word,
//! reads it into a tree, runs the page extractor, and hands the result back
//! as the JSON payload stored in the index.

mod wordreference;

pub use wordreference::{TRANSLATOR_KEY, WordReferenceTranslator};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not build dictionary url for {word:?}")]
    InvalidUrl { word: String },

    #[error("unreadable dictionary page: {0}")]
    Page(#[from] kindeck_dom::MarkupError),
}
